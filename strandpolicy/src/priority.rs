//! Message priority classification.
//!
//! Block traffic and keepalives must never queue behind bulk transfers, so
//! they are classed as high priority. Everything else is normal.

use crate::message::command;

/// Priority class of an outbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessagePriority {
    High,
    Normal,
}

/// Returns `true` for block-related commands.
pub fn is_block_message(cmd: &str) -> bool {
    matches!(
        cmd,
        command::BLOCK | command::CMPCTBLOCK | command::BLOCKTXN | command::GETBLOCKTXN
    )
}

/// Classify a command identifier.
pub fn classify_priority(cmd: &str) -> MessagePriority {
    if cmd == command::PING || cmd == command::PONG || is_block_message(cmd) {
        MessagePriority::High
    } else {
        MessagePriority::Normal
    }
}
