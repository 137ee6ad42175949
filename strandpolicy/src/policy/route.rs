//! Outbound route resolution for multi-stream policies.
//!
//! Resolution order: exact request, then classified preference, then the
//! general stream, then failure. Kept free of any stream handles so it can be
//! tested as a pure function of the available stream types.

use crate::priority::{classify_priority, MessagePriority};
use crate::stream::StreamType;

/// Where an outbound message wants to go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The caller named a stream. Only that stream will do.
    Exact(StreamType),
    /// Chosen by classification. The general stream is an acceptable substitute.
    Prefer(StreamType),
}

impl Route {
    /// Build the route for a message from the caller's hint and its command.
    ///
    /// The command is only classified when no stream was requested.
    pub fn for_message(requested: StreamType, command: &str) -> Self {
        if requested.is_specified() {
            return Route::Exact(requested);
        }
        Self::for_priority(classify_priority(command))
    }

    /// The preferred route for a priority class.
    pub fn for_priority(priority: MessagePriority) -> Self {
        match priority {
            MessagePriority::High => Route::Prefer(StreamType::Data1),
            MessagePriority::Normal => Route::Prefer(StreamType::General),
        }
    }

    /// The stream type asked for.
    pub fn stream_type(self) -> StreamType {
        match self {
            Route::Exact(t) | Route::Prefer(t) => t,
        }
    }

    /// Resolve against the streams that actually exist.
    ///
    /// The requested type always wins when present; the general fallback is
    /// only consulted after it.
    pub fn resolve(self, available: impl Fn(StreamType) -> bool) -> Option<StreamType> {
        match self {
            Route::Exact(t) => available(t).then_some(t),
            Route::Prefer(t) if available(t) => Some(t),
            Route::Prefer(_) => available(StreamType::General).then_some(StreamType::General),
        }
    }
}
