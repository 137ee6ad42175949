//! Stream identifiers and the stream contract consumed by the policies.
//!
//! A stream is an ordered channel of complete messages multiplexed over a
//! peer connection. Streams are owned by the connection layer; the policies
//! only borrow them for the duration of a single call.

use std::collections::HashSet;
use std::fmt;
use std::ops::AddAssign;
use std::str::FromStr;

use crate::error::{Result, StrandPolicyError};
use crate::message::{NetMessage, OutboundMessage};

/// Logical sub-stream identifiers.
///
/// `General` can carry any message and is present on every live connection.
/// `Unknown` is the "unspecified" routing hint and never names a real stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum StreamType {
    Unknown = 0x00,
    General = 0x01,
    Data1 = 0x02,
    Data2 = 0x03,
    Data3 = 0x04,
    Data4 = 0x05,
}

impl StreamType {
    /// Convert from a raw u8.
    pub fn from_u8(v: u8) -> Result<Self> {
        match v {
            0x00 => Ok(StreamType::Unknown),
            0x01 => Ok(StreamType::General),
            0x02 => Ok(StreamType::Data1),
            0x03 => Ok(StreamType::Data2),
            0x04 => Ok(StreamType::Data3),
            0x05 => Ok(StreamType::Data4),
            other => Err(StrandPolicyError::InvalidStreamType(format!("0x{other:02x}"))),
        }
    }

    /// Whether this names a concrete stream rather than the unspecified hint.
    pub fn is_specified(self) -> bool {
        self != StreamType::Unknown
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StreamType::Unknown => "UNKNOWN",
            StreamType::General => "GENERAL",
            StreamType::Data1 => "DATA1",
            StreamType::Data2 => "DATA2",
            StreamType::Data3 => "DATA3",
            StreamType::Data4 => "DATA4",
        }
    }
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StreamType {
    type Err = StrandPolicyError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "UNKNOWN" => Ok(StreamType::Unknown),
            "GENERAL" => Ok(StreamType::General),
            "DATA1" => Ok(StreamType::Data1),
            "DATA2" => Ok(StreamType::Data2),
            "DATA3" => Ok(StreamType::Data3),
            "DATA4" => Ok(StreamType::Data4),
            other => Err(StrandPolicyError::InvalidStreamType(other.to_string())),
        }
    }
}

/// Opaque token identifying a socket to the readiness sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SocketToken(pub u64);

/// Result of one readiness poll across the connection's sockets.
///
/// The policies never inspect these sets; they are handed unchanged to each
/// stream's `service_readiness`.
#[derive(Debug, Clone, Default)]
pub struct ReadySets {
    recv: HashSet<SocketToken>,
    send: HashSet<SocketToken>,
    error: HashSet<SocketToken>,
}

impl ReadySets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_readable(&mut self, token: SocketToken) {
        self.recv.insert(token);
    }

    pub fn mark_writable(&mut self, token: SocketToken) {
        self.send.insert(token);
    }

    pub fn mark_errored(&mut self, token: SocketToken) {
        self.error.insert(token);
    }

    pub fn is_readable(&self, token: SocketToken) -> bool {
        self.recv.contains(&token)
    }

    pub fn is_writable(&self, token: SocketToken) -> bool {
        self.send.contains(&token)
    }

    pub fn is_errored(&self, token: SocketToken) -> bool {
        self.error.contains(&token)
    }
}

/// Outcome of servicing one or more streams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceOutcome {
    /// At least one complete message became available.
    pub got_new_messages: bool,
    pub bytes_recv: usize,
    pub bytes_sent: usize,
}

impl AddAssign for ServiceOutcome {
    fn add_assign(&mut self, rhs: Self) {
        self.got_new_messages |= rhs.got_new_messages;
        self.bytes_recv += rhs.bytes_recv;
        self.bytes_sent += rhs.bytes_sent;
    }
}

/// Result of pulling the next message from a stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Received {
    pub message: Option<NetMessage>,
    /// More complete messages remain queued on the stream that answered.
    pub more: bool,
}

impl Received {
    /// Nothing available.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Operations a stream must provide to be driven by a policy.
pub trait Stream: Send {
    /// Configuration passed through unchanged to `service_readiness`.
    type Config;

    /// Pop the next complete inbound message, if any.
    fn receive_next(&mut self) -> Received;

    /// Move bytes for this stream's socket given the current readiness sets.
    /// Must not block.
    fn service_readiness(&mut self, ready: &ReadySets, config: &Self::Config) -> ServiceOutcome;

    /// Enqueue an outbound message; returns the number of bytes enqueued.
    fn send(&mut self, msg: OutboundMessage) -> usize;

    /// Lifetime bytes received on this stream.
    fn total_bytes_recv(&self) -> u64;

    /// Lifetime bytes sent on this stream.
    fn total_bytes_sent(&self) -> u64;
}
