//! Message types seen by the policy layer.
//!
//! Messages arrive here already framed and deserialized. The policy only ever
//! looks at the command string; payloads and headers pass through untouched.

use bytes::Bytes;

/// Wire command identifiers. Matching is exact and case-sensitive.
pub mod command {
    pub const VERSION: &str = "version";
    pub const INV: &str = "inv";
    pub const GETDATA: &str = "getdata";
    pub const GETHEADERS: &str = "getheaders";
    pub const TX: &str = "tx";
    pub const BLOCK: &str = "block";
    pub const CMPCTBLOCK: &str = "cmpctblock";
    pub const BLOCKTXN: &str = "blocktxn";
    pub const GETBLOCKTXN: &str = "getblocktxn";
    pub const PING: &str = "ping";
    pub const PONG: &str = "pong";
}

/// A complete inbound message pulled off a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetMessage {
    command: String,
    payload: Bytes,
}

impl NetMessage {
    /// Wrap a deserialized inbound message.
    pub fn new(command: impl Into<String>, payload: Bytes) -> Self {
        Self {
            command: command.into(),
            payload,
        }
    }

    /// The wire command, e.g. `"block"`.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// The raw payload bytes.
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Consume the message, keeping only the payload.
    pub fn into_payload(self) -> Bytes {
        self.payload
    }
}

/// A serialized outbound message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedMessage {
    command: String,
    payload: Bytes,
}

impl SerializedMessage {
    /// Pair a command with its already serialized payload.
    pub fn new(command: impl Into<String>, payload: Bytes) -> Self {
        Self {
            command: command.into(),
            payload,
        }
    }

    /// The wire command.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// The serialized payload.
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }
}

/// Everything a stream needs to enqueue one outbound message: the serialized
/// header, the body, and the size metadata the stream uses for accounting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    header: Bytes,
    message: SerializedMessage,
    payload_len: usize,
    total_size: usize,
}

impl OutboundMessage {
    /// Build an outbound message, deriving the sizes from the buffers.
    pub fn new(header: Bytes, message: SerializedMessage) -> Self {
        let payload_len = message.payload().len();
        let total_size = header.len() + payload_len;
        Self {
            header,
            message,
            payload_len,
            total_size,
        }
    }

    /// Build an outbound message with caller-supplied size metadata.
    pub fn with_sizes(
        header: Bytes,
        message: SerializedMessage,
        payload_len: usize,
        total_size: usize,
    ) -> Self {
        Self {
            header,
            message,
            payload_len,
            total_size,
        }
    }

    /// The command of the wrapped message. Routing looks only at this.
    pub fn command(&self) -> &str {
        self.message.command()
    }

    /// The serialized message header.
    pub fn header(&self) -> &Bytes {
        &self.header
    }

    /// The message body.
    pub fn message(&self) -> &SerializedMessage {
        &self.message
    }

    /// Payload length in bytes.
    pub fn payload_len(&self) -> usize {
        self.payload_len
    }

    /// Header plus payload, in bytes.
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    /// Split into the header and message body.
    pub fn into_parts(self) -> (Bytes, SerializedMessage) {
        (self.header, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outbound_sizes_derived_from_buffers() {
        let msg = SerializedMessage::new(command::TX, Bytes::from_static(b"payload"));
        let out = OutboundMessage::new(Bytes::from_static(&[0u8; 24]), msg);
        assert_eq!(out.payload_len(), 7);
        assert_eq!(out.total_size(), 31);
        assert_eq!(out.command(), "tx");
    }

    #[test]
    fn explicit_sizes_are_kept() {
        let msg = SerializedMessage::new(command::BLOCK, Bytes::new());
        let out = OutboundMessage::with_sizes(Bytes::new(), msg, 100, 124);
        assert_eq!(out.payload_len(), 100);
        assert_eq!(out.total_size(), 124);
    }
}
