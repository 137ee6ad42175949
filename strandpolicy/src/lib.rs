//! StrandPolicy -- stream-selection policies for multi-stream peer connections.
//!
//! A peer connection may be split into several logical streams, e.g. a
//! general stream for bulk traffic and a dedicated stream for block data and
//! keepalives. This crate decides:
//! - which stream to read the next inbound message from,
//! - which stream every outbound message is written to,
//! - which extra streams to request when a connection is set up.
//!
//! Sockets, framing and serialization are out of scope; streams are consumed
//! through the [`Stream`] trait.

pub mod association;
pub mod config;
pub mod error;
pub mod message;
pub mod policy;
pub mod priority;
pub mod requester;
pub mod stream;
pub mod stream_set;

// Re-export key public types at crate root.
pub use association::{Association, AssociationId, AssociationStats, StreamStats};
pub use config::PolicyConfig;
pub use error::{Result, StrandPolicyError};
pub use message::{NetMessage, OutboundMessage, SerializedMessage};
pub use policy::{
    BlockPriorityStreamPolicy, DefaultStreamPolicy, Policy, StreamPolicy, StreamPolicyKind,
};
pub use priority::{classify_priority, MessagePriority};
pub use requester::{ChannelStreamRequester, StreamRequest, StreamRequestQueue, StreamRequester};
pub use stream::{ReadySets, Received, ServiceOutcome, SocketToken, Stream, StreamType};
pub use stream_set::StreamSet;
