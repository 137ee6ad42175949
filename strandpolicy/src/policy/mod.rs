//! Stream policies and the contract they share.
//!
//! Two policies exist, selected once per connection by a name negotiated with
//! the peer:
//! - **Default**: a single general-purpose stream carries everything.
//! - **BlockPriority**: block traffic and keepalives travel on a dedicated
//!   `DATA1` stream which is always read before the general stream.
//!
//! Policies keep no state between calls. The stream set is passed in on every
//! call and never retained, so streams that appear later are picked up on the
//! next call.

pub mod block_priority;
pub mod default;
pub mod route;

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::association::AssociationId;
use crate::error::{Result, StrandPolicyError};
use crate::message::OutboundMessage;
use crate::requester::StreamRequester;
use crate::stream::{ReadySets, Received, ServiceOutcome, Stream, StreamType};
use crate::stream_set::StreamSetView;

pub use block_priority::BlockPriorityStreamPolicy;
pub use default::DefaultStreamPolicy;

/// Contract shared by every stream policy.
pub trait StreamPolicy {
    /// Stable name exchanged with the peer during negotiation.
    fn policy_name(&self) -> &'static str;

    /// Ask the connection manager for any extra streams this policy needs.
    fn setup(
        &self,
        _requester: &dyn StreamRequester,
        _peer: SocketAddr,
        _association_id: &AssociationId,
    ) {
    }

    /// Pull the next inbound message to hand to the application.
    fn next_message<S: Stream>(&self, streams: StreamSetView<'_, S>) -> Received;

    /// Drive socket readiness for the streams this policy reads from.
    fn service_sockets<S: Stream>(
        &self,
        streams: StreamSetView<'_, S>,
        ready: &ReadySets,
        config: &S::Config,
    ) -> ServiceOutcome;

    /// Route an outbound message to a stream. `stream_type` is either an
    /// explicit request or `StreamType::Unknown`.
    fn push_message<S: Stream>(
        &self,
        streams: StreamSetView<'_, S>,
        stream_type: StreamType,
        msg: OutboundMessage,
    ) -> Result<usize>;
}

/// The closed set of known policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamPolicyKind {
    Default,
    BlockPriority,
}

impl StreamPolicyKind {
    pub const ALL: [StreamPolicyKind; 2] =
        [StreamPolicyKind::BlockPriority, StreamPolicyKind::Default];

    pub fn name(self) -> &'static str {
        match self {
            StreamPolicyKind::Default => DefaultStreamPolicy::POLICY_NAME,
            StreamPolicyKind::BlockPriority => BlockPriorityStreamPolicy::POLICY_NAME,
        }
    }
}

impl fmt::Display for StreamPolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StreamPolicyKind {
    type Err = StrandPolicyError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            DefaultStreamPolicy::POLICY_NAME => Ok(StreamPolicyKind::Default),
            BlockPriorityStreamPolicy::POLICY_NAME => Ok(StreamPolicyKind::BlockPriority),
            other => Err(StrandPolicyError::UnknownPolicy(other.to_string())),
        }
    }
}

/// A policy instance, one per connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Default(DefaultStreamPolicy),
    BlockPriority(BlockPriorityStreamPolicy),
}

impl Policy {
    pub fn from_kind(kind: StreamPolicyKind) -> Self {
        match kind {
            StreamPolicyKind::Default => Policy::Default(DefaultStreamPolicy),
            StreamPolicyKind::BlockPriority => Policy::BlockPriority(BlockPriorityStreamPolicy),
        }
    }

    /// Instantiate the policy with the given negotiated name.
    pub fn from_name(name: &str) -> Result<Self> {
        name.parse().map(Self::from_kind)
    }

    pub fn kind(&self) -> StreamPolicyKind {
        match self {
            Policy::Default(_) => StreamPolicyKind::Default,
            Policy::BlockPriority(_) => StreamPolicyKind::BlockPriority,
        }
    }
}

impl Default for Policy {
    fn default() -> Self {
        Policy::Default(DefaultStreamPolicy)
    }
}

impl StreamPolicy for Policy {
    fn policy_name(&self) -> &'static str {
        match self {
            Policy::Default(p) => p.policy_name(),
            Policy::BlockPriority(p) => p.policy_name(),
        }
    }

    fn setup(
        &self,
        requester: &dyn StreamRequester,
        peer: SocketAddr,
        association_id: &AssociationId,
    ) {
        match self {
            Policy::Default(p) => p.setup(requester, peer, association_id),
            Policy::BlockPriority(p) => p.setup(requester, peer, association_id),
        }
    }

    fn next_message<S: Stream>(&self, streams: StreamSetView<'_, S>) -> Received {
        match self {
            Policy::Default(p) => p.next_message(streams),
            Policy::BlockPriority(p) => p.next_message(streams),
        }
    }

    fn service_sockets<S: Stream>(
        &self,
        streams: StreamSetView<'_, S>,
        ready: &ReadySets,
        config: &S::Config,
    ) -> ServiceOutcome {
        match self {
            Policy::Default(p) => p.service_sockets(streams, ready, config),
            Policy::BlockPriority(p) => p.service_sockets(streams, ready, config),
        }
    }

    fn push_message<S: Stream>(
        &self,
        streams: StreamSetView<'_, S>,
        stream_type: StreamType,
        msg: OutboundMessage,
    ) -> Result<usize> {
        match self {
            Policy::Default(p) => p.push_message(streams, stream_type, msg),
            Policy::BlockPriority(p) => p.push_message(streams, stream_type, msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requester::StreamRequestQueue;

    #[test]
    fn names_are_stable() {
        assert_eq!(Policy::default().policy_name(), "Default");
        assert_eq!(
            Policy::from_kind(StreamPolicyKind::BlockPriority).policy_name(),
            "BlockPriority"
        );
    }

    #[test]
    fn from_name_selects_variant() {
        assert_eq!(
            Policy::from_name("BlockPriority").unwrap().kind(),
            StreamPolicyKind::BlockPriority
        );
        assert_eq!(Policy::from_name("Default").unwrap().kind(), StreamPolicyKind::Default);
        assert_eq!(
            Policy::from_name("blockpriority"),
            Err(StrandPolicyError::UnknownPolicy("blockpriority".into()))
        );
    }

    #[test]
    fn default_setup_requests_nothing() {
        let queue = StreamRequestQueue::new();
        let id = AssociationId::from_bytes([0; 16]);
        Policy::default().setup(&queue, "127.0.0.1:1".parse().unwrap(), &id);
        assert!(queue.is_empty());
    }

    #[test]
    fn block_priority_setup_requests_stream() {
        let queue = StreamRequestQueue::new();
        let id = AssociationId::from_bytes([0; 16]);
        Policy::from_kind(StreamPolicyKind::BlockPriority).setup(
            &queue,
            "127.0.0.1:1".parse().unwrap(),
            &id,
        );
        assert_eq!(queue.len(), 1);
    }
}
