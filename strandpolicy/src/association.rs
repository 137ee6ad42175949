//! Per-peer association: the stream set and the policy that drives it.
//!
//! An association groups every stream opened to one peer under a shared
//! identifier. The connection layer adds streams as they are established and
//! calls into the association once per I/O cycle; the association hands the
//! current stream set to its policy on every call.

use std::fmt;
use std::net::SocketAddr;

use parking_lot::Mutex;

use crate::error::Result;
use crate::message::OutboundMessage;
use crate::policy::{Policy, StreamPolicy};
use crate::requester::StreamRequester;
use crate::stream::{ReadySets, Received, ServiceOutcome, Stream, StreamType};
use crate::stream_set::StreamSet;

/// Opaque token tying the streams of one logical connection together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssociationId([u8; 16]);

impl AssociationId {
    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(rand::random::<[u8; 16]>())
    }

    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for AssociationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

/// Byte counters for one stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamStats {
    pub stream_type: StreamType,
    pub bytes_recv: u64,
    pub bytes_sent: u64,
}

/// Snapshot of an association's telemetry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationStats {
    pub policy_name: &'static str,
    pub streams: Vec<StreamStats>,
    /// Totals accumulated across every `service_sockets` call.
    pub bytes_recv: u64,
    pub bytes_sent: u64,
}

struct Inner<S> {
    streams: StreamSet<S>,
    bytes_recv: u64,
    bytes_sent: u64,
}

/// All streams to one peer plus the policy selected for them.
pub struct Association<S: Stream> {
    id: AssociationId,
    peer: SocketAddr,
    policy: Mutex<Policy>,
    inner: Mutex<Inner<S>>,
}

impl<S: Stream> Association<S> {
    /// Create an association with a freshly generated identifier.
    pub fn new(peer: SocketAddr, policy: Policy) -> Self {
        Self::with_id(peer, AssociationId::random(), policy)
    }

    pub fn with_id(peer: SocketAddr, id: AssociationId, policy: Policy) -> Self {
        Self {
            id,
            peer,
            policy: Mutex::new(policy),
            inner: Mutex::new(Inner {
                streams: StreamSet::new(),
                bytes_recv: 0,
                bytes_sent: 0,
            }),
        }
    }

    pub fn id(&self) -> AssociationId {
        self.id
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub fn policy(&self) -> Policy {
        *self.policy.lock()
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy().policy_name()
    }

    /// Replace the policy, e.g. once negotiation with the peer completes.
    pub fn set_policy(&self, policy: Policy) {
        tracing::debug!(assoc = %self.id, policy = policy.policy_name(), "setting stream policy");
        *self.policy.lock() = policy;
    }

    /// Let the policy request whatever extra streams it needs.
    pub fn open_required_streams(&self, requester: &dyn StreamRequester) {
        self.policy().setup(requester, self.peer, &self.id);
    }

    /// Register a newly established stream.
    pub fn add_stream(&self, stream_type: StreamType, stream: S) -> Result<()> {
        self.inner.lock().streams.insert(stream_type, stream)?;
        tracing::debug!(assoc = %self.id, %stream_type, "stream added");
        Ok(())
    }

    /// Remove a stream, returning it to the caller.
    pub fn remove_stream(&self, stream_type: StreamType) -> Result<S> {
        let stream = self.inner.lock().streams.remove(stream_type)?;
        tracing::debug!(assoc = %self.id, %stream_type, "stream removed");
        Ok(stream)
    }

    pub fn stream_types(&self) -> Vec<StreamType> {
        self.inner.lock().streams.types()
    }

    /// Drop every stream.
    pub fn shutdown(&self) {
        let mut inner = self.inner.lock();
        tracing::debug!(assoc = %self.id, streams = inner.streams.len(), "shutting down association");
        inner.streams.clear();
    }

    pub fn service_sockets(&self, ready: &ReadySets, config: &S::Config) -> ServiceOutcome {
        let policy = self.policy();
        let mut inner = self.inner.lock();
        let outcome = policy.service_sockets(inner.streams.view_mut(), ready, config);
        inner.bytes_recv += outcome.bytes_recv as u64;
        inner.bytes_sent += outcome.bytes_sent as u64;
        outcome
    }

    pub fn next_message(&self) -> Received {
        let policy = self.policy();
        policy.next_message(self.inner.lock().streams.view_mut())
    }

    pub fn push_message(&self, stream_type: StreamType, msg: OutboundMessage) -> Result<usize> {
        let policy = self.policy();
        let result = policy.push_message(self.inner.lock().streams.view_mut(), stream_type, msg);
        if let Err(e) = &result {
            tracing::warn!(assoc = %self.id, peer = %self.peer, error = %e, "failed to push message");
        }
        result
    }

    pub fn stats(&self) -> AssociationStats {
        let policy_name = self.policy_name();
        let inner = self.inner.lock();
        let streams = inner
            .streams
            .iter()
            .map(|(stream_type, s)| StreamStats {
                stream_type,
                bytes_recv: s.total_bytes_recv(),
                bytes_sent: s.total_bytes_sent(),
            })
            .collect();
        AssociationStats {
            policy_name,
            streams,
            bytes_recv: inner.bytes_recv,
            bytes_sent: inner.bytes_sent,
        }
    }
}
