//! Requests for additional streams, sent to the connection manager.
//!
//! Policies that need more than the general stream ask for them during setup.
//! The request is fire-and-forget: the policy never learns whether the stream
//! was established and keeps working with whatever streams show up.

use std::net::SocketAddr;

use crossbeam_queue::SegQueue;
use tokio::sync::mpsc;

use crate::association::AssociationId;
use crate::stream::StreamType;

/// A queued request to open a new stream to a peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRequest {
    pub peer: SocketAddr,
    pub stream_type: StreamType,
    pub association_id: AssociationId,
    /// Policy that asked for the stream; sent to the peer with the request.
    pub policy_name: String,
}

/// The connection-manager side of stream setup.
pub trait StreamRequester: Send + Sync {
    /// Ask for a new stream. Must not block and must not fail loudly.
    fn request_new_stream(
        &self,
        peer: SocketAddr,
        stream_type: StreamType,
        association_id: &AssociationId,
        policy_name: &str,
    );
}

/// Lock-free request queue drained by the connection manager's own loop.
#[derive(Debug, Default)]
pub struct StreamRequestQueue {
    pending: SegQueue<StreamRequest>,
}

impl StreamRequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every pending request, oldest first.
    pub fn drain(&self) -> Vec<StreamRequest> {
        let mut out = Vec::with_capacity(self.pending.len());
        while let Some(req) = self.pending.pop() {
            out.push(req);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl StreamRequester for StreamRequestQueue {
    fn request_new_stream(
        &self,
        peer: SocketAddr,
        stream_type: StreamType,
        association_id: &AssociationId,
        policy_name: &str,
    ) {
        tracing::debug!(%peer, %stream_type, %association_id, policy_name, "queueing new stream");
        self.pending.push(StreamRequest {
            peer,
            stream_type,
            association_id: *association_id,
            policy_name: policy_name.to_string(),
        });
    }
}

/// Forwards requests to an async connection manager over a tokio channel.
///
/// If the manager has shut down the request is dropped with a warning.
#[derive(Debug, Clone)]
pub struct ChannelStreamRequester {
    tx: mpsc::UnboundedSender<StreamRequest>,
}

impl ChannelStreamRequester {
    pub fn new(tx: mpsc::UnboundedSender<StreamRequest>) -> Self {
        Self { tx }
    }

    /// Create a requester together with the receiving end for the manager.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<StreamRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl StreamRequester for ChannelStreamRequester {
    fn request_new_stream(
        &self,
        peer: SocketAddr,
        stream_type: StreamType,
        association_id: &AssociationId,
        policy_name: &str,
    ) {
        let req = StreamRequest {
            peer,
            stream_type,
            association_id: *association_id,
            policy_name: policy_name.to_string(),
        };
        if self.tx.send(req).is_err() {
            tracing::warn!(
                %peer,
                %stream_type,
                "connection manager gone, dropping new stream request"
            );
        }
    }
}
