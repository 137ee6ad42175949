//! Block-priority policy.
//!
//! Opens a second stream (`DATA1`) for block traffic and keepalives, reads it
//! strictly before the general stream, and routes outbound messages by their
//! priority class. Until `DATA1` exists everything runs over the general
//! stream.

use std::net::SocketAddr;

use crate::association::AssociationId;
use crate::error::{Result, StrandPolicyError};
use crate::message::OutboundMessage;
use crate::policy::route::Route;
use crate::policy::StreamPolicy;
use crate::requester::StreamRequester;
use crate::stream::{ReadySets, Received, ServiceOutcome, Stream, StreamType};
use crate::stream_set::StreamSetView;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockPriorityStreamPolicy;

impl BlockPriorityStreamPolicy {
    pub const POLICY_NAME: &'static str = "BlockPriority";

    /// The supplementary stream carrying high-priority traffic.
    pub const PRIORITY_STREAM: StreamType = StreamType::Data1;
}

impl StreamPolicy for BlockPriorityStreamPolicy {
    fn policy_name(&self) -> &'static str {
        Self::POLICY_NAME
    }

    fn setup(
        &self,
        requester: &dyn StreamRequester,
        peer: SocketAddr,
        association_id: &AssociationId,
    ) {
        tracing::debug!(%peer, %association_id, "BlockPriority policy opening required streams");
        requester.request_new_stream(
            peer,
            Self::PRIORITY_STREAM,
            association_id,
            Self::POLICY_NAME,
        );
    }

    fn next_message<S: Stream>(&self, mut streams: StreamSetView<'_, S>) -> Received {
        if let Some(priority) = streams.get_mut(Self::PRIORITY_STREAM) {
            let received = priority.receive_next();
            if received.message.is_some() {
                return received;
            }
        }

        match streams.get_mut(StreamType::General) {
            Some(general) => general.receive_next(),
            None => Received::empty(),
        }
    }

    fn service_sockets<S: Stream>(
        &self,
        mut streams: StreamSetView<'_, S>,
        ready: &ReadySets,
        config: &S::Config,
    ) -> ServiceOutcome {
        // Every stream moves bytes every cycle; only delivery is prioritised.
        let mut total = ServiceOutcome::default();
        for (_, stream) in streams.iter_mut() {
            total += stream.service_readiness(ready, config);
        }
        total
    }

    fn push_message<S: Stream>(
        &self,
        mut streams: StreamSetView<'_, S>,
        stream_type: StreamType,
        msg: OutboundMessage,
    ) -> Result<usize> {
        let route = Route::for_message(stream_type, msg.command());
        let dest = route
            .resolve(|t| streams.contains(t))
            .and_then(|t| streams.get_mut(t));

        match dest {
            Some(stream) => Ok(stream.send(msg)),
            None => Err(StrandPolicyError::NoStreamAvailable {
                stream_type: route.stream_type(),
                command: msg.command().to_string(),
            }),
        }
    }
}
