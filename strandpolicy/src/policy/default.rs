//! Single-stream policy: everything goes over the general stream.

use crate::error::{Result, StrandPolicyError};
use crate::message::OutboundMessage;
use crate::policy::StreamPolicy;
use crate::stream::{ReadySets, Received, ServiceOutcome, Stream, StreamType};
use crate::stream_set::StreamSetView;

/// Used when no additional streams were negotiated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultStreamPolicy;

impl DefaultStreamPolicy {
    pub const POLICY_NAME: &'static str = "Default";
}

impl StreamPolicy for DefaultStreamPolicy {
    fn policy_name(&self) -> &'static str {
        Self::POLICY_NAME
    }

    fn next_message<S: Stream>(&self, mut streams: StreamSetView<'_, S>) -> Received {
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
        match streams.get_mut(StreamType::General) {
            Some(general) => general.service_readiness(ready, config),
            None => ServiceOutcome::default(),
        }
    }

    fn push_message<S: Stream>(
        &self,
        mut streams: StreamSetView<'_, S>,
        _stream_type: StreamType,
        msg: OutboundMessage,
    ) -> Result<usize> {
        match streams.get_mut(StreamType::General) {
            Some(general) => Ok(general.send(msg)),
            None => Err(StrandPolicyError::NoStreamAvailable {
                stream_type: StreamType::General,
                command: msg.command().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::message::{command, SerializedMessage};
    use crate::stream::mock::MockStream;
    use crate::stream_set::StreamSet;

    fn outbound(cmd: &str) -> OutboundMessage {
        OutboundMessage::new(Bytes::from_static(&[0; 24]), SerializedMessage::new(cmd, Bytes::new()))
    }

    #[test]
    fn empty_set_has_no_messages() {
        let mut streams: StreamSet<MockStream> = StreamSet::new();
        for _ in 0..3 {
            assert_eq!(DefaultStreamPolicy.next_message(streams.view_mut()), Received::empty());
        }
    }

    #[test]
    fn empty_set_service_is_noop() {
        let mut streams: StreamSet<MockStream> = StreamSet::new();
        let out = DefaultStreamPolicy.service_sockets(streams.view_mut(), &ReadySets::new(), &());
        assert_eq!(out, ServiceOutcome::default());
    }

    #[test]
    fn empty_set_push_fails() {
        let mut streams: StreamSet<MockStream> = StreamSet::new();
        let err = DefaultStreamPolicy
            .push_message(streams.view_mut(), StreamType::Unknown, outbound(command::TX))
            .unwrap_err();
        assert!(matches!(err, StrandPolicyError::NoStreamAvailable { .. }));
    }

    #[test]
    fn set_without_general_is_idle() {
        let mut streams = StreamSet::new();
        streams
            .insert(StreamType::Data1, MockStream::with_service(3, 2))
            .unwrap();
        streams.get_mut(StreamType::Data1).unwrap().inbound =
            MockStream::with_inbound(&["block"]).inbound;

        assert_eq!(DefaultStreamPolicy.next_message(streams.view_mut()), Received::empty());

        let out = DefaultStreamPolicy.service_sockets(streams.view_mut(), &ReadySets::new(), &());
        assert_eq!(out, ServiceOutcome::default());

        let err = DefaultStreamPolicy
            .push_message(streams.view_mut(), StreamType::Unknown, outbound(command::TX))
            .unwrap_err();
        assert_eq!(
            err,
            StrandPolicyError::NoStreamAvailable {
                stream_type: StreamType::General,
                command: "tx".into(),
            }
        );

        let data1 = streams.get(StreamType::Data1).unwrap();
        assert_eq!(data1.service_calls, 0);
        assert_eq!(data1.receive_calls, 0);
        assert!(data1.sent.is_empty());
    }

    #[test]
    fn push_always_uses_general() {
        let mut streams = StreamSet::new();
        streams.insert(StreamType::General, MockStream::new()).unwrap();
        streams.insert(StreamType::Data1, MockStream::new()).unwrap();

        for (hint, cmd) in [
            (StreamType::Unknown, command::BLOCK),
            (StreamType::Data1, command::PING),
            (StreamType::Unknown, command::TX),
        ] {
            let n = DefaultStreamPolicy
                .push_message(streams.view_mut(), hint, outbound(cmd))
                .unwrap();
            assert_eq!(n, 24);
        }
        assert_eq!(streams.get(StreamType::General).unwrap().sent.len(), 3);
        assert!(streams.get(StreamType::Data1).unwrap().sent.is_empty());
    }

    #[test]
    fn reads_and_services_only_general() {
        let mut streams = StreamSet::new();
        streams
            .insert(StreamType::General, MockStream::with_service(10, 5))
            .unwrap();
        streams
            .insert(StreamType::Data1, MockStream::with_service(3, 2))
            .unwrap();
        streams.get_mut(StreamType::General).unwrap().inbound =
            MockStream::with_inbound(&["inv", "tx"]).inbound;

        let out = DefaultStreamPolicy.service_sockets(streams.view_mut(), &ReadySets::new(), &());
        assert_eq!(out.bytes_recv, 10);
        assert_eq!(out.bytes_sent, 5);
        assert_eq!(streams.get(StreamType::Data1).unwrap().service_calls, 0);

        let got = DefaultStreamPolicy.next_message(streams.view_mut());
        assert_eq!(got.message.unwrap().command(), "inv");
        assert!(got.more);
    }
}
