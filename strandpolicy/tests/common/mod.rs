//! Shared test helpers for strandpolicy integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;

use bytes::Bytes;

use strandpolicy::{
    NetMessage, OutboundMessage, ReadySets, Received, SerializedMessage, ServiceOutcome,
    SocketToken, Stream,
};

/// Per-cycle limits handed through to every stream.
#[derive(Debug, Clone)]
pub struct LoopbackConfig {
    pub max_reads_per_cycle: usize,
}

impl Default for LoopbackConfig {
    fn default() -> Self {
        Self {
            max_reads_per_cycle: 16,
        }
    }
}

/// In-memory stream: messages "arrive on the socket" via `deliver` and only
/// become readable after a readiness cycle in which the socket was readable.
/// Outbound messages sit in `outbox` until the socket is writable.
pub struct LoopbackStream {
    pub token: SocketToken,
    wire: VecDeque<NetMessage>,
    ready: VecDeque<NetMessage>,
    pub outbox: Vec<OutboundMessage>,
    pub flushed: Vec<OutboundMessage>,
    pub service_calls: usize,
    pub receive_calls: usize,
    recv_total: u64,
    sent_total: u64,
}

impl LoopbackStream {
    pub fn new(token: u64) -> Self {
        Self {
            token: SocketToken(token),
            wire: VecDeque::new(),
            ready: VecDeque::new(),
            outbox: Vec::new(),
            flushed: Vec::new(),
            service_calls: 0,
            receive_calls: 0,
            recv_total: 0,
            sent_total: 0,
        }
    }

    /// Put a message on the wire towards us.
    pub fn deliver(&mut self, command: &str, payload: &'static [u8]) {
        self.wire
            .push_back(NetMessage::new(command, Bytes::from_static(payload)));
    }

    /// Commands of everything written so far, queued or flushed.
    pub fn sent_commands(&self) -> Vec<String> {
        self.flushed
            .iter()
            .chain(self.outbox.iter())
            .map(|m| m.command().to_string())
            .collect()
    }
}

impl Stream for LoopbackStream {
    type Config = LoopbackConfig;

    fn receive_next(&mut self) -> Received {
        self.receive_calls += 1;
        let message = self.ready.pop_front();
        Received {
            message,
            more: !self.ready.is_empty(),
        }
    }

    fn service_readiness(&mut self, ready: &ReadySets, config: &LoopbackConfig) -> ServiceOutcome {
        self.service_calls += 1;
        let mut out = ServiceOutcome::default();

        if ready.is_readable(self.token) {
            for _ in 0..config.max_reads_per_cycle {
                let Some(msg) = self.wire.pop_front() else {
                    break;
                };
                out.bytes_recv += msg.payload().len();
                out.got_new_messages = true;
                self.ready.push_back(msg);
            }
        }

        if ready.is_writable(self.token) {
            for msg in self.outbox.drain(..) {
                out.bytes_sent += msg.total_size();
                self.flushed.push(msg);
            }
        }

        self.recv_total += out.bytes_recv as u64;
        self.sent_total += out.bytes_sent as u64;
        out
    }

    fn send(&mut self, msg: OutboundMessage) -> usize {
        let size = msg.total_size();
        self.outbox.push(msg);
        size
    }

    fn total_bytes_recv(&self) -> u64 {
        self.recv_total
    }

    fn total_bytes_sent(&self) -> u64 {
        self.sent_total
    }
}

/// A 24-byte header plus the given payload.
pub fn outbound(command: &str, payload: &'static [u8]) -> OutboundMessage {
    OutboundMessage::new(
        Bytes::from_static(&[0u8; 24]),
        SerializedMessage::new(command, Bytes::from_static(payload)),
    )
}

/// Readiness with every listed socket readable and writable.
pub fn all_ready(tokens: &[u64]) -> ReadySets {
    let mut ready = ReadySets::new();
    for t in tokens {
        ready.mark_readable(SocketToken(*t));
        ready.mark_writable(SocketToken(*t));
    }
    ready
}
