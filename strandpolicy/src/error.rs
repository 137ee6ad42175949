use thiserror::Error;

use crate::stream::StreamType;

/// All errors produced by the StrandPolicy layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StrandPolicyError {
    #[error("no stream available of type {stream_type} for message of type {command}")]
    NoStreamAvailable {
        stream_type: StreamType,
        command: String,
    },

    #[error("unknown stream policy: {0}")]
    UnknownPolicy(String),

    #[error("invalid stream type: {0}")]
    InvalidStreamType(String),

    #[error("stream {0} already exists")]
    StreamAlreadyExists(StreamType),

    #[error("stream {0} not found")]
    StreamNotFound(StreamType),

    #[error("no stream policy in common with peer")]
    NoCommonPolicy,
}

pub type Result<T> = std::result::Result<T, StrandPolicyError>;
