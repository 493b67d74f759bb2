use std::io;
use thiserror::Error;

use crate::stream::StreamError;

/// Top-level error type for the message model.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("stream error: {source}")]
    Stream {
        #[from]
        source: StreamError,
    },

    #[error("send error: {source}")]
    Send {
        #[from]
        source: SendError,
    },

    #[error("http protocol version cannot be empty")]
    EmptyVersion,

    #[error("invalid or unsupported http protocol version: {0}")]
    InvalidVersion(String),

    #[error("invalid uri: {reason}")]
    InvalidUri { reason: String },

    #[error("json serialization failed: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl HttpError {
    pub fn invalid_uri<S: ToString>(reason: S) -> Self {
        Self::InvalidUri { reason: reason.to_string() }
    }
}

/// Errors raised while sending a response to a transport.
///
/// Sending is terminal: a failure aborts the send, nothing is retried.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("stream error: {source}")]
    Stream {
        #[from]
        source: StreamError,
    },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
