use std::io;
use thiserror::Error;

/// Errors surfaced by stream operations.
///
/// No stream error is recovered internally; every failure propagates
/// directly to the caller.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The operation is not part of this stream variant's capability set,
    /// e.g. seeking a callback stream.
    #[error("{operation} is not supported by this stream")]
    Unsupported { operation: &'static str },

    /// The underlying handle was closed or detached before the call.
    #[error("stream is detached")]
    Detached,

    /// An underlying I/O call failed. The OS error text is preserved.
    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl StreamError {
    pub fn unsupported(operation: &'static str) -> Self {
        Self::Unsupported { operation }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
