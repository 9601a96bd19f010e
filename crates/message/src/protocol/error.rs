use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("message error: {source}")]
    MessageError {
        #[from]
        source: MessageError,
    },

    #[error("stream error: {source}")]
    StreamError {
        #[from]
        source: StreamError,
    },
}

/// Raised when the caller hands a message operation structurally invalid input.
///
/// Missing headers, attributes or params are never reported through this type;
/// lookups on absent keys return an empty or default result instead.
#[derive(Error, Debug)]
pub enum MessageError {
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },
}

impl MessageError {
    pub fn invalid_argument<S: ToString>(str: S) -> Self {
        Self::InvalidArgument { reason: str.to_string() }
    }
}

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("unsupported stream operation: {operation}")]
    UnsupportedOperation { operation: &'static str },

    #[error("stream is closed")]
    Closed,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl StreamError {
    pub fn unsupported(operation: &'static str) -> Self {
        Self::UnsupportedOperation { operation }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
