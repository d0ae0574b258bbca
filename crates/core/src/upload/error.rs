//! Upload error types.

use thiserror::Error;

/// Errors raised while receiving a chunked request.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The transport failed before end-of-stream. No partial result is kept.
    #[error("failed to read request stream: {0}")]
    StreamRead(String),

    /// A metadata fragment could not be decoded.
    #[error("invalid request metadata: {0}")]
    InvalidMetadata(String),
}

impl UploadError {
    /// Create a stream read error.
    #[must_use]
    pub fn stream_read(msg: impl Into<String>) -> Self {
        Self::StreamRead(msg.into())
    }

    /// Create an invalid metadata error.
    #[must_use]
    pub fn invalid_metadata(msg: impl Into<String>) -> Self {
        Self::InvalidMetadata(msg.into())
    }
}
