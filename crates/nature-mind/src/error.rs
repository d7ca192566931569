//! Error types for mind service communication.
//!
//! A call to the mind either reaches the service and gets a decodable
//! reply, or fails in exactly one of these ways. Whether the reply itself
//! reports success is not an error at this layer.

/// Errors that can occur while talking to the mind service.
#[derive(Debug, thiserror::Error)]
pub enum MindError {
    /// The request could not be sent or its body could not be read.
    #[error("{endpoint} request failed: {message}")]
    Transport {
        /// The endpoint being called.
        endpoint: &'static str,
        /// Description of the transport failure.
        message: String,
    },

    /// The service answered with a non-success HTTP status.
    #[error("{endpoint} returned bad status code {status}")]
    Status {
        /// The endpoint being called.
        endpoint: &'static str,
        /// The HTTP status code.
        status: u16,
    },

    /// The reply body was not the expected JSON shape.
    #[error("{endpoint} response could not be decoded: {source}")]
    Decode {
        /// The endpoint being called.
        endpoint: &'static str,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// The client could not be built from its configuration.
    #[error("invalid mind configuration: {0}")]
    Config(String),
}

impl MindError {
    /// The HTTP status code, if the failure was a bad status.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { .. } | Self::Decode { .. } | Self::Config(_) => None,
        }
    }
}
