use thiserror::Error;

/// Errors surfaced by the engine
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or unusable credentials for the requested vendor
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Vendor returned an HTTP error status
    #[error("vendor returned {status}: {message}")]
    Provider {
        /// HTTP status code
        status: u16,
        /// Vendor error message when the body was parseable, raw body otherwise
        message: String,
    },

    /// Connection-level failure (reset, timeout, DNS)
    #[error("transport error: {0}")]
    Transport(String),

    /// Response body or event did not match the vendor's documented shape.
    /// Never retried: a structural mismatch cannot be fixed by retrying.
    #[error("unrecognized response shape: {0}")]
    ResponseFormat(String),

    /// Canonical request violated a model invariant
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Stateful continuation was attempted without a token from the prior turn
    #[error("continuation requires a token from the previous turn")]
    MissingContinuationState,

    /// The turn failed after content had already been delivered to the
    /// caller's sink; the partial output cannot be silently discarded
    #[error("stream interrupted after {streamed_bytes} bytes: {message}")]
    StreamInterrupted {
        /// Bytes already forwarded to the sink
        streamed_bytes: usize,
        /// Underlying failure
        message: String,
    },

    /// The caller cancelled the in-flight request
    #[error("request cancelled")]
    Cancelled,
}

impl Error {
    /// Whether the transport layer may retry the attempt
    ///
    /// Only transient transport failures and rate-limit / upstream-outage
    /// statuses qualify. The transport layer is the sole owner of retry
    /// decisions.
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Provider { status, .. } => *status == 429 || (*status >= 500 && *status < 600),
            _ => false,
        }
    }
}
