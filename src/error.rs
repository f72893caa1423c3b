//! Error types for the swap coordinator

use thiserror::Error;

/// Errors from the swap-matching network client.
///
/// The distinction between `Status` and `Transport` matters to callers: a
/// `Status` means the relayer received and rejected the request, while a
/// `Transport` error leaves the request's fate unknown.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("relayer returned HTTP {status} for {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response shape: {0}")]
    Decode(String),
}

impl NetworkError {
    /// Check if the error is worth retrying on the next poll interval
    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::Transport(e) => e.is_timeout() || e.is_connect(),
            // 429 and 5xx are relayer-side and transient
            NetworkError::Status { status, .. } => *status == 429 || *status >= 500,
            NetworkError::Decode(_) => false,
        }
    }
}

/// The phase of the order lifecycle an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Quote,
    Create,
    Submit,
}

/// Main error type for coordinator operations.
///
/// Each variant maps to exactly one phase of the order lifecycle so the
/// caller can always tell how far the order got before failing.
#[derive(Error, Debug)]
pub enum SwapError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("quote request failed: {0}")]
    Quote(#[source] NetworkError),

    #[error("quote is unusable: {0}")]
    InvalidQuote(String),

    #[error("entropy source failure: {0}")]
    Entropy(String),

    #[error("order create failed: {0}")]
    Create(#[source] NetworkError),

    #[error("order submit failed, order may already exist on the network: {0}")]
    Submit(#[source] NetworkError),
}

impl SwapError {
    /// Which lifecycle phase produced this error
    pub fn phase(&self) -> Phase {
        match self {
            SwapError::Config(_)
            | SwapError::Quote(_)
            | SwapError::InvalidQuote(_)
            | SwapError::Entropy(_) => Phase::Quote,
            SwapError::Create(_) => Phase::Create,
            SwapError::Submit(_) => Phase::Submit,
        }
    }

    /// Whether the order may have been published despite the local error.
    ///
    /// True only for submit-phase failures: the relayer may have accepted
    /// the order even though our call errored, and the caller must
    /// reconcile through `get_order_status`/`get_active_orders` instead of
    /// assuming nothing happened.
    pub fn order_may_exist(&self) -> bool {
        matches!(self, SwapError::Submit(_))
    }
}

/// Result type for coordinator operations
pub type SwapResult<T> = Result<T, SwapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_classify_by_code() {
        let rate_limited = NetworkError::Status {
            status: 429,
            url: "https://relayer/quote".into(),
            body: "too many requests".into(),
        };
        assert!(rate_limited.is_retryable());

        let bad_request = NetworkError::Status {
            status: 400,
            url: "https://relayer/quote".into(),
            body: "invalid token pair".into(),
        };
        assert!(!bad_request.is_retryable());

        let upstream = NetworkError::Status {
            status: 503,
            url: "https://relayer/status".into(),
            body: "".into(),
        };
        assert!(upstream.is_retryable());
    }

    #[test]
    fn submit_failures_flag_possible_order() {
        let decode = NetworkError::Decode("missing quoteId".into());
        assert!(!SwapError::Create(decode).order_may_exist());

        let decode = NetworkError::Decode("missing orderHash".into());
        let err = SwapError::Submit(decode);
        assert!(err.order_may_exist());
        assert_eq!(err.phase(), Phase::Submit);
    }
}
