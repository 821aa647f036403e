// Error types for the reader core.
// Every variant classifies a single fetch; all are non-fatal and per-request.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("bad status: {0}")]
    BadStatus(u16),

    #[error("bad url: {0}")]
    BadUrl(String),

    #[error("Timeout")]
    Timeout,

    #[error("network error: {0}")]
    Network(reqwest::Error),

    #[error("bad body: {0}")]
    BadBody(String),
}

pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_is_stable() {
        // Presentation renders this string verbatim on error leaves.
        assert_eq!(FetchError::Timeout.to_string(), "Timeout");
    }

    #[test]
    fn bad_status_carries_code() {
        assert_eq!(FetchError::BadStatus(503).to_string(), "bad status: 503");
    }
}
