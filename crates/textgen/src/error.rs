use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, GenerationError>;

impl GenerationError {
    /// Transient failures worth another attempt.
    ///
    /// 408 and 429 are the only 4xx codes retried; a malformed body will
    /// not get better by asking again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::Transport(_) => true,
            Self::Status { status, .. } => *status == 408 || *status == 429 || *status >= 500,
            Self::InvalidResponse(_) => false,
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(GenerationError::Timeout.is_retryable());
        assert!(GenerationError::Transport("reset".into()).is_retryable());
        assert!(GenerationError::Status { status: 503, body: String::new() }.is_retryable());
        assert!(GenerationError::Status { status: 429, body: String::new() }.is_retryable());
        assert!(!GenerationError::Status { status: 401, body: String::new() }.is_retryable());
        assert!(!GenerationError::InvalidResponse("no choices".into()).is_retryable());
    }
}
