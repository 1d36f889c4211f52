//! LLM gateway error types and retry classification.

/// LLM gateway error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum LlmErrorKind {
    /// API key not found in environment
    #[display("{} environment variable not set", _0)]
    MissingApiKey(String),
    /// Failed to create the HTTP client
    #[display("Failed to create LLM client: {}", _0)]
    ClientCreation(String),
    /// The call envelope could not be assembled
    #[display("Failed to build request: {}", _0)]
    InvalidRequest(String),
    /// Request could not be delivered
    #[display("LLM request failed: {}", _0)]
    Transport(String),
    /// Request exceeded its deadline
    #[display("LLM request timed out: {}", _0)]
    Timeout(String),
    /// HTTP error with status code and message
    #[display("HTTP {} error: {}", status_code, message)]
    Http {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// Response body could not be decoded
    #[display("Failed to parse LLM response: {}", _0)]
    ResponseParse(String),
    /// Response carried no usable text
    #[display("Empty response from LLM")]
    EmptyResponse,
    /// Output did not parse against the requested schema
    #[display("Output does not match schema '{}': {}", schema, message)]
    SchemaMismatch {
        /// Schema name
        schema: String,
        /// What went wrong
        message: String,
    },
    /// The requested schema itself is unusable
    #[display("Invalid output schema '{}': {}", schema, message)]
    InvalidSchema {
        /// Schema name
        schema: String,
        /// What went wrong
        message: String,
    },
}

impl LlmErrorKind {
    /// Check if this error type should be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmErrorKind::Http { status_code, .. } => {
                matches!(*status_code, 408 | 429 | 500 | 502 | 503 | 504)
            }
            LlmErrorKind::Transport(_) => true,
            LlmErrorKind::Timeout(_) => true,
            _ => false,
        }
    }

    /// Get retry strategy parameters for this error type.
    ///
    /// Returns `(initial_backoff_ms, max_retries, max_delay_secs)`.
    pub fn retry_strategy_params(&self) -> (u64, usize, u64) {
        match self {
            LlmErrorKind::Http { status_code, .. } => match *status_code {
                429 => (5000, 3, 40),
                503 => (2000, 5, 60),
                500 | 502 | 504 => (1000, 3, 8),
                408 => (2000, 4, 30),
                _ => (2000, 5, 60),
            },
            LlmErrorKind::Timeout(_) => (2000, 3, 30),
            LlmErrorKind::Transport(_) => (1000, 3, 10),
            _ => (1000, 3, 30),
        }
    }
}

/// LLM gateway error with source location tracking.
///
/// # Examples
///
/// ```
/// use manimate_error::{LlmError, LlmErrorKind};
///
/// let err = LlmError::new(LlmErrorKind::MissingApiKey("OPENAI_API_KEY".to_string()));
/// assert!(format!("{}", err).contains("OPENAI_API_KEY"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("LLM Error: {} at line {} in {}", kind, line, file)]
pub struct LlmError {
    /// The kind of error that occurred
    pub kind: LlmErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl LlmError {
    /// Create a new LlmError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: LlmErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Result type for gateway operations.
pub type LlmResult<T> = Result<T, LlmError>;

/// Trait for errors that support retry logic.
///
/// # Examples
///
/// ```
/// use manimate_error::{LlmError, LlmErrorKind, RetryableError};
///
/// let err = LlmError::new(LlmErrorKind::Http {
///     status_code: 503,
///     message: "Service unavailable".to_string(),
/// });
///
/// assert!(err.is_retryable());
/// let (backoff, retries, _max_delay) = err.retry_strategy_params();
/// assert_eq!(backoff, 2000);
/// assert_eq!(retries, 5);
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    ///
    /// Transient errors like 503, 429 or network timeouts return true.
    /// Permanent errors like 401, 400 or a schema mismatch return false.
    fn is_retryable(&self) -> bool;

    /// Get retry strategy parameters for this error.
    ///
    /// Returns `(initial_backoff_ms, max_retries, max_delay_secs)`.
    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        (1000, 3, 30)
    }
}

impl RetryableError for LlmError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        self.kind.retry_strategy_params()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_mismatch_is_permanent() {
        let kind = LlmErrorKind::SchemaMismatch {
            schema: "generated_script".to_string(),
            message: "missing field `code`".to_string(),
        };
        assert!(!kind.is_retryable());
    }

    #[test]
    fn client_errors_are_permanent() {
        for status_code in [400, 401, 403, 404] {
            let kind = LlmErrorKind::Http {
                status_code,
                message: String::new(),
            };
            assert!(!kind.is_retryable(), "status {status_code} should not retry");
        }
    }

    #[test]
    fn transport_failures_are_transient() {
        assert!(LlmErrorKind::Transport("connection reset".into()).is_retryable());
        assert!(LlmErrorKind::Timeout("120s".into()).is_retryable());
    }
}
