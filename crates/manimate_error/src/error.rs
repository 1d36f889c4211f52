//! Top-level error wrapper types.

use crate::{ConfigError, LlmError, PipelineError, RenderError, StorageError, ValidationError};

/// Every error manimate can surface.
///
/// # Examples
///
/// ```
/// use manimate_error::{ManimateError, StorageError, StorageErrorKind};
///
/// let storage = StorageError::new(StorageErrorKind::InvalidPath("".to_string()));
/// let err: ManimateError = storage.into();
/// assert!(format!("{}", err).contains("Storage Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum ManimateErrorKind {
    /// LLM gateway error
    #[from(LlmError)]
    Llm(LlmError),
    /// Script validation error
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Renderer environment fault
    #[from(RenderError)]
    Render(RenderError),
    /// Storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Terminal pipeline failure
    #[from(PipelineError)]
    Pipeline(PipelineError),
}

/// manimate error with kind discrimination.
///
/// # Examples
///
/// ```
/// use manimate_error::{ConfigError, ManimateResult};
///
/// fn might_fail() -> ManimateResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("manimate error: {}", _0)]
pub struct ManimateError(Box<ManimateErrorKind>);

impl ManimateError {
    /// Create a new error from a kind.
    pub fn new(kind: ManimateErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ManimateErrorKind {
        &self.0
    }

    /// Remediation hint when this is a terminal pipeline failure.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self.kind() {
            ManimateErrorKind::Pipeline(err) => Some(err.suggestion()),
            ManimateErrorKind::Llm(err) if matches!(err.kind, crate::LlmErrorKind::MissingApiKey(_)) => {
                Some("Try: Set OPENAI_API_KEY environment variable or use --api-key")
            }
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to ManimateErrorKind
impl<T> From<T> for ManimateError
where
    T: Into<ManimateErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for manimate operations.
pub type ManimateResult<T> = std::result::Result<T, ManimateError>;
