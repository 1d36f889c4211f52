//! Script validation error types.

/// Specific reasons a generated script is rejected before rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ValidationErrorKind {
    /// No class derives from a recognised scene base
    #[display("Generated code does not contain a valid Scene class")]
    NoEntryPoint,
    /// The source is not syntactically valid
    #[display("Generated code could not be parsed: {}", _0)]
    Unparseable(String),
    /// Several scene classes exist and none matches the declared name
    #[display("Ambiguous scene declaration: declared '{}' but found {}", declared, candidates)]
    AmbiguousEntryPoint {
        /// Name the LLM declared
        declared: String,
        /// Comma-separated qualifying class names found in source
        candidates: String,
    },
    /// The parser could not be initialised
    #[display("Failed to initialise source parser: {}", _0)]
    ParserInit(String),
}

/// Script validation error with location tracking.
///
/// # Examples
///
/// ```
/// use manimate_error::{ValidationError, ValidationErrorKind};
///
/// let err = ValidationError::new(ValidationErrorKind::NoEntryPoint);
/// assert!(format!("{}", err).contains("Scene class"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    /// The specific error condition
    pub kind: ValidationErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new ValidationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
