//! Terminal pipeline failures.
//!
//! Every fatal condition raised by the generate-render-repair loop surfaces
//! as exactly one [`PipelineError`]. Recoverable conditions (review failure,
//! archival failure, render failure with budget remaining) are handled inside
//! the loop and never reach this type.

use crate::{LlmErrorKind, ValidationErrorKind};

/// The step that produced a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ScriptStage {
    /// Initial code generation
    #[display("generation")]
    Generation,
    /// Code review before the first render
    #[display("review")]
    Review,
    /// Repair after a failed render
    #[display("repair")]
    Repair,
}

/// Specific terminal failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PipelineErrorKind {
    /// Rendering tooling is unavailable
    #[display("Manim installation check failed: {}", _0)]
    Precondition(String),
    /// The brief expander could not produce a brief
    #[display("Subject matter analysis failed: {}", _0)]
    BriefFailed(LlmErrorKind),
    /// The initial generation call failed
    #[display("Failed to generate Manim script: {}", _0)]
    GenerationFailed(LlmErrorKind),
    /// A generated or repaired script has no usable entry point
    #[display("Script from {} step failed validation: {}", stage, kind)]
    Validation {
        /// Step that produced the rejected script
        stage: ScriptStage,
        /// Why it was rejected
        kind: ValidationErrorKind,
    },
    /// The repair call itself failed
    #[display("Failed to fix script after attempt {}: {}", attempt, cause)]
    RepairFailed {
        /// Render attempt whose failure was being repaired
        attempt: u32,
        /// Gateway failure
        cause: LlmErrorKind,
    },
    /// The renderer environment faulted mid-loop
    #[display("Renderer fault on attempt {}: {}", attempt, message)]
    RendererFault {
        /// Attempt during which the fault occurred
        attempt: u32,
        /// Fault description
        message: String,
    },
    /// Every render attempt failed
    #[display(
        "Animation rendering failed after {} of {} attempts for scene '{}'. Final error: {}",
        attempts,
        max_attempts,
        entry_point,
        diagnostic
    )]
    RenderExhausted {
        /// Attempts performed
        attempts: u32,
        /// Attempt budget
        max_attempts: u32,
        /// Entry point of the last script
        entry_point: String,
        /// Diagnostic from the last attempt
        diagnostic: String,
    },
}

impl PipelineErrorKind {
    /// Context-sensitive remediation hint for the caller.
    pub fn suggestion(&self) -> &'static str {
        match self {
            PipelineErrorKind::Precondition(_) => {
                "Check: Is Manim installed? Run 'manim --version'"
            }
            PipelineErrorKind::BriefFailed(cause)
            | PipelineErrorKind::GenerationFailed(cause)
            | PipelineErrorKind::RepairFailed { cause, .. } => llm_suggestion(cause),
            PipelineErrorKind::Validation { kind, .. } => match kind {
                ValidationErrorKind::NoEntryPoint | ValidationErrorKind::AmbiguousEntryPoint { .. } => {
                    "Ensure the code contains exactly one Scene class that inherits from manim.Scene"
                }
                _ => "Try: manimate animate --verbose \"simpler prompt\"",
            },
            PipelineErrorKind::RendererFault { .. } => {
                "Check that the output directory is writable and Manim runs from this shell"
            }
            PipelineErrorKind::RenderExhausted { diagnostic, .. } => {
                let lowered = diagnostic.to_lowercase();
                if lowered.contains("timed out") || lowered.contains("timeout") {
                    "Try simplifying the animation or increasing render.timeout_secs"
                } else if lowered.contains("syntax") || lowered.contains("nameerror") {
                    "Check for syntax errors or undefined variables in the generated code"
                } else {
                    "Try: manimate animate --verbose \"simpler prompt\""
                }
            }
        }
    }
}

fn llm_suggestion(cause: &LlmErrorKind) -> &'static str {
    match cause {
        LlmErrorKind::MissingApiKey(_) => {
            "Try: Set OPENAI_API_KEY environment variable or use --api-key"
        }
        LlmErrorKind::SchemaMismatch { .. } => {
            "The model returned invalid JSON. This may be a temporary issue - try again"
        }
        LlmErrorKind::Timeout(_) => {
            "Try reducing the complexity of your request or breaking it into smaller parts"
        }
        _ => "Try: manimate animate --verbose \"simpler prompt\"",
    }
}

/// Terminal pipeline failure with location tracking.
///
/// # Examples
///
/// ```
/// use manimate_error::{PipelineError, PipelineErrorKind};
///
/// let err = PipelineError::new(PipelineErrorKind::RenderExhausted {
///     attempts: 3,
///     max_attempts: 3,
///     entry_point: "CircleScene".to_string(),
///     diagnostic: "Manim rendering timed out after 300 seconds".to_string(),
/// });
/// assert!(format!("{}", err).contains("3 of 3"));
/// assert!(err.suggestion().contains("timeout"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The specific error condition
    pub kind: PipelineErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new PipelineError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Remediation hint for this failure.
    pub fn suggestion(&self) -> &'static str {
        self.kind.suggestion()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_hint_mentions_flag() {
        let kind = PipelineErrorKind::GenerationFailed(LlmErrorKind::MissingApiKey(
            "OPENAI_API_KEY".to_string(),
        ));
        assert!(kind.suggestion().contains("--api-key"));
    }

    #[test]
    fn exhausted_with_syntax_error_points_at_code() {
        let kind = PipelineErrorKind::RenderExhausted {
            attempts: 3,
            max_attempts: 3,
            entry_point: "Demo".to_string(),
            diagnostic: "Manim error: SyntaxError: invalid syntax".to_string(),
        };
        assert!(kind.suggestion().contains("syntax errors"));
    }

    #[test]
    fn validation_display_names_stage() {
        let kind = PipelineErrorKind::Validation {
            stage: ScriptStage::Repair,
            kind: ValidationErrorKind::NoEntryPoint,
        };
        assert!(kind.to_string().starts_with("Script from repair step"));
    }
}
