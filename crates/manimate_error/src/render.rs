//! Renderer environment fault types.
//!
//! Ordinary render failures (non-zero exit, timeout, missing artifact) are
//! not errors; they are reported as a failed render outcome. These kinds
//! cover faults in the environment the renderer runs in.

/// Environment-level renderer faults.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum RenderErrorKind {
    /// The rendering executable could not be found
    #[display("Renderer executable not found: {}", _0)]
    ToolMissing(String),
    /// The rendering process could not be started
    #[display("Failed to start renderer: {}", _0)]
    Spawn(String),
    /// The isolated working directory could not be prepared
    #[display("Failed to prepare render workspace: {}", _0)]
    Workspace(String),
    /// The produced artifact could not be moved to the output location
    #[display("Failed to collect rendered artifact: {}", _0)]
    ArtifactCollection(String),
}

/// Renderer fault with location tracking.
///
/// # Examples
///
/// ```
/// use manimate_error::{RenderError, RenderErrorKind};
///
/// let err = RenderError::new(RenderErrorKind::ToolMissing("manim".to_string()));
/// assert!(format!("{}", err).contains("manim"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Render Error: {} at line {} in {}", kind, line, file)]
pub struct RenderError {
    /// The kind of fault
    pub kind: RenderErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl RenderError {
    /// Create a new render error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RenderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
