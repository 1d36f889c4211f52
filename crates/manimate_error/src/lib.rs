//! Error types for manimate.
//!
//! This crate provides the error taxonomy shared by every manimate crate.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! The pipeline distinguishes recoverable from fatal conditions through
//! [`PipelineErrorKind`]: only terminal failures ever reach the caller.
//!
//! # Examples
//!
//! ```
//! use manimate_error::{ConfigError, ManimateResult};
//!
//! fn load() -> ManimateResult<String> {
//!     Err(ConfigError::new("output.root must not be empty"))?
//! }
//!
//! assert!(load().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod llm;
mod pipeline;
mod render;
mod storage;
mod validation;

pub use config::ConfigError;
pub use error::{ManimateError, ManimateErrorKind, ManimateResult};
pub use llm::{LlmError, LlmErrorKind, LlmResult, RetryableError};
pub use pipeline::{PipelineError, PipelineErrorKind, ScriptStage};
pub use render::{RenderError, RenderErrorKind};
pub use storage::{StorageError, StorageErrorKind};
pub use validation::{ValidationError, ValidationErrorKind};
