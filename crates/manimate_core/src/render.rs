//! Render job and outcome types.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Render quality preset.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Quality {
    /// 480p15, fastest
    #[default]
    Low,
    /// 720p30
    Medium,
    /// 1080p60
    High,
}

impl Quality {
    /// The manim command-line flag for this preset.
    pub fn flag(&self) -> &'static str {
        match self {
            Quality::Low => "-ql",
            Quality::Medium => "-qm",
            Quality::High => "-qh",
        }
    }
}

/// Everything the renderer needs for one attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct RenderJob {
    /// Python source to execute
    source_code: String,
    /// Scene class to render
    entry_point: String,
    /// Quality preset
    #[builder(default)]
    quality: Quality,
    /// Where the finished artifact is placed
    output_directory: PathBuf,
}

impl RenderJob {
    /// Creates a new builder.
    pub fn builder() -> RenderJobBuilder {
        RenderJobBuilder::default()
    }
}

/// Result of one render attempt.
///
/// An ordinary failure is a value, not an error: the loop feeds the
/// diagnostic to a repair call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderOutcome {
    /// The tool produced an artifact
    Rendered {
        /// Location of the media file
        artifact_path: PathBuf,
    },
    /// The tool failed
    Failed {
        /// Captured error output
        diagnostic: String,
    },
}

impl RenderOutcome {
    /// Failure with the given diagnostic text.
    pub fn failed(diagnostic: impl Into<String>) -> Self {
        RenderOutcome::Failed {
            diagnostic: diagnostic.into(),
        }
    }

    /// True on success.
    pub fn succeeded(&self) -> bool {
        matches!(self, RenderOutcome::Rendered { .. })
    }

    /// The artifact, on success.
    pub fn artifact_path(&self) -> Option<&Path> {
        match self {
            RenderOutcome::Rendered { artifact_path } => Some(artifact_path),
            RenderOutcome::Failed { .. } => None,
        }
    }

    /// The diagnostic, on failure.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            RenderOutcome::Rendered { .. } => None,
            RenderOutcome::Failed { diagnostic } => Some(diagnostic),
        }
    }
}

/// Result of the tooling precondition check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolAvailability {
    /// Tool runs; carries its version string
    Available {
        /// Reported version
        version: String,
    },
    /// Tool cannot be used
    Unavailable {
        /// Why not
        reason: String,
    },
}

impl ToolAvailability {
    /// True when the tool can be used.
    pub fn is_available(&self) -> bool {
        matches!(self, ToolAvailability::Available { .. })
    }

    /// Version string or failure reason.
    pub fn detail(&self) -> &str {
        match self {
            ToolAvailability::Available { version } => version,
            ToolAvailability::Unavailable { reason } => reason,
        }
    }
}
