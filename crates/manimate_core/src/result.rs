//! Successful pipeline result.

use crate::GeneratedScript;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A finished animation: the script that rendered, where the video went,
/// which attempt produced it, and where the script was archived (if the
/// archive write succeeded).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct AnimationResult {
    /// Script that rendered
    script: GeneratedScript,
    /// Rendered media file
    artifact_path: PathBuf,
    /// 1-based attempt that succeeded
    attempt: u32,
    /// Archived script, when archival succeeded
    script_path: Option<PathBuf>,
}

impl AnimationResult {
    /// Assemble a result.
    pub fn new(
        script: GeneratedScript,
        artifact_path: PathBuf,
        attempt: u32,
        script_path: Option<PathBuf>,
    ) -> Self {
        Self {
            script,
            artifact_path,
            attempt,
            script_path,
        }
    }

    /// Description of the animation.
    pub fn description(&self) -> &str {
        self.script.description()
    }

    /// Estimated duration in seconds.
    pub fn duration(&self) -> f64 {
        *self.script.estimated_duration()
    }

    /// Rendered scene class.
    pub fn entry_point(&self) -> &str {
        self.script.entry_point_name()
    }

    /// Archived script location, if any.
    pub fn archived_at(&self) -> Option<&Path> {
        self.script_path.as_deref()
    }
}
