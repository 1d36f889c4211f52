//! Loop policy.

use derive_builder::Builder;
use derive_getters::Getters;
use manimate_core::Quality;
use std::path::PathBuf;
use std::time::Duration;

/// Read-only policy for one pipeline.
///
/// `max_attempts` is fixed per pipeline; callers cannot change it per
/// request.
#[derive(Debug, Clone, PartialEq, Builder, Getters)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct PipelineSettings {
    /// Render attempts before giving up
    #[builder(default = "3")]
    max_attempts: u32,
    /// Render quality preset
    #[builder(default)]
    quality: Quality,
    /// Where rendered media is placed
    #[builder(default = "PathBuf::from(\"outputs/animations\")")]
    animations_dir: PathBuf,
    /// Whether to review before the first render
    #[builder(default = "true")]
    review_enabled: bool,
    /// Temperature for generation
    #[builder(default = "0.7")]
    generation_temperature: f32,
    /// Temperature for review
    #[builder(default = "0.2")]
    review_temperature: f32,
    /// Temperature for repair
    #[builder(default = "0.3")]
    repair_temperature: f32,
    /// Output cap for script-producing calls
    #[builder(default = "20000")]
    script_max_output_tokens: u32,
    /// Temperature for brief expansion
    #[builder(default = "0.3")]
    brief_temperature: f32,
    /// Output cap for brief expansion
    #[builder(default = "4000")]
    brief_max_output_tokens: u32,
    /// Deadline for brief expansion
    #[builder(default = "Duration::from_secs(90)")]
    brief_timeout: Duration,
}

impl PipelineSettings {
    /// Creates a new builder.
    pub fn builder() -> PipelineSettingsBuilder {
        PipelineSettingsBuilder::default()
    }
}

impl PipelineSettingsBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.max_attempts == Some(0) {
            return Err("max_attempts must be at least 1".to_string());
        }
        Ok(())
    }
}
