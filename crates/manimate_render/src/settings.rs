//! Renderer configuration.

use derive_builder::Builder;
use derive_getters::Getters;
use std::time::Duration;

/// How to invoke the render tool.
///
/// `program` and `program_args` form the command prefix; the renderer
/// appends `scene.py <entry> <quality flag> --output_file <entry>.mp4`.
/// Use `program = "python"` with `program_args = ["-m", "manim"]` when the
/// CLI is not on `PATH`.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Getters)]
#[builder(setter(into))]
pub struct RenderSettings {
    /// Executable to run
    #[builder(default = "\"manim\".to_string()")]
    program: String,
    /// Arguments placed before the render arguments
    #[builder(default)]
    program_args: Vec<String>,
    /// Wall-clock limit for one render
    #[builder(default = "Duration::from_secs(300)")]
    timeout: Duration,
    /// Wall-clock limit for the version check
    #[builder(default = "Duration::from_secs(10)")]
    version_check_timeout: Duration,
}

impl RenderSettings {
    /// Creates a new builder.
    pub fn builder() -> RenderSettingsBuilder {
        RenderSettingsBuilder::default()
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            program: "manim".to_string(),
            program_args: Vec::new(),
            timeout: Duration::from_secs(300),
            version_check_timeout: Duration::from_secs(10),
        }
    }
}
