//! Layered configuration.
//!
//! Sources, later overriding earlier:
//! 1. Bundled defaults (`manimate.toml` shipped with the crate)
//! 2. `~/.config/manimate/manimate.toml`
//! 3. `./manimate.toml`
//! 4. `MANIMATE_<SECTION>__<KEY>` environment variables
//! 5. `TEACHME_MODEL`, for the model only
//!
//! The loaded [`ManimateConfig`] is read once and converted into the
//! immutable settings each component takes in its constructor.

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use manimate_core::Quality;
use manimate_error::ConfigError;
use manimate_models::{GatewaySettings, ReasoningEffort};
use manimate_pipeline::PipelineSettings;
use manimate_render::RenderSettings;
use manimate_storage::{ArchiveSettings, OutputLayout};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration.
pub const DEFAULT_CONFIG: &str = include_str!("../../../manimate.toml");

/// Environment variable that overrides the model.
pub const MODEL_OVERRIDE_ENV: &str = "TEACHME_MODEL";

/// `[llm]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmSection {
    /// Model identifier
    pub model: String,
    /// API root
    pub base_url: String,
    /// Environment variable holding the key
    pub api_key_env: String,
    /// low, medium or high; blank disables
    #[serde(default)]
    pub reasoning_effort: String,
    /// Per-request deadline in seconds
    pub request_timeout_secs: u64,
    /// Retries for transient failures
    pub max_retries: usize,
    /// First backoff delay
    pub initial_backoff_ms: u64,
    /// Backoff ceiling
    pub max_backoff_secs: u64,
}

/// `[generation]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSection {
    /// Sampling temperature
    pub temperature: f32,
    /// Output cap for script-producing calls
    pub max_output_tokens: u32,
}

/// `[review]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSection {
    /// Whether to review before the first render
    pub enabled: bool,
    /// Sampling temperature
    pub temperature: f32,
}

/// `[repair]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairSection {
    /// Sampling temperature
    pub temperature: f32,
}

/// `[brief]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BriefSection {
    /// Sampling temperature
    pub temperature: f32,
    /// Output cap
    pub max_output_tokens: u32,
    /// Deadline in seconds
    pub timeout_secs: u64,
}

/// `[render]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSection {
    /// Command prefix, split on whitespace
    pub command: String,
    /// Per-render deadline in seconds
    pub timeout_secs: u64,
    /// Version check deadline in seconds
    pub version_check_timeout_secs: u64,
    /// Default quality preset
    pub quality: String,
}

/// `[pipeline]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSection {
    /// Render attempt budget
    pub max_attempts: u32,
}

/// `[output]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSection {
    /// Output root
    pub root: PathBuf,
    /// Rendered media subdirectory
    pub animations_subdir: String,
    /// Archived scripts subdirectory
    pub scripts_subdir: String,
    /// Cap on the prompt fragment in archived file names
    pub max_prompt_fragment_len: usize,
}

/// Complete manimate configuration.
///
/// # Example
///
/// ```no_run
/// use manimate::ManimateConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ManimateConfig::load()?;
/// let render = config.render_settings()?;
/// println!("Rendering with {}", render.program());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManimateConfig {
    /// Gateway connection
    pub llm: LlmSection,
    /// Script generation
    pub generation: GenerationSection,
    /// Pre-render review
    pub review: ReviewSection,
    /// Repair calls
    pub repair: RepairSection,
    /// Brief expansion
    pub brief: BriefSection,
    /// Render tool
    pub render: RenderSection,
    /// Loop policy
    pub pipeline: PipelineSection,
    /// Output directories
    pub output: OutputSection,
}

impl ManimateConfig {
    /// Load from every source.
    ///
    /// A `.env` file in the working directory is read first so its
    /// variables take part in the environment layer.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file is malformed or a value has the
    /// wrong type.
    #[instrument]
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "Loaded .env");
        }

        let mut builder = Self::defaults();

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("manimate").join("manimate.toml");
            builder = builder.add_source(File::from(user_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("manimate").required(false))
            .add_source(
                Environment::with_prefix("MANIMATE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("llm.model", std::env::var(MODEL_OVERRIDE_ENV).ok())
            .map_err(|e| ConfigError::new(format!("Invalid {} value: {}", MODEL_OVERRIDE_ENV, e)))?;

        Self::finish(builder)
    }

    /// Bundled defaults overlaid with a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if `overrides` is not valid TOML or has values of
    /// the wrong type.
    pub fn from_toml(overrides: &str) -> Result<Self, ConfigError> {
        Self::finish(Self::defaults().add_source(File::from_str(overrides, FileFormat::Toml)))
    }

    fn defaults() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))
    }

    /// Gateway settings, with `api_key` taking precedence over the
    /// environment.
    pub fn gateway_settings(&self, api_key: Option<String>) -> Result<GatewaySettings, ConfigError> {
        let llm = &self.llm;
        let mut builder = GatewaySettings::builder();
        builder
            .model(llm.model.clone())
            .base_url(llm.base_url.trim_end_matches('/').to_string())
            .api_key_env(llm.api_key_env.clone())
            .reasoning_effort(ReasoningEffort::normalize(&llm.reasoning_effort))
            .request_timeout(Duration::from_secs(llm.request_timeout_secs))
            .max_retries(llm.max_retries)
            .initial_backoff_ms(llm.initial_backoff_ms)
            .max_backoff_secs(llm.max_backoff_secs);
        if let Some(key) = api_key.filter(|key| !key.trim().is_empty()) {
            builder.api_key(key);
        }
        builder
            .build()
            .map_err(|e| ConfigError::new(format!("Invalid [llm] section: {}", e)))
    }

    /// Renderer settings. `command` is split into program and arguments.
    pub fn render_settings(&self) -> Result<RenderSettings, ConfigError> {
        let mut words = self.render.command.split_whitespace().map(str::to_string);
        let program = words
            .next()
            .ok_or_else(|| ConfigError::new("render.command must not be empty"))?;
        RenderSettings::builder()
            .program(program)
            .program_args(words.collect::<Vec<_>>())
            .timeout(Duration::from_secs(self.render.timeout_secs))
            .version_check_timeout(Duration::from_secs(self.render.version_check_timeout_secs))
            .build()
            .map_err(|e| ConfigError::new(format!("Invalid [render] section: {}", e)))
    }

    /// The configured default quality.
    pub fn quality(&self) -> Result<Quality, ConfigError> {
        self.render.quality.parse().map_err(|_| {
            ConfigError::new(format!(
                "Unknown render quality '{}' (expected low, medium or high)",
                self.render.quality
            ))
        })
    }

    /// Output directories, rooted at `root` when given.
    pub fn output_layout(&self, root: Option<PathBuf>) -> OutputLayout {
        OutputLayout::new(
            root.unwrap_or_else(|| self.output.root.clone()),
            &self.output.animations_subdir,
            &self.output.scripts_subdir,
        )
    }

    /// Archiver settings for `layout`.
    pub fn archive_settings(&self, layout: &OutputLayout) -> Result<ArchiveSettings, ConfigError> {
        ArchiveSettings::builder()
            .scripts_dir(layout.scripts().clone())
            .max_prompt_fragment_len(self.output.max_prompt_fragment_len)
            .build()
            .map_err(|e| ConfigError::new(format!("Invalid [output] section: {}", e)))
    }

    /// Loop policy for `layout`, with an optional quality override.
    pub fn pipeline_settings(
        &self,
        layout: &OutputLayout,
        quality: Option<Quality>,
    ) -> Result<PipelineSettings, ConfigError> {
        let quality = match quality {
            Some(quality) => quality,
            None => self.quality()?,
        };
        PipelineSettings::builder()
            .max_attempts(self.pipeline.max_attempts)
            .quality(quality)
            .animations_dir(layout.animations().clone())
            .review_enabled(self.review.enabled)
            .generation_temperature(self.generation.temperature)
            .review_temperature(self.review.temperature)
            .repair_temperature(self.repair.temperature)
            .script_max_output_tokens(self.generation.max_output_tokens)
            .brief_temperature(self.brief.temperature)
            .brief_max_output_tokens(self.brief.max_output_tokens)
            .brief_timeout(Duration::from_secs(self.brief.timeout_secs))
            .build()
            .map_err(|e| ConfigError::new(format!("Invalid [pipeline] section: {}", e)))
    }
}
