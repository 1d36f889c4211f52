//! manimate - prompt to rendered Manim animation.
//!
//! manimate asks a language model for a Manim script, renders it, and when
//! rendering fails feeds the error back for a fix, up to a fixed attempt
//! budget. Successful scripts are archived with their provenance.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use manimate::{
//!     AnimationPipeline, AnimationRequest, ManimRenderer, ManimateConfig, ResponsesClient,
//!     ScriptArchiver,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ManimateConfig::load()?;
//!     let layout = config.output_layout(None);
//!     layout.prepare().await?;
//!
//!     let pipeline = AnimationPipeline::new(
//!         ResponsesClient::new(config.gateway_settings(None)?)?,
//!         ManimRenderer::new(config.render_settings()?),
//!         ScriptArchiver::new(config.archive_settings(&layout)?),
//!         config.pipeline_settings(&layout, None)?,
//!     );
//!
//!     let result = pipeline.run(&AnimationRequest::new("the Pythagorean theorem")).await?;
//!     println!("Video: {}", result.artifact_path().display());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `manimate_error` - Error types
//! - `manimate_core` - Data model
//! - `manimate_interface` - Collaborator traits
//! - `manimate_script` - Entry-point validation and source screening
//! - `manimate_models` - Responses API gateway
//! - `manimate_render` - Manim subprocess renderer
//! - `manimate_storage` - Output layout and script archive
//! - `manimate_pipeline` - Generate, review, render and repair loop
//!
//! This crate re-exports everything and adds configuration loading and
//! logging setup.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod logging;

pub use config::{
    BriefSection, DEFAULT_CONFIG, GenerationSection, LlmSection, MODEL_OVERRIDE_ENV,
    ManimateConfig, OutputSection, PipelineSection, RenderSection, RepairSection, ReviewSection,
};
pub use logging::{LoggingOptions, init_logging};

pub use manimate_core::*;
pub use manimate_error::*;
pub use manimate_interface::*;
pub use manimate_models::{GatewaySettings, ReasoningEffort, ResponsesClient};
pub use manimate_pipeline::{AnimationPipeline, PipelineSettings};
pub use manimate_render::{ManimRenderer, RenderSettings};
pub use manimate_script::{reconcile_entry_point, screen_source};
pub use manimate_storage::{ArchiveSettings, OutputLayout, ScriptArchiver};

/// Pipeline over the production collaborators.
pub type DefaultPipeline = AnimationPipeline<ResponsesClient, ManimRenderer, ScriptArchiver>;
