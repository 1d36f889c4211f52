//! Animation command handler.

use super::AnimateArgs;
use manimate::{
    AnimationPipeline, AnimationRequest, AnimationResult, ManimRenderer, ManimateConfig,
    ManimateResult, ResponsesClient, ScriptArchiver,
};
use tracing::{info, instrument};

/// How an `animate` run ended.
#[derive(Debug)]
pub enum AnimateOutcome {
    /// The pipeline finished
    Finished(AnimationResult),
    /// The user interrupted the run
    Cancelled,
}

/// Build the pipeline from `config` and run it for `args`.
///
/// The run races against Ctrl-C. Archival happens only after a confirmed
/// render, so an interrupted run leaves no script behind.
#[instrument(skip(args, config), fields(prompt = %args.prompt, style = %args.style))]
pub async fn run_animate(args: AnimateArgs, config: &ManimateConfig) -> ManimateResult<AnimateOutcome> {
    let layout = config.output_layout(args.output_dir.clone());
    layout.prepare().await?;

    let gateway = ResponsesClient::new(config.gateway_settings(args.api_key.clone())?)?;
    let renderer = ManimRenderer::new(config.render_settings()?);
    let store = ScriptArchiver::new(config.archive_settings(&layout)?);
    let settings = config.pipeline_settings(&layout, args.quality)?;
    info!(
        model = %config.llm.model,
        max_attempts = *settings.max_attempts(),
        quality = %settings.quality(),
        "Starting animation"
    );
    let pipeline = AnimationPipeline::new(gateway, renderer, store, settings);

    let request = AnimationRequest::builder()
        .user_prompt(args.prompt)
        .use_enhancement(!args.no_enhance)
        .style(args.style)
        .build()
        .map_err(|e| manimate::ConfigError::new(format!("Invalid request: {}", e)))?;

    tokio::select! {
        result = pipeline.run(&request) => Ok(AnimateOutcome::Finished(result?)),
        _ = tokio::signal::ctrl_c() => Ok(AnimateOutcome::Cancelled),
    }
}
