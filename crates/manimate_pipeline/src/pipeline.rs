//! The generate-render-repair state machine.

use crate::prompts::{
    GENERATION_INSTRUCTIONS, REPAIR_INSTRUCTIONS, REVIEW_INSTRUCTIONS, generation_prompt,
    repair_prompt, review_prompt,
};
use crate::{BriefExpander, LoopState, PipelineSettings, RetryState};
use manimate_core::{
    AnimationRequest, AnimationResult, Continuation, GENERATED_SCRIPT_SCHEMA, GeneratedScript,
    LlmCall, RenderJob, RenderOutcome, ToolAvailability,
};
use manimate_error::{
    LlmErrorKind, PipelineError, PipelineErrorKind, ScriptStage, ValidationErrorKind,
};
use manimate_interface::{LlmGateway, Renderer, ScriptStore};
use manimate_script::reconcile_entry_point;
use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};

/// Why a script-producing call did not yield a usable script.
#[derive(Debug)]
enum StepFailure {
    /// The gateway call failed or the reply broke the schema
    Llm(LlmErrorKind),
    /// The script has no usable entry point
    Invalid(ValidationErrorKind),
}

impl StepFailure {
    fn into_pipeline_error(self, stage: ScriptStage, attempt: u32) -> PipelineError {
        let kind = match (self, stage) {
            (StepFailure::Invalid(kind), stage) => PipelineErrorKind::Validation { stage, kind },
            (StepFailure::Llm(cause), ScriptStage::Repair) => {
                PipelineErrorKind::RepairFailed { attempt, cause }
            }
            (StepFailure::Llm(cause), _) => PipelineErrorKind::GenerationFailed(cause),
        };
        PipelineError::new(kind)
    }
}

/// Drives one request from prompt to rendered animation.
///
/// The pipeline owns its collaborators and a read-only policy. It holds no
/// per-request state, so one instance can serve concurrent requests.
#[derive(Debug)]
pub struct AnimationPipeline<G, R, S> {
    gateway: G,
    renderer: R,
    store: S,
    settings: PipelineSettings,
}

impl<G, R, S> AnimationPipeline<G, R, S>
where
    G: LlmGateway,
    R: Renderer,
    S: ScriptStore,
{
    /// Assemble a pipeline.
    pub fn new(gateway: G, renderer: R, store: S, settings: PipelineSettings) -> Self {
        Self {
            gateway,
            renderer,
            store,
            settings,
        }
    }

    /// Loop policy.
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Gateway in use.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Renderer in use.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Run the full loop for `request`.
    ///
    /// # Errors
    ///
    /// Returns a single [`PipelineError`] for any fatal condition: missing
    /// tooling, a failed brief, generation or repair call, an invalid
    /// script, a renderer fault, or an exhausted attempt budget.
    #[instrument(
        skip(self, request),
        fields(
            provider = self.gateway.provider_name(),
            model = self.gateway.model_name(),
            max_attempts = *self.settings.max_attempts(),
        )
    )]
    pub async fn run(&self, request: &AnimationRequest) -> Result<AnimationResult, PipelineError> {
        self.check_preconditions().await?;

        let mut state = LoopState::Initial;
        loop {
            debug!(state = %state, "Pipeline transition");
            state = match state {
                LoopState::Initial => self.generate(request).await,
                LoopState::Generated {
                    script,
                    continuation,
                } => self.review(script, continuation).await,
                LoopState::Reviewed {
                    script,
                    continuation,
                } => LoopState::RenderAttempt(RetryState::first(
                    *self.settings.max_attempts(),
                    script,
                    continuation,
                )),
                LoopState::RenderAttempt(retry) => self.render_attempt(request, retry).await,
                LoopState::Success(result) => {
                    info!(
                        entry_point = result.entry_point(),
                        attempt = *result.attempt(),
                        artifact = %result.artifact_path().display(),
                        "Animation rendered"
                    );
                    return Ok(result);
                }
                LoopState::Failed(error) => {
                    warn!(error = %error.kind, "Pipeline failed");
                    return Err(error);
                }
            };
        }
    }

    async fn check_preconditions(&self) -> Result<(), PipelineError> {
        match self.renderer.check_installation().await {
            ToolAvailability::Available { version } => {
                debug!(version = %version, "Render tool available");
                Ok(())
            }
            ToolAvailability::Unavailable { reason } => {
                Err(PipelineError::new(PipelineErrorKind::Precondition(reason)))
            }
        }
    }

    async fn generate(&self, request: &AnimationRequest) -> LoopState {
        let (subject, seed) = if *request.use_enhancement() {
            let expander = BriefExpander::new(
                &self.gateway,
                *self.settings.brief_temperature(),
                *self.settings.brief_max_output_tokens(),
                *self.settings.brief_timeout(),
            );
            match expander.expand(request.user_prompt()).await {
                Ok((brief, continuation)) => (brief, continuation),
                Err(e) => {
                    return LoopState::Failed(PipelineError::new(PipelineErrorKind::BriefFailed(
                        e.kind,
                    )));
                }
            }
        } else {
            (request.user_prompt().clone(), Continuation::default())
        };

        let input = generation_prompt(&subject, *request.style());
        match self
            .request_script(
                GENERATION_INSTRUCTIONS,
                input,
                &seed,
                *self.settings.generation_temperature(),
            )
            .await
        {
            Ok((script, continuation)) => {
                info!(
                    entry_point = script.entry_point_name(),
                    duration = *script.estimated_duration(),
                    "Script generated"
                );
                LoopState::Generated {
                    script,
                    continuation: seed.advance(continuation),
                }
            }
            Err(failure) => {
                LoopState::Failed(failure.into_pipeline_error(ScriptStage::Generation, 0))
            }
        }
    }

    async fn review(&self, script: GeneratedScript, continuation: Continuation) -> LoopState {
        if !*self.settings.review_enabled() {
            return LoopState::Reviewed {
                script,
                continuation,
            };
        }

        match self
            .request_script(
                REVIEW_INSTRUCTIONS,
                review_prompt(&script),
                &continuation,
                *self.settings.review_temperature(),
            )
            .await
        {
            Ok((reviewed, newer)) => {
                debug!(
                    entry_point = reviewed.entry_point_name(),
                    notes = reviewed.review_notes().as_deref().unwrap_or(""),
                    "Review accepted"
                );
                LoopState::Reviewed {
                    script: reviewed,
                    continuation: continuation.advance(newer),
                }
            }
            Err(failure) => {
                warn!(failure = ?failure, "Review failed, keeping generated script");
                LoopState::Reviewed {
                    script,
                    continuation,
                }
            }
        }
    }

    #[instrument(
        skip(self, request, retry),
        fields(
            attempt = *retry.attempt(),
            entry_point = retry.current_script().entry_point_name(),
        )
    )]
    async fn render_attempt(&self, request: &AnimationRequest, retry: RetryState) -> LoopState {
        let attempt = *retry.attempt();
        let job = match RenderJob::builder()
            .source_code(retry.current_script().source_code().clone())
            .entry_point(retry.current_script().entry_point_name().clone())
            .quality(*self.settings.quality())
            .output_directory(self.settings.animations_dir().clone())
            .build()
        {
            Ok(job) => job,
            Err(e) => {
                return LoopState::Failed(PipelineError::new(PipelineErrorKind::RendererFault {
                    attempt,
                    message: e.to_string(),
                }));
            }
        };

        let outcome = match self.renderer.render(&job).await {
            Ok(outcome) => outcome,
            Err(e) => {
                return LoopState::Failed(PipelineError::new(PipelineErrorKind::RendererFault {
                    attempt,
                    message: e.kind.to_string(),
                }));
            }
        };

        match outcome {
            RenderOutcome::Rendered { artifact_path } => {
                let script_path = self.archive(request, &retry).await;
                LoopState::Success(AnimationResult::new(
                    retry.into_script(),
                    artifact_path,
                    attempt,
                    script_path,
                ))
            }
            RenderOutcome::Failed { diagnostic } if retry.is_final_attempt() => {
                warn!(diagnostic = %diagnostic, "Final render attempt failed");
                LoopState::Failed(PipelineError::new(PipelineErrorKind::RenderExhausted {
                    attempts: attempt,
                    max_attempts: *retry.max_attempts(),
                    entry_point: retry.current_script().entry_point_name().clone(),
                    diagnostic,
                }))
            }
            RenderOutcome::Failed { diagnostic } => {
                warn!(diagnostic = %diagnostic, "Render failed, requesting repair");
                self.repair(retry, &diagnostic).await
            }
        }
    }

    async fn repair(&self, retry: RetryState, diagnostic: &str) -> LoopState {
        let attempt = *retry.attempt();
        let input = repair_prompt(
            retry.current_script().source_code(),
            diagnostic,
            attempt + 1,
            *retry.max_attempts(),
        );

        match self
            .request_script(
                REPAIR_INSTRUCTIONS,
                input,
                retry.current_continuation(),
                *self.settings.repair_temperature(),
            )
            .await
        {
            Ok((repaired, continuation)) => {
                info!(
                    next_attempt = attempt + 1,
                    fix = repaired.fix_description().as_deref().unwrap_or(""),
                    "Script repaired"
                );
                LoopState::RenderAttempt(retry.advance(repaired, continuation))
            }
            Err(failure) => {
                LoopState::Failed(failure.into_pipeline_error(ScriptStage::Repair, attempt))
            }
        }
    }

    async fn archive(&self, request: &AnimationRequest, retry: &RetryState) -> Option<PathBuf> {
        match self
            .store
            .persist(
                retry.current_script(),
                request.user_prompt(),
                *retry.attempt(),
                *retry.max_attempts(),
            )
            .await
        {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(error = %e.kind, "Failed to archive script");
                None
            }
        }
    }

    /// One structured call that must yield a valid script.
    ///
    /// The returned continuation is whatever the gateway issued, possibly
    /// empty; callers decide whether to adopt it.
    async fn request_script(
        &self,
        instructions: &str,
        input: String,
        continuation: &Continuation,
        temperature: f32,
    ) -> Result<(GeneratedScript, Continuation), StepFailure> {
        let mut builder = LlmCall::builder();
        builder
            .instructions(instructions)
            .input(input)
            .schema(GeneratedScript::output_schema())
            .temperature(temperature)
            .max_output_tokens(*self.settings.script_max_output_tokens());
        if !continuation.is_empty() {
            builder.continuation(continuation.clone());
        }
        let call = builder
            .build()
            .map_err(|e| StepFailure::Llm(LlmErrorKind::InvalidRequest(e.to_string())))?;

        let reply = self
            .gateway
            .call(&call)
            .await
            .map_err(|e| StepFailure::Llm(e.kind))?;
        let (content, newer) = reply.into_parts();

        let mut script: GeneratedScript = content
            .into_structured(GENERATED_SCRIPT_SCHEMA)
            .map_err(|e| StepFailure::Llm(e.kind))?;
        script
            .check_invariants()
            .map_err(|e| StepFailure::Llm(e.kind))?;
        reconcile_entry_point(&mut script).map_err(|e| StepFailure::Invalid(e.kind))?;

        Ok((script, newer))
    }
}
