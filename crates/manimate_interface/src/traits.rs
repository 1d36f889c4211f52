//! Trait definitions for the pipeline's external collaborators.

use async_trait::async_trait;
use manimate_core::{GeneratedScript, LlmCall, LlmReply, RenderJob, RenderOutcome, ToolAvailability};
use manimate_error::{LlmResult, RenderError, StorageError};
use std::path::PathBuf;

/// A language model reachable through single request/response calls.
///
/// Implementations must honour `LlmCall::schema` by returning
/// `ReplyContent::Structured` validated against it, or fail with
/// `LlmErrorKind::SchemaMismatch`. A non-empty `continuation` on the call
/// must make earlier turns available to the model.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Submit one call.
    async fn call(&self, call: &LlmCall) -> LlmResult<LlmReply>;

    /// Provider name (e.g., "openai").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "gpt-4o").
    fn model_name(&self) -> &str;
}

/// An external tool that turns a script into a media file.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Check once, before any work, that the tool can run.
    async fn check_installation(&self) -> ToolAvailability;

    /// Render one job under a hard timeout.
    ///
    /// Ordinary render failures are `Ok(RenderOutcome::Failed)`. Only
    /// environment faults (tool missing, workspace unusable) are `Err`.
    async fn render(&self, job: &RenderJob) -> Result<RenderOutcome, RenderError>;
}

/// Durable storage for successful scripts.
#[async_trait]
pub trait ScriptStore: Send + Sync {
    /// Persist `script` with provenance and return where it was written.
    async fn persist(
        &self,
        script: &GeneratedScript,
        originating_prompt: &str,
        attempt: u32,
        max_attempts: u32,
    ) -> Result<PathBuf, StorageError>;
}
