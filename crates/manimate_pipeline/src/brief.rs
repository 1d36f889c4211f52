//! Single-call brief expansion.

use crate::prompts::{BRIEF_INSTRUCTIONS, brief_prompt};
use manimate_core::{Continuation, LlmCall, ReplyContent};
use manimate_error::{LlmError, LlmErrorKind, LlmResult};
use manimate_interface::LlmGateway;
use std::time::Duration;
use tracing::{debug, instrument};

/// Turns a short idea into a written brief in one gateway call.
#[derive(Debug, Clone, Copy)]
pub struct BriefExpander<'a, G: ?Sized> {
    gateway: &'a G,
    temperature: f32,
    max_output_tokens: u32,
    timeout: Duration,
}

impl<'a, G: LlmGateway + ?Sized> BriefExpander<'a, G> {
    /// Expander over `gateway` bounded by `timeout`.
    pub fn new(gateway: &'a G, temperature: f32, max_output_tokens: u32, timeout: Duration) -> Self {
        Self {
            gateway,
            temperature,
            max_output_tokens,
            timeout,
        }
    }

    /// Expand `user_prompt` into a brief.
    ///
    /// Returns the brief and the continuation that starts the conversation.
    ///
    /// # Errors
    ///
    /// Gateway failures pass through. Exceeding the deadline is a
    /// `Timeout` and a blank brief is an `EmptyResponse`.
    #[instrument(skip(self, user_prompt), fields(timeout_secs = self.timeout.as_secs()))]
    pub async fn expand(&self, user_prompt: &str) -> LlmResult<(String, Continuation)> {
        let call = LlmCall::builder()
            .instructions(BRIEF_INSTRUCTIONS)
            .input(brief_prompt(user_prompt))
            .temperature(self.temperature)
            .max_output_tokens(self.max_output_tokens)
            .build()
            .map_err(|e| LlmError::new(LlmErrorKind::InvalidRequest(e.to_string())))?;

        let reply = tokio::time::timeout(self.timeout, self.gateway.call(&call))
            .await
            .map_err(|_| {
                LlmError::new(LlmErrorKind::Timeout(format!(
                    "Subject matter processing timed out after {} seconds",
                    self.timeout.as_secs()
                )))
            })??;

        let (content, continuation) = reply.into_parts();
        let brief = match content {
            ReplyContent::Text(text) => text,
            ReplyContent::Structured(value) => value.to_string(),
        };
        if brief.trim().is_empty() {
            return Err(LlmError::new(LlmErrorKind::EmptyResponse));
        }

        debug!(length = brief.len(), preview = %preview(&brief), "Brief generated");
        Ok((brief, continuation))
    }
}

fn preview(text: &str) -> String {
    const LIMIT: usize = 500;
    if text.chars().count() <= LIMIT {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(LIMIT).collect::<String>())
    }
}
