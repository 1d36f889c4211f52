//! Loop states.

use derive_getters::Getters;
use manimate_core::{AnimationResult, Continuation, GeneratedScript};
use manimate_error::PipelineError;

/// Mutable state of one render-repair loop. Discarded when the loop ends.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct RetryState {
    /// 1-based render attempt about to run
    attempt: u32,
    /// Attempt budget
    max_attempts: u32,
    /// Script for this attempt
    current_script: GeneratedScript,
    /// Most recent non-empty continuation
    current_continuation: Continuation,
}

impl RetryState {
    /// State for the first attempt.
    pub fn first(max_attempts: u32, script: GeneratedScript, continuation: Continuation) -> Self {
        Self {
            attempt: 1,
            max_attempts,
            current_script: script,
            current_continuation: continuation,
        }
    }

    /// True when a failure on this attempt ends the loop.
    pub fn is_final_attempt(&self) -> bool {
        self.attempt >= self.max_attempts
    }

    /// Move to the next attempt with a repaired script.
    ///
    /// An empty `continuation` keeps the current one.
    pub fn advance(self, script: GeneratedScript, continuation: Continuation) -> Self {
        Self {
            attempt: self.attempt + 1,
            max_attempts: self.max_attempts,
            current_script: script,
            current_continuation: self.current_continuation.advance(continuation),
        }
    }

    /// Take the script out of a finished state.
    pub fn into_script(self) -> GeneratedScript {
        self.current_script
    }
}

/// States of the generate-render-repair loop.
#[derive(Debug, Clone, derive_more::Display)]
pub enum LoopState {
    /// Nothing generated yet
    #[display("initial")]
    Initial,
    /// A validated script exists
    #[display("generated")]
    Generated {
        /// Generated script
        script: GeneratedScript,
        /// Continuation after generation
        continuation: Continuation,
    },
    /// Review finished or was skipped
    #[display("reviewed")]
    Reviewed {
        /// Script to render first
        script: GeneratedScript,
        /// Continuation after review
        continuation: Continuation,
    },
    /// About to render
    #[display("render_attempt({})", _0.attempt)]
    RenderAttempt(RetryState),
    /// Rendered
    #[display("success")]
    Success(AnimationResult),
    /// Terminal failure
    #[display("failed")]
    Failed(PipelineError),
}
