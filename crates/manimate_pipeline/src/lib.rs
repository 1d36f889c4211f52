//! Generate, review, render and repair loop for manimate.
//!
//! [`AnimationPipeline`] turns an [`AnimationRequest`] into a rendered
//! animation:
//!
//! 1. Check once that the render tool is available.
//! 2. Optionally expand the prompt into a written brief.
//! 3. Generate a script and validate its scene class.
//! 4. Optionally ask for a review and keep the revision if it validates.
//! 5. Render. On failure feed the diagnostic back for a repair and render
//!    again, up to the attempt budget.
//! 6. Archive the script that rendered.
//!
//! Every gateway call after the first is chained through the previous
//! call's continuation, so prompts never resend history.
//!
//! [`AnimationRequest`]: manimate_core::AnimationRequest

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod brief;
mod pipeline;
pub mod prompts;
mod settings;
mod state;

pub use brief::BriefExpander;
pub use pipeline::AnimationPipeline;
pub use settings::{PipelineSettings, PipelineSettingsBuilder};
pub use state::{LoopState, RetryState};
