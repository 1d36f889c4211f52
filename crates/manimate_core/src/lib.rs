//! Core data types for manimate.
//!
//! This crate provides the data model shared by the pipeline and its
//! collaborators: the animation request, the generated script, the
//! gateway call and reply envelopes, and render outcomes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod continuation;
mod llm;
mod render;
mod request;
mod result;
mod schema;
mod script;

pub use continuation::Continuation;
pub use llm::{LlmCall, LlmCallBuilder, LlmReply, ReplyContent, Usage};
pub use render::{Quality, RenderJob, RenderJobBuilder, RenderOutcome, ToolAvailability};
pub use request::{AnimationRequest, AnimationRequestBuilder, Style};
pub use result::AnimationResult;
pub use schema::OutputSchema;
pub use script::{GENERATED_SCRIPT_SCHEMA, GeneratedScript, GeneratedScriptBuilder};
