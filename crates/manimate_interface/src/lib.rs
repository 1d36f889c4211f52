//! Collaborator traits for manimate.
//!
//! The pipeline talks to the language model, the render tool and the
//! script archive only through these traits, so each can be swapped for a
//! scripted double in tests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{LlmGateway, Renderer, ScriptStore};
