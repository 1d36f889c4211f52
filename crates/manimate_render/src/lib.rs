//! Manim subprocess renderer for manimate.
//!
//! [`ManimRenderer`] screens a script, writes it into a fresh temporary
//! directory, runs the manim CLI there under a hard timeout, and copies the
//! produced video into the animations directory under a collision-free
//! name. Ordinary failures come back as `RenderOutcome::Failed` with the
//! tool's error output so the pipeline can ask for a repair.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod manim;
mod settings;

pub use manim::ManimRenderer;
pub use settings::{RenderSettings, RenderSettingsBuilder};
