//! Static analysis of generated Manim scripts.
//!
//! Two passes run over generated Python source before it reaches the
//! render tool:
//!
//! - [`extract_entry_point`] and [`reconcile_entry_point`] find the scene
//!   class to render and correct the model's declared name.
//! - [`screen_source`] rejects scripts that reach for the filesystem,
//!   processes or dynamic evaluation.
//!
//! Both parse with tree-sitter and never execute the source.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod entry_point;
mod parse;
mod screening;

pub use entry_point::{
    SCENE_BASES, extract_entry_point, reconcile_entry_point, scan_entry_points,
};
pub use screening::{
    BLOCKED_CALLS, BLOCKED_MODULES, Finding, ScreeningReport, screen_source,
};
