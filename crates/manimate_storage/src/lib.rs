//! Output layout and script archive for manimate.
//!
//! Rendered media and archived scripts live in two subdirectories of a
//! single output root:
//!
//! ```text
//! outputs/
//! ├── animations/
//! │   └── CircleAnimation_3f2a9c1e.mp4
//! └── scripts/
//!     └── 20250101_120000_draw_a_circle_CircleAnimation.py
//! ```
//!
//! Scripts are archived only after a confirmed render, and each write goes
//! through a temp file and rename so an interrupted run never leaves a
//! partial script behind.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod archive;
mod layout;
mod naming;

pub use archive::{ArchiveSettings, ArchiveSettingsBuilder, ScriptArchiver, provenance_header};
pub use layout::OutputLayout;
pub use naming::{DEFAULT_MAX_FRAGMENT_LEN, prompt_fragment, script_file_name};
