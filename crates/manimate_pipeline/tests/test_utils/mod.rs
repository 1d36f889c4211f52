//! Test utilities for pipeline tests.
//!
//! Mock collaborators record every call so tests can assert on call counts
//! and on the continuation each call carried.

use manimate_core::GeneratedScript;
use serde_json::{Value, json};

pub mod mock_gateway;
pub mod mock_renderer;
pub mod mock_store;

#[allow(unused_imports)]
pub use mock_gateway::{MockGateway, MockReply};
#[allow(unused_imports)]
pub use mock_renderer::MockRenderer;
#[allow(unused_imports)]
pub use mock_store::MockStore;

/// A minimal scene with one class named `name`.
pub fn scene_source(name: &str) -> String {
    format!(
        "from manim import *\n\nclass {name}(Scene):\n    def construct(self):\n        self.play(Create(Circle()))\n"
    )
}

/// Structured reply body for a script declaring `declared` over `source`.
pub fn script_json(declared: &str, source: &str) -> Value {
    json!({
        "scene_name": declared,
        "description": "A circle appears",
        "code": source,
        "estimated_duration": 12.0,
    })
}

/// Structured reply body for a well-formed scene named `name`.
#[allow(dead_code)]
pub fn scene_json(name: &str) -> Value {
    script_json(name, &scene_source(name))
}

/// A valid script value, for store tests.
#[allow(dead_code)]
pub fn scene_script(name: &str) -> GeneratedScript {
    GeneratedScript::builder()
        .entry_point_name(name)
        .description("A circle appears")
        .source_code(scene_source(name))
        .estimated_duration(12.0)
        .build()
        .expect("Failed to build test script")
}
