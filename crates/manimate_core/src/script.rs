//! The generated animation script.

use crate::OutputSchema;
use derive_builder::Builder;
use derive_getters::Getters;
use manimate_error::{LlmError, LlmErrorKind};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Name of the schema used for every script-producing gateway call.
pub const GENERATED_SCRIPT_SCHEMA: &str = "generated_script";

/// An animation script produced by the gateway.
///
/// The only field mutated after construction is `entry_point_name`, which
/// the validator overwrites when the declared name disagrees with the class
/// actually present in `source_code`.
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Builder, Getters,
)]
#[builder(setter(into))]
pub struct GeneratedScript {
    /// Name of the scene class to render
    #[serde(rename = "scene_name")]
    entry_point_name: String,
    /// What the animation shows
    description: String,
    /// Complete Python source
    #[serde(rename = "code")]
    source_code: String,
    /// Estimated run time in seconds
    estimated_duration: f64,
    /// What a repair changed
    #[serde(default)]
    #[builder(default)]
    fix_description: Option<String>,
    /// What a review changed
    #[serde(default)]
    #[builder(default)]
    review_notes: Option<String>,
    /// Reviewer confidence in [0, 1]
    #[serde(default)]
    #[builder(default)]
    confidence: Option<f64>,
}

impl GeneratedScript {
    /// Creates a new builder.
    pub fn builder() -> GeneratedScriptBuilder {
        GeneratedScriptBuilder::default()
    }

    /// The strict schema the gateway must honour for this type.
    pub fn output_schema() -> OutputSchema {
        OutputSchema::of::<Self>(GENERATED_SCRIPT_SCHEMA)
    }

    /// Replace the declared entry point with the one found in source.
    pub fn set_entry_point_name(&mut self, name: impl Into<String>) {
        self.entry_point_name = name.into();
    }

    /// Check the value constraints a JSON schema cannot express strictly.
    pub fn check_invariants(&self) -> Result<(), LlmError> {
        let mismatch = |message: String| {
            LlmError::new(LlmErrorKind::SchemaMismatch {
                schema: GENERATED_SCRIPT_SCHEMA.to_string(),
                message,
            })
        };

        if !self.estimated_duration.is_finite() || self.estimated_duration <= 0.0 {
            return Err(mismatch(format!(
                "estimated_duration must be positive, got {}",
                self.estimated_duration
            )));
        }
        if let Some(confidence) = self.confidence {
            if !(0.0..=1.0).contains(&confidence) {
                return Err(mismatch(format!(
                    "confidence must lie in [0, 1], got {}",
                    confidence
                )));
            }
        }
        if self.source_code.trim().is_empty() {
            return Err(mismatch("code is empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(duration: f64, confidence: Option<f64>) -> GeneratedScript {
        GeneratedScript::builder()
            .entry_point_name("CircleScene")
            .description("A circle")
            .source_code("class CircleScene(Scene): pass")
            .estimated_duration(duration)
            .confidence(confidence)
            .build()
            .expect("complete builder")
    }

    #[test]
    fn deserializes_wire_names() -> Result<(), serde_json::Error> {
        let parsed: GeneratedScript = serde_json::from_str(
            r#"{"scene_name":"A","description":"d","code":"x = 1","estimated_duration":4.5}"#,
        )?;
        assert_eq!(parsed.entry_point_name(), "A");
        assert_eq!(parsed.source_code(), "x = 1");
        assert!(parsed.review_notes().is_none());
        Ok(())
    }

    #[test]
    fn rejects_non_positive_duration() {
        assert!(script(0.0, None).check_invariants().is_err());
        assert!(script(f64::NAN, None).check_invariants().is_err());
        assert!(script(3.0, None).check_invariants().is_ok());
    }

    #[test]
    fn rejects_out_of_range_confidence() {
        assert!(script(3.0, Some(1.5)).check_invariants().is_err());
        assert!(script(3.0, Some(0.8)).check_invariants().is_ok());
    }

    #[test]
    fn schema_uses_wire_names() {
        let schema = GeneratedScript::output_schema();
        let properties = &schema.schema()["properties"];
        assert!(properties.get("scene_name").is_some());
        assert!(properties.get("code").is_some());
        assert!(properties.get("source_code").is_none());
    }
}
