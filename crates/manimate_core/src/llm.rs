//! Gateway call and reply envelopes.

use crate::{Continuation, OutputSchema};
use derive_builder::Builder;
use derive_getters::Getters;
use manimate_error::{LlmError, LlmErrorKind};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// One gateway call: a system instruction, user content, and optional
/// schema and continuation.
///
/// # Examples
///
/// ```
/// use manimate_core::{Continuation, LlmCall};
///
/// let call = LlmCall::builder()
///     .instructions("You write Manim code.")
///     .input("Animate a circle.")
///     .continuation(Continuation::new("resp_1"))
///     .temperature(0.7_f32)
///     .build()
///     .unwrap();
///
/// assert!(call.schema().is_none());
/// assert_eq!(call.continuation().as_ref().map(|c| c.as_str()), Some("resp_1"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into, strip_option))]
pub struct LlmCall {
    /// System instruction
    instructions: String,
    /// User content
    input: String,
    /// Schema the reply must satisfy; free text when absent
    #[builder(default)]
    schema: Option<OutputSchema>,
    /// Context from the previous call
    #[builder(default)]
    continuation: Option<Continuation>,
    /// Sampling temperature
    #[builder(default)]
    temperature: Option<f32>,
    /// Output token cap
    #[builder(default)]
    max_output_tokens: Option<u32>,
}

impl LlmCall {
    /// Creates a new builder.
    pub fn builder() -> LlmCallBuilder {
        LlmCallBuilder::default()
    }

    /// The continuation to send, skipping empty ones.
    pub fn active_continuation(&self) -> Option<&Continuation> {
        self.continuation.as_ref().and_then(Continuation::for_request)
    }
}

/// Reply payload: free text, or a JSON value already validated against the
/// call's schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ReplyContent {
    /// Unstructured text
    Text(String),
    /// Schema-validated JSON
    Structured(serde_json::Value),
}

impl ReplyContent {
    /// The text payload, if this is a text reply.
    pub fn text(&self) -> Option<&str> {
        match self {
            ReplyContent::Text(text) => Some(text),
            ReplyContent::Structured(_) => None,
        }
    }

    /// Decode a structured payload into `T`.
    ///
    /// A text reply or a value that does not fit `T` is a schema mismatch.
    pub fn into_structured<T: DeserializeOwned>(self, schema: &str) -> Result<T, LlmError> {
        match self {
            ReplyContent::Structured(value) => serde_json::from_value(value).map_err(|e| {
                LlmError::new(LlmErrorKind::SchemaMismatch {
                    schema: schema.to_string(),
                    message: e.to_string(),
                })
            }),
            ReplyContent::Text(_) => Err(LlmError::new(LlmErrorKind::SchemaMismatch {
                schema: schema.to_string(),
                message: "expected structured output, got free text".to_string(),
            })),
        }
    }
}

/// Token accounting reported by the gateway.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Usage {
    /// Prompt tokens
    input_tokens: u64,
    /// Completion tokens
    output_tokens: u64,
    /// Sum of both
    total_tokens: u64,
}

impl Usage {
    /// Build from the two counts.
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
        }
    }
}

/// A gateway reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct LlmReply {
    /// Payload
    content: ReplyContent,
    /// Identifier for chaining the next call; may be empty
    continuation: Continuation,
    /// Token accounting, when reported
    usage: Option<Usage>,
}

impl LlmReply {
    /// Assemble a reply.
    pub fn new(content: ReplyContent, continuation: Continuation, usage: Option<Usage>) -> Self {
        Self {
            content,
            continuation,
            usage,
        }
    }

    /// Split into payload and continuation.
    pub fn into_parts(self) -> (ReplyContent, Continuation) {
        (self.content, self.continuation)
    }
}
