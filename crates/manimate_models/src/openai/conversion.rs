//! Conversion between gateway envelopes and Responses API DTOs.

use super::dto::{ReasoningParam, ResponsesRequest, ResponsesResponse, TextFormat, TextParam};
use crate::GatewaySettings;
use crate::extraction::extract_json;
use manimate_core::{Continuation, LlmCall, LlmReply, OutputSchema, ReplyContent, Usage};
use manimate_error::{LlmError, LlmErrorKind, LlmResult};
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

/// Build the request body for one call.
///
/// A non-empty continuation becomes `previous_response_id` with
/// `store = true`. Temperature is dropped for models that reject it and
/// reasoning effort is sent only to models that accept it.
pub fn to_request(call: &LlmCall, settings: &GatewaySettings) -> ResponsesRequest {
    let previous_response_id = call
        .active_continuation()
        .map(|continuation| continuation.as_str().to_string());
    let store = previous_response_id.as_ref().map(|_| true);

    let temperature = if settings.accepts_temperature() {
        *call.temperature()
    } else {
        None
    };

    let reasoning = (*settings.reasoning_effort())
        .filter(|_| settings.accepts_reasoning())
        .map(|effort| ReasoningParam {
            effort: effort.to_string(),
        });

    let text = call.schema().as_ref().map(|schema| TextParam {
        format: TextFormat {
            kind: "json_schema".to_string(),
            name: schema.name().clone(),
            strict: true,
            schema: schema.schema().clone(),
        },
    });

    ResponsesRequest {
        model: settings.model().clone(),
        instructions: call.instructions().clone(),
        input: call.input().clone(),
        previous_response_id,
        store,
        max_output_tokens: *call.max_output_tokens(),
        temperature,
        reasoning,
        text,
    }
}

/// Turn a response into a reply, validating structured output.
///
/// # Errors
///
/// - `EmptyResponse` when no text came back
/// - `ResponseParse` when the model refused
/// - `SchemaMismatch` when structured output is not valid JSON or fails the
///   schema
/// - `InvalidSchema` when the schema itself cannot be compiled
pub fn parse_reply(
    response: ResponsesResponse,
    schema: Option<&OutputSchema>,
) -> LlmResult<LlmReply> {
    let text = output_text(&response);
    if text.is_empty() {
        if let Some(refusal) = refusal(&response) {
            return Err(LlmError::new(LlmErrorKind::ResponseParse(format!(
                "model refused: {}",
                refusal
            ))));
        }
        return Err(LlmError::new(LlmErrorKind::EmptyResponse));
    }

    let content = match schema {
        Some(schema) => ReplyContent::Structured(validate_structured(&text, schema)?),
        None => ReplyContent::Text(text),
    };

    let usage = response
        .usage
        .map(|usage| Usage::new(usage.input_tokens, usage.output_tokens));
    if let Some(usage) = &usage {
        debug!(
            input_tokens = usage.input_tokens(),
            output_tokens = usage.output_tokens(),
            "Token usage"
        );
    }

    Ok(LlmReply::new(content, Continuation::new(response.id), usage))
}

fn output_text(response: &ResponsesResponse) -> String {
    if let Some(text) = &response.output_text {
        let text = text.trim();
        if !text.is_empty() {
            return text.to_string();
        }
    }

    response
        .output
        .iter()
        .filter(|item| item.kind == "message" || item.kind.is_empty())
        .flat_map(|item| item.content.iter())
        .filter(|part| part.kind == "output_text" || part.kind == "text")
        .filter_map(|part| part.text.as_deref())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn refusal(response: &ResponsesResponse) -> Option<String> {
    response
        .output
        .iter()
        .flat_map(|item| item.content.iter())
        .find_map(|part| part.refusal.clone())
}

fn validate_structured(text: &str, schema: &OutputSchema) -> LlmResult<JsonValue> {
    let mismatch = |message: String| {
        LlmError::new(LlmErrorKind::SchemaMismatch {
            schema: schema.name().clone(),
            message,
        })
    };

    let value = extract_json(text).map_err(mismatch)?;

    let compiled = jsonschema::JSONSchema::compile(schema.schema()).map_err(|e| {
        LlmError::new(LlmErrorKind::InvalidSchema {
            schema: schema.name().clone(),
            message: e.to_string(),
        })
    })?;

    let problems: Vec<String> = match compiled.validate(&value) {
        Ok(()) => Vec::new(),
        Err(errors) => errors
            .map(|e| {
                let path = e.instance_path.to_string();
                if path.is_empty() {
                    e.to_string()
                } else {
                    format!("{}: {}", path, e)
                }
            })
            .collect(),
    };

    if !problems.is_empty() {
        warn!(schema = %schema.name(), count = problems.len(), "Structured output failed validation");
        return Err(mismatch(problems.join("; ")));
    }

    Ok(value)
}
