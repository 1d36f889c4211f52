//! LLM gateway implementations for manimate.
//!
//! [`ResponsesClient`] talks to an OpenAI-compatible Responses endpoint.
//! It chains calls through `previous_response_id`, requests strict JSON
//! schema output for structured calls, validates what comes back, and
//! retries transient failures with exponential backoff.
//!
//! ```no_run
//! use manimate_core::LlmCall;
//! use manimate_interface::LlmGateway;
//! use manimate_models::{GatewaySettings, ResponsesClient};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ResponsesClient::new(GatewaySettings::builder().build()?)?;
//! let call = LlmCall::builder()
//!     .instructions("You are terse.")
//!     .input("Name one Manim scene base class.")
//!     .build()?;
//! let reply = client.call(&call).await?;
//! println!("{:?}", reply.content().text());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod extraction;
mod openai;
mod settings;

pub use extraction::extract_json;
pub use openai::{
    ResponsesClient, ResponsesRequest, ResponsesResponse, parse_reply, to_request,
};
pub use settings::{GatewaySettings, GatewaySettingsBuilder, ReasoningEffort};
