//! OpenAI Responses API gateway.

mod client;
mod conversion;
mod dto;

pub use client::ResponsesClient;
pub use conversion::{parse_reply, to_request};
pub use dto::{ResponsesRequest, ResponsesResponse};
