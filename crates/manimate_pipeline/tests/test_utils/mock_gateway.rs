//! Scripted LLM gateway.

use async_trait::async_trait;
use manimate_core::{Continuation, LlmCall, LlmReply, ReplyContent};
use manimate_error::{LlmError, LlmErrorKind, LlmResult};
use manimate_interface::LlmGateway;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A single scripted reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Structured content with the given continuation
    Structured(Value, &'static str),
    /// Free text with the given continuation
    Text(String, &'static str),
    /// Fail with the given error
    Error(LlmErrorKind),
    /// Never answer within any reasonable deadline
    Hang,
}

#[derive(Debug, Default)]
struct State {
    replies: VecDeque<MockReply>,
    calls: Vec<LlmCall>,
}

/// Gateway that answers from a queue and records every call.
///
/// Clones share state, so a test can keep a handle after moving the
/// gateway into a pipeline.
#[derive(Debug, Clone, Default)]
pub struct MockGateway {
    state: Arc<Mutex<State>>,
}

impl MockGateway {
    /// Gateway answering with `replies` in order.
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                replies: replies.into(),
                calls: Vec::new(),
            })),
        }
    }

    /// Number of calls received.
    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    /// Every call received, in order.
    pub fn calls(&self) -> Vec<LlmCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// The continuation the `index`th call carried, empty when none.
    #[allow(dead_code)]
    pub fn continuation_of(&self, index: usize) -> String {
        self.calls()
            .get(index)
            .and_then(|call| call.active_continuation().map(|c| c.as_str().to_string()))
            .unwrap_or_default()
    }

    fn next_reply(&self, call: &LlmCall) -> MockReply {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call.clone());
        state
            .replies
            .pop_front()
            .unwrap_or_else(|| MockReply::Error(LlmErrorKind::EmptyResponse))
    }
}

#[async_trait]
impl LlmGateway for MockGateway {
    async fn call(&self, call: &LlmCall) -> LlmResult<LlmReply> {
        match self.next_reply(call) {
            MockReply::Structured(value, continuation) => Ok(LlmReply::new(
                ReplyContent::Structured(value),
                Continuation::new(continuation),
                None,
            )),
            MockReply::Text(text, continuation) => Ok(LlmReply::new(
                ReplyContent::Text(text),
                Continuation::new(continuation),
                None,
            )),
            MockReply::Error(kind) => Err(LlmError::new(kind)),
            MockReply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(LlmError::new(LlmErrorKind::EmptyResponse))
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}
