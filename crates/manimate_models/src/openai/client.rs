//! Responses API client.

use super::conversion::{parse_reply, to_request};
use super::dto::{ResponsesRequest, ResponsesResponse};
use crate::GatewaySettings;
use async_trait::async_trait;
use manimate_core::{LlmCall, LlmReply};
use manimate_error::{LlmError, LlmErrorKind, LlmResult};
use manimate_interface::LlmGateway;
use reqwest::Client;
use std::time::Duration;
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, instrument, warn};

/// Gateway over an OpenAI-compatible Responses endpoint.
#[derive(Debug, Clone)]
pub struct ResponsesClient {
    client: Client,
    api_key: String,
    settings: GatewaySettings,
}

impl ResponsesClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No API key is configured and the key variable is unset
    /// - The HTTP client cannot be initialized
    #[instrument(skip_all, fields(model = %settings.model()))]
    pub fn new(settings: GatewaySettings) -> LlmResult<Self> {
        let api_key = settings
            .api_key()
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                std::env::var(settings.api_key_env())
                    .ok()
                    .filter(|key| !key.trim().is_empty())
            })
            .ok_or_else(|| {
                LlmError::new(LlmErrorKind::MissingApiKey(settings.api_key_env().clone()))
            })?;

        let client = Client::builder()
            .timeout(*settings.request_timeout())
            .build()
            .map_err(|e| LlmError::new(LlmErrorKind::ClientCreation(e.to_string())))?;

        Ok(Self {
            client,
            api_key,
            settings,
        })
    }

    /// Gateway settings.
    pub fn settings(&self) -> &GatewaySettings {
        &self.settings
    }

    /// One HTTP round trip, no retries.
    async fn send_once(&self, body: &ResponsesRequest) -> LlmResult<ResponsesResponse> {
        let url = format!("{}/responses", self.settings.base_url().trim_end_matches('/'));
        debug!(url = %url, "Sending Responses API request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::new(LlmErrorKind::Timeout(e.to_string()))
                } else {
                    LlmError::new(LlmErrorKind::Transport(e.to_string()))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::new(LlmErrorKind::Http {
                status_code: status.as_u16(),
                message,
            }));
        }

        response.json::<ResponsesResponse>().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::new(LlmErrorKind::Timeout(e.to_string()))
            } else {
                LlmError::new(LlmErrorKind::ResponseParse(e.to_string()))
            }
        })
    }
}

#[async_trait]
impl LlmGateway for ResponsesClient {
    #[instrument(
        skip(self, call),
        fields(
            model = %self.settings.model(),
            structured = call.schema().is_some(),
            chained = call.active_continuation().is_some()
        )
    )]
    async fn call(&self, call: &LlmCall) -> LlmResult<LlmReply> {
        let body = to_request(call, &self.settings);

        let retry_strategy = ExponentialBackoff::from_millis(*self.settings.initial_backoff_ms())
            .factor(2)
            .max_delay(Duration::from_secs(*self.settings.max_backoff_secs()))
            .map(jitter)
            .take(*self.settings.max_retries());

        let this = self;
        let body = &body;
        let response = Retry::spawn(retry_strategy, || async move {
            match this.send_once(body).await {
                Ok(response) => Ok(response),
                Err(e) if e.kind.is_retryable() => {
                    warn!(error = %e, "Responses API request failed, will retry");
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
                Err(e) => {
                    warn!(error = %e, "Permanent Responses API error, failing immediately");
                    Err(RetryError::Permanent(e))
                }
            }
        })
        .await?;

        parse_reply(response, call.schema().as_ref())
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model_name(&self) -> &str {
        self.settings.model()
    }
}
