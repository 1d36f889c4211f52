//! Gateway configuration.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Reasoning effort for models that accept it.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ReasoningEffort {
    /// Fastest
    Low,
    /// Balanced
    #[default]
    Medium,
    /// Most thorough
    High,
}

impl ReasoningEffort {
    /// Interpret a configured value.
    ///
    /// Blank disables reasoning; anything unrecognised becomes `Medium`.
    ///
    /// # Examples
    ///
    /// ```
    /// use manimate_models::ReasoningEffort;
    ///
    /// assert_eq!(ReasoningEffort::normalize(" HIGH "), Some(ReasoningEffort::High));
    /// assert_eq!(ReasoningEffort::normalize("extreme"), Some(ReasoningEffort::Medium));
    /// assert_eq!(ReasoningEffort::normalize(""), None);
    /// ```
    pub fn normalize(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        Some(Self::from_str(value).unwrap_or_default())
    }
}

/// Connection and retry settings for [`crate::ResponsesClient`].
#[derive(Debug, Clone, PartialEq, Eq, Builder, Getters)]
#[builder(setter(into))]
pub struct GatewaySettings {
    /// Model identifier
    #[builder(default = "\"gpt-4o\".to_string()")]
    model: String,
    /// API root, without the `/responses` suffix
    #[builder(default = "\"https://api.openai.com/v1\".to_string()")]
    base_url: String,
    /// Explicit API key; overrides the environment
    #[builder(default, setter(into, strip_option))]
    api_key: Option<String>,
    /// Environment variable holding the API key
    #[builder(default = "\"OPENAI_API_KEY\".to_string()")]
    api_key_env: String,
    /// Reasoning effort for reasoning-capable models
    #[builder(default = "Some(ReasoningEffort::Medium)")]
    reasoning_effort: Option<ReasoningEffort>,
    /// Per-request deadline
    #[builder(default = "Duration::from_secs(120)")]
    request_timeout: Duration,
    /// Retries after the first transient failure
    #[builder(default = "3")]
    max_retries: usize,
    /// First backoff delay
    #[builder(default = "1000")]
    initial_backoff_ms: u64,
    /// Backoff ceiling
    #[builder(default = "30")]
    max_backoff_secs: u64,
}

impl GatewaySettings {
    /// Creates a new builder.
    pub fn builder() -> GatewaySettingsBuilder {
        GatewaySettingsBuilder::default()
    }

    /// GPT-5 models reject sampling parameters.
    pub fn accepts_temperature(&self) -> bool {
        !self.model.starts_with("gpt-5")
    }

    /// Only reasoning models take a `reasoning` block.
    pub fn accepts_reasoning(&self) -> bool {
        ["gpt-5", "o1", "o3", "o4"]
            .iter()
            .any(|prefix| self.model.starts_with(prefix))
    }
}
