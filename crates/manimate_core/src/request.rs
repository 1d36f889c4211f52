//! Animation request types.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Visual style of the rendered animation.
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
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Style {
    /// Light background, dark text, colourful elements
    #[default]
    Light,
    /// Dark background, light text, bright elements
    Dark,
}

impl Style {
    /// Palette sentence used when prompting for this style.
    pub fn palette(&self) -> &'static str {
        match self {
            Style::Light => "light background with dark text and colorful elements",
            Style::Dark => "dark background with light text and bright colorful elements",
        }
    }
}

/// A single invocation's request. Immutable once built.
///
/// # Examples
///
/// ```
/// use manimate_core::{AnimationRequest, Style};
///
/// let request = AnimationRequest::builder()
///     .user_prompt("draw a circle")
///     .use_enhancement(false)
///     .style(Style::Dark)
///     .build()
///     .unwrap();
///
/// assert_eq!(request.user_prompt(), "draw a circle");
/// assert!(!*request.use_enhancement());
/// assert_eq!(*request.style(), Style::Dark);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct AnimationRequest {
    /// Free-text description of what to animate
    user_prompt: String,

    /// Expand the prompt into a structured brief before generating code
    #[builder(default = "true")]
    use_enhancement: bool,

    /// Visual style
    #[builder(default)]
    style: Style,
}

impl AnimationRequest {
    /// Creates a new request builder.
    pub fn builder() -> AnimationRequestBuilder {
        AnimationRequestBuilder::default()
    }

    /// Request with enhancement enabled and the default style.
    pub fn new(user_prompt: impl Into<String>) -> Self {
        Self {
            user_prompt: user_prompt.into(),
            use_enhancement: true,
            style: Style::default(),
        }
    }
}
