//! Conversation continuation tokens.

use serde::{Deserialize, Serialize};

/// Opaque identifier returned by the gateway that lets the next call omit
/// prior conversation turns.
///
/// An empty continuation means "no context"; it must never replace a valid
/// one. Use [`Continuation::advance`] to thread tokens forward.
///
/// # Examples
///
/// ```
/// use manimate_core::Continuation;
///
/// let generation = Continuation::new("resp_gen");
/// let review = Continuation::default();
///
/// let kept = generation.clone().advance(review);
/// assert_eq!(kept, generation);
///
/// let repaired = kept.advance(Continuation::new("resp_fix"));
/// assert_eq!(repaired.as_str(), "resp_fix");
/// ```
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(transparent)]
pub struct Continuation(String);

impl Continuation {
    /// Wrap a gateway-issued identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier carries no context.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// The identifier to send with the next call, if any.
    pub fn for_request(&self) -> Option<&Continuation> {
        (!self.is_empty()).then_some(self)
    }

    /// Move to `newer` unless it is empty, in which case keep `self`.
    pub fn advance(self, newer: Continuation) -> Continuation {
        if newer.is_empty() { self } else { newer }
    }
}
