//! Result reporting
//!
//! Shapes a [`ChangeDecision`] (and, when applied, the device's answer) into
//! the `{changed, result: {msg, ...}}` structure returned to the caller.
//! Nothing here decides anything.

use crate::engine::{Action, ChangeDecision};
use serde::Serialize;

/// Outcome of one reconciliation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome<A> {
    /// Whether the device was (or, in check mode, would be) modified
    pub changed: bool,

    /// Message and resulting attributes
    pub result: OutcomeBody<A>,
}

/// Body of an [`Outcome`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeBody<A> {
    /// Human-readable summary of the decision
    pub msg: String,

    /// Resource attributes as the device reports them, when known
    #[serde(flatten)]
    pub attributes: Option<A>,
}

impl<A> Outcome<A> {
    /// Build an outcome from a decision and the attributes derived for it
    pub fn from_decision(decision: &ChangeDecision, attributes: Option<A>) -> Self {
        Self {
            changed: decision.action.is_change(),
            result: OutcomeBody {
                msg: decision.message.clone(),
                attributes,
            },
        }
    }

    /// Message of the outcome
    pub fn message(&self) -> &str {
        &self.result.msg
    }

    /// Reported attributes, if any
    pub fn attributes(&self) -> Option<&A> {
        self.result.attributes.as_ref()
    }
}

/// Message describing a decision
///
/// `exists` tells apart the two no-op cases: already up to date vs. already gone.
pub fn message(label: &str, key: &str, action: Action, exists: bool) -> String {
    let tail = match action {
        Action::Create => "will be created",
        Action::Update => "will be updated",
        Action::Delete => "will be removed",
        Action::None if exists => "already up to date",
        Action::None => "does not exist",
    };

    format!("{} with name '{}' {}", label, key, tail)
}
