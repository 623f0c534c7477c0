//! Reconciliation engine
//!
//! The [`Reconciler`] is responsible for:
//! - Locating the live record for a desired state
//! - Deciding create / update / delete / nothing
//! - Applying the decision (unless in check mode)
//! - Reporting the outcome
//!
//! ## Decision Table
//!
//! ```text
//! live record        │ target = present        │ target = absent
//! ───────────────────┼─────────────────────────┼────────────────
//! missing            │ create                  │ none
//! present, matching  │ none                    │ delete
//! present, drifted   │ update                  │ delete
//! ```
//!
//! ## Call Flow
//!
//! 1. `GET <collection>` and scan for the natural key
//! 2. Compare only the fields the caller supplied
//! 3. `PUT <collection>` (create), `PUT <collection>/<id>` (update) or
//!    `DELETE <collection>/<id>` (delete)
//! 4. Re-derive reported attributes from the device's answer
//!
//! Nothing is retried or rolled back. A failed apply is returned as-is.

use crate::error::{Error, Result};
use crate::locator::{CurrentRecord, ResourceLocator};
use crate::report::{self, Outcome};
use crate::traits::{ManagedResource, Method, TargetState, Transport};
use serde_json::{Map, Value};
use tracing::{debug, info};

/// Action required to reach the desired state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Nothing to do
    None,
    /// Create the record in the collection
    Create,
    /// Overwrite the existing record
    Update,
    /// Remove the existing record
    Delete,
}

impl Action {
    /// Whether the action modifies the device
    pub fn is_change(&self) -> bool {
        !matches!(self, Action::None)
    }
}

/// Result of comparing a desired state against the live record
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeDecision {
    /// What has to happen
    pub action: Action,

    /// REST path the action targets
    ///
    /// The collection for creates, `<collection>/<id>` when a record exists.
    pub path: String,

    /// Device-native body for create/update
    pub payload: Option<Map<String, Value>>,

    /// Human-readable summary
    pub message: String,
}

/// Decide what to do for `desired` given the live record, if any
///
/// Pure: no I/O, no logging. Only fields present in
/// [`ManagedResource::desired_fields`] are compared, so omitted attributes
/// never cause a change on their own.
pub fn plan<R: ManagedResource>(desired: &R, current: Option<&CurrentRecord>) -> ChangeDecision {
    let key = desired.natural_key();

    let (action, path) = match (desired.target_state(), current) {
        (TargetState::Present, None) => (Action::Create, R::COLLECTION.to_string()),
        (TargetState::Present, Some(record)) => {
            let action = if drifted(&desired.desired_fields(), record) {
                Action::Update
            } else {
                Action::None
            };
            (action, record.path(R::COLLECTION))
        }
        (TargetState::Absent, None) => (Action::None, R::COLLECTION.to_string()),
        (TargetState::Absent, Some(record)) => (Action::Delete, record.path(R::COLLECTION)),
    };

    let payload = match action {
        Action::Create | Action::Update => Some(payload(desired)),
        Action::None | Action::Delete => None,
    };

    ChangeDecision {
        action,
        path,
        payload,
        message: report::message(R::LABEL, key, action, current.is_some()),
    }
}

fn payload<R: ManagedResource>(desired: &R) -> Map<String, Value> {
    let mut payload = Map::new();
    payload.insert(
        R::KEY_FIELD.to_string(),
        Value::String(desired.natural_key().to_string()),
    );
    payload.extend(desired.desired_fields());
    payload
}

fn drifted(desired: &Map<String, Value>, record: &CurrentRecord) -> bool {
    desired
        .iter()
        .any(|(field, value)| record.fields.get(field) != Some(value))
}

/// Core reconciliation engine
///
/// Holds no state besides the transport and the check-mode flag; every call to
/// [`Reconciler::reconcile`] re-reads the device.
///
/// ## Check Mode
///
/// When `check_mode` is true the reconciler:
/// - Performs the lookup GET
/// - Computes and reports the decision
/// - **Never** sends the PUT or DELETE
pub struct Reconciler<'a> {
    /// Transport used for lookups and applies
    transport: &'a dyn Transport,

    /// Compute but do not apply
    check_mode: bool,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler that applies changes
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self {
            transport,
            check_mode: false,
        }
    }

    /// Enable or disable check mode
    pub fn with_check_mode(mut self, check_mode: bool) -> Self {
        self.check_mode = check_mode;
        self
    }

    /// Whether this reconciler runs in check mode
    pub fn check_mode(&self) -> bool {
        self.check_mode
    }

    /// Bring the device in line with `desired`
    ///
    /// # Returns
    ///
    /// - `Ok(Outcome)`: What changed (or would change) and the resulting attributes
    /// - `Err(Error)`: Invalid input or a failed REST call; nothing is rolled back
    pub async fn reconcile<R: ManagedResource>(
        &self,
        desired: &R,
    ) -> Result<Outcome<R::Attributes>> {
        let key = desired.natural_key();
        if key.trim().is_empty() {
            return Err(Error::invalid_input(format!(
                "{} {} cannot be empty",
                R::LABEL,
                R::KEY_FIELD
            )));
        }

        let current = ResourceLocator::new(self.transport)
            .find(R::COLLECTION, R::KEY_FIELD, key)
            .await?;

        let decision = plan(desired, current.as_ref());
        debug!("Decision for {} '{}': {:?}", R::LABEL, key, decision.action);

        if decision.action == Action::None {
            info!("{}", decision.message);
            let attributes = match &current {
                Some(record) => Some(R::attributes(&decision.path, &record.fields)?),
                None => None,
            };
            return Ok(Outcome::from_decision(&decision, attributes));
        }

        if self.check_mode {
            info!(
                "[CHECK MODE] {} (skipping {} {})",
                decision.message,
                apply_method(decision.action).as_str(),
                decision.path
            );
            return Ok(Outcome::from_decision(&decision, None));
        }

        let attributes = self.apply::<R>(&decision).await?;
        Ok(Outcome::from_decision(&decision, attributes))
    }

    /// Send the single REST call that carries out `decision`
    async fn apply<R: ManagedResource>(
        &self,
        decision: &ChangeDecision,
    ) -> Result<Option<R::Attributes>> {
        let method = apply_method(decision.action);
        info!("{}: {} {}", decision.message, method, decision.path);

        match decision.action {
            Action::Create | Action::Update => {
                let body = Value::Object(decision.payload.clone().unwrap_or_default());
                let response = self
                    .transport
                    .call(method, &decision.path, Some(&body))
                    .await?;

                let kind = crate::locator::json_kind(&response);
                let Value::Object(stored) = response else {
                    return Err(Error::request(
                        &decision.path,
                        format!("expected the stored record, got: {}", kind),
                    ));
                };

                Ok(Some(R::attributes(&decision.path, &stored)?))
            }
            Action::Delete => {
                self.transport.call(method, &decision.path, None).await?;
                Ok(None)
            }
            Action::None => Ok(None),
        }
    }
}

fn apply_method(action: Action) -> Method {
    match action {
        Action::Delete => Method::Delete,
        _ => Method::Put,
    }
}
