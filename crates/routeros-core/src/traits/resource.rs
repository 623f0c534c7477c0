//! Managed resource description
//!
//! A [`ManagedResource`] is one caller-supplied desired state for a resource
//! that lives in a flat REST collection, is found by a natural key, and is
//! otherwise a bag of string-encoded attributes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Target lifecycle state of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetState {
    /// The resource must exist with the desired attributes
    #[default]
    Present,
    /// The resource must not exist
    Absent,
}

impl std::str::FromStr for TargetState {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(TargetState::Present),
            "absent" => Ok(TargetState::Absent),
            other => Err(crate::Error::invalid_input(format!(
                "state must be one of present, absent. Got: {}",
                other
            ))),
        }
    }
}

/// Trait for desired-state descriptions of key-attribute resources
///
/// Implementations translate logical values into the device-native encoding.
/// The reconciler never inspects individual fields; it only compares the map
/// returned by [`ManagedResource::desired_fields`] against the live record.
pub trait ManagedResource: Send + Sync {
    /// Attributes reported back to the caller after a reconciliation
    type Attributes: Serialize + Clone + PartialEq + std::fmt::Debug + Send;

    /// REST collection below `/rest/`, e.g. `ip/dns/static`
    const COLLECTION: &'static str;

    /// Device field holding the natural key
    const KEY_FIELD: &'static str;

    /// Human-readable resource name used in messages, e.g. `DNS entry`
    const LABEL: &'static str;

    /// Natural key value this desired state targets
    fn natural_key(&self) -> &str;

    /// Whether the resource should exist
    fn target_state(&self) -> TargetState;

    /// Device-native values of every attribute the caller supplied
    ///
    /// The natural key is not included. Omitted attributes must not appear,
    /// so they are never compared and never sent.
    fn desired_fields(&self) -> Map<String, Value>;

    /// Extract reportable attributes from a device record
    ///
    /// `path` is the REST path the record came from, for error reporting.
    fn attributes(path: &str, record: &Map<String, Value>) -> crate::Result<Self::Attributes>;
}
