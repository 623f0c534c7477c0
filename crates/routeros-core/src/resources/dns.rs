//! Static DNS entries
//!
//! Maps the logical view callers use (`ip`, `enabled`) onto the device's
//! `ip/dns/static` records (`address`, `disabled`).

use crate::codec;
use crate::error::{Error, Result};
use crate::locator::ID_FIELD;
use crate::traits::{ManagedResource, TargetState};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Desired state of one static DNS entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsStaticEntry {
    /// Fully qualified domain name (natural key)
    pub name: String,

    /// IP address the name resolves to
    #[serde(default)]
    pub ip: Option<String>,

    /// Time to live, in RouterOS duration syntax (e.g. `1d`, `5m`)
    #[serde(default)]
    pub ttl: Option<String>,

    /// Whether the entry is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Whether the entry should exist
    #[serde(default)]
    pub state: TargetState,
}

impl DnsStaticEntry {
    /// Desired entry with only a name: present and enabled
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ip: None,
            ttl: None,
            enabled: default_enabled(),
            state: TargetState::Present,
        }
    }

    /// Set the IP address
    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: impl Into<String>) -> Self {
        self.ttl = Some(ttl.into());
        self
    }

    /// Enable or disable the entry
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the target state
    pub fn with_state(mut self, state: TargetState) -> Self {
        self.state = state;
        self
    }
}

impl ManagedResource for DnsStaticEntry {
    type Attributes = DnsEntryAttributes;

    const COLLECTION: &'static str = "ip/dns/static";
    const KEY_FIELD: &'static str = "name";
    const LABEL: &'static str = "DNS entry";

    fn natural_key(&self) -> &str {
        &self.name
    }

    fn target_state(&self) -> TargetState {
        self.state
    }

    fn desired_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();

        if let Some(ip) = &self.ip {
            fields.insert("address".to_string(), Value::String(ip.clone()));
        }
        if let Some(ttl) = &self.ttl {
            fields.insert("ttl".to_string(), Value::String(ttl.clone()));
        }
        fields.insert(
            "disabled".to_string(),
            Value::String(codec::disabled_flag(self.enabled).to_string()),
        );

        fields
    }

    fn attributes(path: &str, record: &Map<String, Value>) -> Result<DnsEntryAttributes> {
        let text = |field: &str| record.get(field).and_then(Value::as_str).map(str::to_string);

        let id = text(ID_FIELD).ok_or_else(|| Error::request(path, "record has no .id field"))?;
        let name = text("name").ok_or_else(|| Error::request(path, "record has no name field"))?;

        let enabled = match record.get("disabled").and_then(Value::as_str) {
            Some(disabled) => {
                let enabled = codec::enabled_from_disabled(disabled).ok_or_else(|| {
                    Error::request(path, format!("unexpected disabled value: {}", disabled))
                })?;
                Some(codec::encode_bool(enabled).to_string())
            }
            None => None,
        };

        Ok(DnsEntryAttributes {
            id,
            name,
            ip: text("address"),
            ttl: text("ttl"),
            enabled,
        })
    }
}

fn default_enabled() -> bool {
    true
}

/// Reported attributes of a static DNS entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsEntryAttributes {
    /// Device-assigned identifier
    pub id: String,

    /// Fully qualified domain name
    pub name: String,

    /// IP address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,

    /// Time to live as normalised by the device
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<String>,

    /// `"true"` or `"false"`, derived from the device's `disabled` flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<String>,
}
