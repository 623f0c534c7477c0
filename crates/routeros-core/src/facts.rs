//! Device facts
//!
//! Reads hardware, identity and resource information from three read-only
//! endpoints and returns them as one typed value.

use crate::codec;
use crate::error::{Error, Result};
use crate::traits::{Method, Transport};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

const ROUTERBOARD_PATH: &str = "system/routerboard";
const IDENTITY_PATH: &str = "system/identity";
const RESOURCE_PATH: &str = "system/resource";

/// Facts gathered from a router
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterFacts {
    pub firmware_version: String,
    pub firmware_factory: String,
    pub firmware_type: String,
    /// Firmware version offered for upgrade, if any
    pub firmware_available: Option<String>,
    pub model: String,
    pub serial: Option<String>,
    pub routerboard: bool,
    pub identity: String,
    pub uptime: String,
    pub build_time: String,
    pub software_factory: String,
    pub memory_free: u64,
    pub memory_total: u64,
    pub cpu: String,
    pub cpu_count: u64,
    pub cpu_frequency: u64,
    pub cpu_load: u64,
    pub hdd_free: u64,
    pub hdd_total: u64,
    pub architecture: String,
    pub board_name: String,
    pub platform: String,
}

/// Gather facts from a router
///
/// # API Calls
///
/// ```http
/// GET /rest/system/routerboard
/// GET /rest/system/identity
/// GET /rest/system/resource
/// ```
pub async fn gather_facts(transport: &dyn Transport) -> Result<RouterFacts> {
    let board = Fields::fetch(transport, ROUTERBOARD_PATH).await?;
    let identity = Fields::fetch(transport, IDENTITY_PATH).await?;
    let resource = Fields::fetch(transport, RESOURCE_PATH).await?;

    let routerboard = board.text("routerboard")?;
    let routerboard = codec::decode_bool(&routerboard).unwrap_or(false);

    let facts = RouterFacts {
        firmware_version: board.text("current-firmware")?,
        firmware_factory: board.text("factory-firmware")?,
        firmware_type: board.text("firmware-type")?,
        firmware_available: board.optional_text("upgrade-firmware"),
        model: board.text("model")?,
        serial: board.optional_text("serial-number"),
        routerboard,
        identity: identity.text("name")?,
        uptime: resource.text("uptime")?,
        build_time: resource.text("build-time")?,
        software_factory: resource.text("factory-software")?,
        memory_free: resource.number("free-memory")?,
        memory_total: resource.number("total-memory")?,
        cpu: resource.text("cpu")?,
        cpu_count: resource.number("cpu-count")?,
        cpu_frequency: resource.number("cpu-frequency")?,
        cpu_load: resource.number("cpu-load")?,
        hdd_free: resource.number("free-hdd-space")?,
        hdd_total: resource.number("total-hdd-space")?,
        architecture: resource.text("architecture-name")?,
        board_name: resource.text("board-name")?,
        platform: resource.text("platform")?,
    };

    debug!("Gathered facts from {} ({})", facts.identity, facts.model);
    Ok(facts)
}

/// One endpoint's response, with the path kept for error messages
struct Fields {
    path: &'static str,
    value: Value,
}

impl Fields {
    async fn fetch(transport: &dyn Transport, path: &'static str) -> Result<Self> {
        let value = transport.call(Method::Get, path, None).await?;
        if !value.is_object() {
            return Err(Error::request(path, "expected a JSON object"));
        }
        Ok(Self { path, value })
    }

    fn optional_text(&self, field: &str) -> Option<String> {
        match self.value.get(field)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    fn text(&self, field: &str) -> Result<String> {
        self.optional_text(field)
            .ok_or_else(|| Error::request(self.path, format!("missing field {}", field)))
    }

    // The device reports numbers as strings; accept both
    fn number(&self, field: &str) -> Result<u64> {
        let raw = self.text(field)?;
        raw.trim().parse().map_err(|_| {
            Error::request(self.path, format!("field {} is not a number: {}", field, raw))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct FactsDevice {
        resource: Value,
    }

    #[async_trait]
    impl Transport for FactsDevice {
        async fn call(
            &self,
            _method: Method,
            path: &str,
            _payload: Option<&Value>,
        ) -> Result<Value> {
            match path {
                ROUTERBOARD_PATH => Ok(json!({
                    "routerboard": "true",
                    "model": "RB5009UG+S+",
                    "serial-number": "HD1234567",
                    "firmware-type": "70x0",
                    "factory-firmware": "7.4",
                    "current-firmware": "7.12",
                    "upgrade-firmware": "7.12",
                })),
                IDENTITY_PATH => Ok(json!({"name": "core-router"})),
                RESOURCE_PATH => Ok(self.resource.clone()),
                other => Err(Error::status(other, 404, "no such command")),
            }
        }
    }

    fn resource() -> Value {
        json!({
            "uptime": "1w2d3h",
            "build-time": "2023-11-09 11:37:46",
            "factory-software": "7.4",
            "free-memory": "838144000",
            "total-memory": "1073741824",
            "cpu": "ARM64",
            "cpu-count": "4",
            "cpu-frequency": "350",
            "cpu-load": 3,
            "free-hdd-space": "910159872",
            "total-hdd-space": "1073741824",
            "architecture-name": "arm64",
            "board-name": "RB5009UG+S+",
            "platform": "MikroTik",
        })
    }

    #[tokio::test]
    async fn gathers_and_parses_facts() {
        let device = FactsDevice { resource: resource() };

        let facts = gather_facts(&device).await.unwrap();

        assert!(facts.routerboard);
        assert_eq!(facts.identity, "core-router");
        assert_eq!(facts.firmware_version, "7.12");
        assert_eq!(facts.serial.as_deref(), Some("HD1234567"));
        assert_eq!(facts.memory_total, 1_073_741_824);
        assert_eq!(facts.cpu_count, 4);
        assert_eq!(facts.cpu_load, 3);
        assert_eq!(facts.platform, "MikroTik");
    }

    #[tokio::test]
    async fn unparsable_number_names_the_path() {
        let mut resource = resource();
        resource["cpu-count"] = json!("four");
        let device = FactsDevice { resource };

        let err = gather_facts(&device).await.unwrap_err();

        assert_eq!(err.path(), Some(RESOURCE_PATH));
        assert!(err.to_string().contains("cpu-count"));
    }

    #[tokio::test]
    async fn missing_field_is_request_error() {
        let mut resource = resource();
        resource.as_object_mut().unwrap().remove("platform");
        let device = FactsDevice { resource };

        let err = gather_facts(&device).await.unwrap_err();
        assert!(err.to_string().contains("missing field platform"));
    }
}
