// # Transport Trait
//
// Defines the interface for talking to a device's REST API.
//
// ## Implementations
//
// - HTTPS + basic auth: `routeros-rest` crate
// - In-memory device doubles in the contract tests
//
// ## Usage
//
// ```rust,ignore
// use routeros_core::{Method, Transport};
//
// let records = transport.call(Method::Get, "ip/dns/static", None).await?;
// ```

use async_trait::async_trait;
use serde_json::Value;

/// HTTP verb of a REST call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Put,
    Delete,
}

impl Method {
    /// Upper-case verb as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for REST transport implementations
///
/// # Contract
///
/// - `path` is relative to the device's `/rest/` base
/// - HTTP 204 yields an empty JSON object
/// - Any other 2xx yields the parsed JSON body
/// - Non-2xx statuses and transport failures yield [`crate::Error::Request`]
///   carrying `path`
///
/// Implementations are stateless between calls and never retry. A failed call
/// is reported once and the caller decides what to do with it.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue one REST call
    ///
    /// # Parameters
    ///
    /// - `method`: HTTP verb
    /// - `path`: Path below `/rest/`, e.g. `ip/dns/static` or `ip/dns/static/*1`
    /// - `payload`: Optional JSON body
    async fn call(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
    ) -> Result<Value, crate::Error>;
}
