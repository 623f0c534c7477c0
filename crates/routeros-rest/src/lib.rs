// # RouterOS REST Transport
//
// This crate provides the HTTPS [`Transport`] implementation used to talk to
// a RouterOS device's REST API (`https://<host>:<port>/rest/...`).
//
// ## Behaviour
//
// - HTTP basic authentication on every request
// - `Content-Type` and `Accept` are always `application/json`
// - 204 → empty JSON object, other 2xx → parsed JSON body
// - Non-2xx (redirects included) and transport failures → `Error::Request`
//   with the path and cause
// - Connect timeout 10 s, request timeout 30 s
// - No retries, no caching, no background tasks
//
// ## TLS
//
// With `validate_certs` on, the router's certificate and hostname are checked
// against the system trust roots. With it off, any certificate is accepted.
// Routers ship with self-signed certificates, so turning validation off is
// common on lab networks; it also removes protection against interception.
//
// ## Security
//
// The password NEVER appears in logs or `Debug` output.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use routeros_core::traits::{Method, Transport};
use routeros_core::{ConnectionConfig, Error, Result};
use serde_json::{Map, Value};
use std::time::Duration;

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Default TCP/TLS connect timeout (10 seconds)
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const JSON: &str = "application/json";

/// REST client for one RouterOS device
pub struct RestClient {
    /// Base URL, always ending in `/rest/`
    base_url: String,

    /// User for basic authentication
    username: String,

    /// Password for basic authentication
    /// ⚠️ NEVER log this value
    password: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the password
impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .finish()
    }
}

impl RestClient {
    /// Create a client for `https://<hostname>:<port>/rest/`
    ///
    /// Fails with a configuration error if host, user or password is missing.
    /// No request is made.
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        config.validate()?;
        Self::build(config, config.base_url())
    }

    /// Create a client for a different REST root, e.g. a reverse proxy or a
    /// local test server
    ///
    /// `endpoint` is the scheme and authority (`http://127.0.0.1:8080`);
    /// `/rest/` is appended. Hostname and port from `config` are ignored but
    /// credentials are still required.
    pub fn with_endpoint(config: &ConnectionConfig, endpoint: &str) -> Result<Self> {
        if endpoint.trim().is_empty() {
            return Err(Error::config("REST endpoint cannot be empty"));
        }
        config.validate_credentials()?;

        let base_url = format!("{}/rest/", endpoint.trim().trim_end_matches('/'));
        Self::build(config, base_url)
    }

    fn build(config: &ConnectionConfig, base_url: String) -> Result<Self> {
        // Redirects are never followed: a 3xx is reported as a status error
        let mut builder = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .redirect(reqwest::redirect::Policy::none());

        if !config.validate_certs {
            tracing::warn!(
                "TLS certificate validation disabled for {} - any certificate will be accepted",
                base_url
            );
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            username: config.username.clone(),
            password: config.password.clone(),
            client,
        })
    }

    /// Base URL requests are resolved against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of a REST path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for RestClient {
    /// Issue one REST call
    ///
    /// # API Call
    ///
    /// ```http
    /// <METHOD> /rest/<path>
    /// Authorization: Basic <user:password>
    /// Content-Type: application/json
    /// Accept: application/json
    ///
    /// <payload>
    /// ```
    async fn call(&self, method: Method, path: &str, payload: Option<&Value>) -> Result<Value> {
        if path.trim_matches('/').is_empty() {
            return Err(Error::config("Url parameter is missing."));
        }

        let url = self.url(path);
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(http_method(method), &url)
            .basic_auth(&self.username, Some(&self.password))
            .header(CONTENT_TYPE, JSON)
            .header(ACCEPT, JSON);

        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::request(path, describe(&e)))?;

        let status = response.status();
        tracing::debug!("{} {} -> {}", method, path, status);

        if status == reqwest::StatusCode::NO_CONTENT {
            return Ok(Value::Object(Map::new()));
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(Error::status(path, status.as_u16(), error_text));
        }

        response.json::<Value>().await.map_err(|e| {
            Error::request(path, format!("Failed to parse response: {}", describe(&e)))
        })
    }
}

fn http_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// Flatten an error and its sources into one line
///
/// reqwest's own message is terse ("error sending request"); the useful part
/// (connection refused, certificate verify failed) sits in the source chain.
fn describe(err: &reqwest::Error) -> String {
    let mut message = if err.is_timeout() {
        format!("request timed out: {}", err)
    } else {
        err.to_string()
    };

    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}
