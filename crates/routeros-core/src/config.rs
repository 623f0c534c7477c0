//! Connection configuration for the RouterOS REST API
//!
//! The engine only ever sees a fully resolved [`ConnectionConfig`]. Where the
//! values came from (flags, environment, a vault) is the adapter's business.

use serde::{Deserialize, Serialize};

/// Default HTTPS port of the RouterOS REST service
pub const DEFAULT_PORT: u16 = 443;

/// Resolved connection settings for one device
#[derive(Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Hostname or IP address of the router
    #[serde(default)]
    pub hostname: String,

    /// User to authenticate as
    #[serde(default)]
    pub username: String,

    /// Password for basic authentication
    /// ⚠️ NEVER log this value
    #[serde(default, skip_serializing)]
    pub password: String,

    /// Port of the REST API service
    #[serde(default = "default_port")]
    pub port: u16,

    /// Whether to validate the router's TLS certificate and hostname
    #[serde(default = "default_validate_certs")]
    pub validate_certs: bool,
}

// Custom Debug implementation that hides the password
impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("hostname", &self.hostname)
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .field("port", &self.port)
            .field("validate_certs", &self.validate_certs)
            .finish()
    }
}

impl ConnectionConfig {
    /// Create a configuration with the default port and certificate validation on
    pub fn new(
        hostname: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            username: username.into(),
            password: password.into(),
            port: DEFAULT_PORT,
            validate_certs: default_validate_certs(),
        }
    }

    /// Set the REST API port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enable or disable TLS certificate validation
    pub fn with_validate_certs(mut self, validate_certs: bool) -> Self {
        self.validate_certs = validate_certs;
        self
    }

    /// Validate the configuration
    ///
    /// Host, user and password must all be non-empty. This runs before any
    /// request is built.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.hostname.trim().is_empty() {
            return Err(crate::Error::config("Hostname parameter is missing."));
        }
        self.validate_credentials()?;
        if self.port == 0 {
            return Err(crate::Error::config("Port must be > 0"));
        }
        Ok(())
    }

    /// Validate that user and password are set
    pub fn validate_credentials(&self) -> Result<(), crate::Error> {
        if self.username.is_empty() {
            return Err(crate::Error::config("Username parameter is missing."));
        }
        if self.password.is_empty() {
            return Err(crate::Error::config("Password parameter is missing."));
        }
        Ok(())
    }

    /// Base URL of the REST API, always ending in `/rest/`
    pub fn base_url(&self) -> String {
        format!("https://{}:{}/rest/", self.hostname.trim(), self.port)
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_validate_certs() -> bool {
    true
}
