//! Configuration Builder
//!
//! Fluent builder for the account configuration.

use std::collections::HashMap;
use std::time::Duration;
use url::Url;

use crate::error::{AuthResult, ConfigurationError};
use crate::types::{
    AccountConfig, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_MAX_RESPONSE_SIZE,
    DEFAULT_READ_TIMEOUT_SECS,
};

/// Account configuration builder.
#[derive(Debug)]
pub struct AccountConfigBuilder {
    client_id: Option<String>,
    domain: Option<String>,
    connect_timeout: Duration,
    read_timeout: Duration,
    enforce_tls12: bool,
    user_agent: Option<String>,
    default_headers: HashMap<String, String>,
    max_response_size: usize,
}

impl AccountConfigBuilder {
    /// Create new configuration builder.
    pub fn new() -> Self {
        Self {
            client_id: None,
            domain: None,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS),
            enforce_tls12: true,
            user_agent: None,
            default_headers: HashMap::new(),
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
        }
    }

    /// Set client ID.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set tenant domain, e.g. `tenant.auth0.com` or a full URL.
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Require TLS 1.2 or newer. Enabled by default.
    pub fn enforce_tls12(mut self, enforce: bool) -> Self {
        self.enforce_tls12 = enforce;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Add a header sent with every request.
    pub fn add_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    pub fn max_response_size(mut self, size: usize) -> Self {
        self.max_response_size = size;
        self
    }

    /// Build the account configuration.
    pub fn build(self) -> AuthResult<AccountConfig> {
        let client_id = self
            .client_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ConfigurationError::MissingField {
                field: "client_id".to_string(),
            })?;

        let domain = self
            .domain
            .filter(|domain| !domain.trim().is_empty())
            .ok_or_else(|| ConfigurationError::MissingField {
                field: "domain".to_string(),
            })?;

        let base_url = normalize_domain(&domain)?;

        Ok(AccountConfig {
            client_id,
            base_url,
            connect_timeout: self.connect_timeout,
            read_timeout: self.read_timeout,
            enforce_tls12: self.enforce_tls12,
            user_agent: self.user_agent,
            default_headers: self.default_headers,
            max_response_size: self.max_response_size,
        })
    }
}

impl Default for AccountConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Base URL for a domain: `https://` when no scheme is given, no trailing
/// slash.
fn normalize_domain(domain: &str) -> Result<String, ConfigurationError> {
    let domain = domain.trim();
    let candidate = if domain.contains("://") {
        domain.to_string()
    } else {
        format!("https://{}", domain)
    };

    let invalid = |message: String| ConfigurationError::InvalidDomain {
        domain: domain.to_string(),
        message,
    };

    let url = Url::parse(&candidate).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Create account configuration builder.
pub fn account_config() -> AccountConfigBuilder {
    AccountConfigBuilder::new()
}
