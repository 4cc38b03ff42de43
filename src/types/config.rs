//! Configuration Types
//!
//! Account configuration consumed once when the client is built.

use std::collections::HashMap;
use std::time::Duration;

/// Account configuration for the authentication API.
#[derive(Clone, Debug)]
pub struct AccountConfig {
    /// Application client identifier.
    pub client_id: String,
    /// Normalized base URL of the tenant, without trailing slash.
    pub base_url: String,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// Read timeout for the whole response.
    pub read_timeout: Duration,
    /// Refuse TLS versions older than 1.2.
    pub enforce_tls12: bool,
    /// User agent sent with every request.
    pub user_agent: Option<String>,
    /// Headers added to every request (e.g. client info).
    pub default_headers: HashMap<String, String>,
    /// Upper bound for response bodies, in bytes.
    pub max_response_size: usize,
}

impl AccountConfig {
    /// Absolute URL for a path below the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            base_url: String::new(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS),
            enforce_tls12: true,
            user_agent: None,
            default_headers: HashMap::new(),
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
        }
    }
}

/// Default configuration values.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_RESPONSE_SIZE: usize = 1048576;
