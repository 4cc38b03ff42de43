//! Authentication Error Types
//!
//! Error hierarchy separating transport failures, decoded API errors and
//! undecodable responses.

use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;

/// Error code used when the error body is not JSON.
pub const ERROR_CODE_PLAIN: &str = "a0.sdk.internal_error.plain";
/// Error code used when the error body is empty.
pub const ERROR_CODE_EMPTY: &str = "a0.sdk.internal_error.empty";
/// Error code used when the error body is JSON but carries no code.
pub const ERROR_CODE_UNKNOWN: &str = "a0.sdk.internal_error.unknown";

/// Root error type for authentication API calls.
#[derive(Error, Debug)]
pub enum AuthenticationError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Request error: {0}")]
    Request(#[from] RequestError),
}

impl AuthenticationError {
    /// Get error code for telemetry.
    pub fn error_code(&self) -> &str {
        match self {
            Self::Configuration(_) => "AUTH_CONFIG",
            Self::Network(_) => "AUTH_NETWORK",
            Self::Api(e) => &e.code,
            Self::Protocol(_) => "AUTH_PROTOCOL",
            Self::Request(_) => "AUTH_REQUEST",
        }
    }

    /// True when no response was received from the server.
    pub fn is_network_error(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_retryable(),
            Self::Api(e) => e.status == 429 || e.status >= 500,
            _ => false,
        }
    }

    /// The decoded API error, if the server answered with one.
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }
}

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid domain: {domain} ({message})")]
    InvalidDomain { domain: String, message: String },

    #[error("HTTP client could not be built: {message}")]
    HttpClient { message: String },
}

/// Network/transport error: no response was received.
#[derive(Error, Debug, Clone)]
pub enum NetworkError {
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Request timeout after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Request could not be sent: {message}")]
    SendFailed { message: String },
}

impl NetworkError {
    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::SendFailed { .. })
    }
}

/// Protocol/response parsing error.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String, body: String },

    #[error("Response too large: {size} bytes")]
    ResponseTooLarge { size: usize },
}

/// Error raised by the request layer itself, before or around the network call.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Missing parameter '{field}' required by grant type {grant_type}")]
    MissingParameter { grant_type: String, field: String },

    #[error("Invalid parameter '{field}': {message}")]
    InvalidParameter { field: String, message: String },

    #[error("Request was canceled")]
    Canceled,

    #[error("Runtime error: {message}")]
    Runtime { message: String },
}

/// Structured error returned by the authentication API.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{code}: {description} (HTTP {status})")]
pub struct ApiError {
    /// HTTP status code of the response.
    pub status: u16,
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable description.
    pub description: String,
    /// Raw response body.
    pub body: String,
    /// Every value of the JSON error body.
    pub values: Map<String, Value>,
}

impl ApiError {
    /// Decode an error body. Never fails: unknown shapes fall back to the
    /// internal codes.
    pub fn from_response(status: u16, body: &str) -> Self {
        if body.trim().is_empty() {
            return Self::new(status, ERROR_CODE_EMPTY, "Empty response body", body, Map::new());
        }

        let values = match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(values)) => values,
            _ => return Self::new(status, ERROR_CODE_PLAIN, body, body, Map::new()),
        };

        let code = values
            .get("error")
            .or_else(|| values.get("code"))
            .and_then(Value::as_str)
            .unwrap_or(ERROR_CODE_UNKNOWN)
            .to_string();

        let description = match values
            .get("error_description")
            .or_else(|| values.get("description"))
        {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "Failed with unknown error".to_string(),
        };

        Self::new(status, &code, &description, body, values)
    }

    fn new(status: u16, code: &str, description: &str, body: &str, values: Map<String, Value>) -> Self {
        Self {
            status,
            code: code.to_string(),
            description: description.to_string(),
            body: body.to_string(),
            values,
        }
    }

    /// Look up any value of the error body.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// MFA token to use with the OTP grant after `mfa_required`.
    pub fn mfa_token(&self) -> Option<&str> {
        self.values.get("mfa_token").and_then(Value::as_str)
    }

    pub fn is_multifactor_required(&self) -> bool {
        self.code == "mfa_required" || self.code == "a0.mfa_required"
    }

    pub fn is_multifactor_enroll_required(&self) -> bool {
        self.code == "a0.mfa_registration_required" || self.code == "unsupported_challenge_type"
    }

    pub fn is_multifactor_code_invalid(&self) -> bool {
        self.code == "a0.mfa_invalid_code"
            || (self.code == "invalid_grant" && self.description == "Invalid otp_code.")
    }

    pub fn is_invalid_credentials(&self) -> bool {
        self.code == "invalid_user_password"
            || (self.code == "invalid_grant" && self.description == "Wrong email or password.")
            || (self.code == "invalid_grant" && self.description == "Wrong phone number or verification code.")
            || (self.code == "invalid_grant" && self.description == "Wrong email or verification code.")
    }

    pub fn is_access_denied(&self) -> bool {
        self.code == "access_denied"
    }

    pub fn is_password_leaked(&self) -> bool {
        self.code == "password_leaked"
    }

    /// A rule in the tenant rejected the login.
    pub fn is_rule_error(&self) -> bool {
        self.code == "unauthorized"
    }

    pub fn is_login_required(&self) -> bool {
        self.code == "login_required"
    }

    pub fn is_refresh_token_deleted(&self) -> bool {
        self.code == "invalid_grant"
            && self.description
                == "The refresh_token was generated for a user who doesn't exist anymore."
    }

    pub fn is_too_many_attempts(&self) -> bool {
        self.code == "too_many_attempts"
    }
}

/// Result type for authentication API operations.
pub type AuthResult<T> = Result<T, AuthenticationError>;
