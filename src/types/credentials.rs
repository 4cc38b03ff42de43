//! Credentials Types
//!
//! Token endpoint response types.

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::profile::UserProfile;

/// Tokens returned by `oauth/token`.
///
/// Token values are kept as secrets and only exposed through the accessors.
#[derive(Clone, Debug, Deserialize)]
pub struct Credentials {
    access_token: SecretString,
    #[serde(default)]
    id_token: Option<SecretString>,
    /// Token type (usually "Bearer").
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    refresh_token: Option<SecretString>,
    /// Lifetime of the access token in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Granted scopes.
    #[serde(default)]
    pub scope: Option<String>,
    /// MFA recovery code, returned once after enrollment.
    #[serde(default)]
    recovery_code: Option<SecretString>,
    /// When the response was decoded locally.
    #[serde(skip, default = "Utc::now")]
    pub received_at: DateTime<Utc>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl Credentials {
    /// Access token value.
    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    /// ID token (OIDC), when requested with the `openid` scope.
    pub fn id_token(&self) -> Option<&str> {
        self.id_token.as_ref().map(|token| token.expose_secret().as_str())
    }

    /// Refresh token, when requested with `offline_access`.
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_ref().map(|token| token.expose_secret().as_str())
    }

    pub fn recovery_code(&self) -> Option<&str> {
        self.recovery_code.as_ref().map(|code| code.expose_secret().as_str())
    }

    /// Expiration time of the access token.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_in
            .map(|secs| self.received_at + Duration::seconds(secs as i64))
    }

    /// Check if the access token is expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at()
            .map(|exp| exp <= Utc::now())
            .unwrap_or(false)
    }

    /// Granted scopes as a list.
    pub fn scopes(&self) -> Vec<&str> {
        self.scope
            .as_deref()
            .map(|s| s.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Format as Authorization header value.
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.access_token.expose_secret())
    }
}

/// Result of a login followed by a profile fetch.
#[derive(Clone, Debug)]
pub struct Authentication {
    /// Profile of the authenticated user.
    pub profile: UserProfile,
    /// Tokens obtained by the login.
    pub credentials: Credentials,
}
