//! Grant Types
//!
//! Closed enumerations for the wire values of the token endpoint and the
//! passwordless start endpoint.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Grant type sent as `grant_type` to `oauth/token`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrantType {
    #[serde(rename = "password")]
    Password,
    #[serde(rename = "http://auth0.com/oauth/grant-type/password-realm")]
    PasswordRealm,
    #[serde(rename = "http://auth0.com/oauth/grant-type/mfa-otp")]
    MfaOtp,
    #[serde(rename = "http://auth0.com/oauth/grant-type/passwordless/otp")]
    PasswordlessOtp,
    #[serde(rename = "urn:ietf:params:oauth:grant-type:token-exchange")]
    TokenExchange,
    #[serde(rename = "authorization_code")]
    AuthorizationCode,
    #[serde(rename = "refresh_token")]
    RefreshToken,
}

impl GrantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::PasswordRealm => "http://auth0.com/oauth/grant-type/password-realm",
            Self::MfaOtp => "http://auth0.com/oauth/grant-type/mfa-otp",
            Self::PasswordlessOtp => "http://auth0.com/oauth/grant-type/passwordless/otp",
            Self::TokenExchange => "urn:ietf:params:oauth:grant-type:token-exchange",
            Self::AuthorizationCode => "authorization_code",
            Self::RefreshToken => "refresh_token",
        }
    }

    /// Parse a wire value back into a grant type.
    pub fn from_wire(value: &str) -> Option<Self> {
        [
            Self::Password,
            Self::PasswordRealm,
            Self::MfaOtp,
            Self::PasswordlessOtp,
            Self::TokenExchange,
            Self::AuthorizationCode,
            Self::RefreshToken,
        ]
        .into_iter()
        .find(|grant| grant.as_str() == value)
    }

    /// Body fields the token endpoint requires for this grant, besides
    /// `grant_type` itself.
    pub fn required_parameters(&self) -> &'static [&'static str] {
        match self {
            Self::Password => &["client_id", "username", "password"],
            Self::PasswordRealm => &["client_id", "username", "password", "realm"],
            Self::MfaOtp => &["client_id", "mfa_token", "otp"],
            Self::PasswordlessOtp => &["client_id", "username", "otp", "realm"],
            Self::TokenExchange => &["client_id", "subject_token", "subject_token_type"],
            Self::AuthorizationCode => &["client_id", "code", "redirect_uri"],
            Self::RefreshToken => &["client_id", "refresh_token"],
        }
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a passwordless code or link is delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PasswordlessType {
    /// One-time code.
    Code,
    /// Magic link opened in a browser.
    WebLink,
    /// Magic link handled by an Android app.
    AndroidLink,
    /// Magic link handled by an iOS app.
    IosLink,
}

impl PasswordlessType {
    /// Wire value of the `send` field.
    pub fn send_value(&self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::WebLink | Self::AndroidLink | Self::IosLink => "link",
        }
    }
}

/// Default connection for passwordless email flows.
pub const EMAIL_CONNECTION: &str = "email";
/// Default connection for passwordless SMS flows.
pub const SMS_CONNECTION: &str = "sms";
