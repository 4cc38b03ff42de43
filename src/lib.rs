//! Authentication API Integration
//!
//! Typed client for an Auth0-compatible authentication API: database and
//! passwordless logins, sign-up, token renewal and revocation, profile and
//! JWKS retrieval.
//!
//! # Features
//!
//! - Password, password-realm, MFA OTP, passwordless OTP and token-exchange grants
//! - Authorization code exchange with PKCE (RFC 7636)
//! - Refresh token renewal and revocation
//! - Database sign-up, optionally followed by a login
//! - Login followed by a profile fetch
//! - Structured API errors with helpers for the common error codes
//!
//! # Example
//!
//! ```rust,ignore
//! use auth_api_integration::{account_config, AuthenticationApiClient, Execute};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = account_config()
//!         .client_id("my-client-id")
//!         .domain("my-tenant.auth0.com")
//!         .build()?;
//!
//!     let client = AuthenticationApiClient::new(config)?;
//!
//!     // Nothing is sent until the request is executed.
//!     let authentication = client
//!         .get_profile_after(client.login("user@example.com", "secret", "Username-Password-Authentication"))
//!         .set_scope("openid profile email offline_access")
//!         .execute()
//!         .await?;
//!
//!     println!("Logged in as {:?}", authentication.profile.email);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `types`: configuration, wire enumerations and response payloads
//! - `error`: error hierarchy and API error decoding
//! - `core`: transport, parameters, requests, chaining and PKCE
//! - `flows`: token request and the composite sign-up/profile requests
//! - `builders`: fluent builder for the account configuration
//! - `client`: the API client building each flow's request

pub mod builders;
pub mod client;
pub mod core;
pub mod error;
pub mod flows;
pub mod types;

// Re-export main client
pub use client::AuthenticationApiClient;

// Re-export builders
pub use builders::{account_config, AccountConfigBuilder};

// Re-export errors
pub use error::{
    ApiError, AuthResult, AuthenticationError, ConfigurationError, NetworkError, ProtocolError,
    RequestError,
};

// Re-export types
pub use types::{
    AccountConfig, Authentication, Credentials, DatabaseUser, GrantType, JsonWebKey,
    JsonWebKeySet, PasswordlessType, UserIdentity, UserProfile,
};

// Re-export core components
pub use crate::core::{
    // Execution
    AndThen, Execute, Map, Request, RequestHandle,
    // Parameters
    ParameterBuilder, ParameterSet,
    // PKCE
    Pkce,
    // Transport
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MockHttpTransport,
    ReqwestHttpTransport,
};

// Re-export flows
pub use flows::{AuthenticationRequest, ProfileRequest, SignUpRequest};
