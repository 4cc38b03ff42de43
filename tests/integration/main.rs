//! Integration tests
//!
//! Client flows against the in-memory mock transport, and the full
//! request/response cycle through the reqwest transport against WireMock.

mod client_flows;
mod http_roundtrip;

use auth_api_integration::{account_config, AccountConfig, AuthenticationApiClient, MockHttpTransport};
use serde_json::{json, Value};
use std::sync::Arc;

pub const CLIENT_ID: &str = "CLIENTID";

/// Configuration for a tenant served at `domain`.
pub fn test_config(domain: &str) -> AccountConfig {
    account_config()
        .client_id(CLIENT_ID)
        .domain(domain)
        .build()
        .expect("valid test configuration")
}

/// Client backed by a fresh mock transport.
pub fn mock_client() -> (AuthenticationApiClient, Arc<MockHttpTransport>) {
    let mock = Arc::new(MockHttpTransport::new());
    let client = AuthenticationApiClient::with_transport(test_config("tenant.auth0.com"), mock.clone());
    (client, mock)
}

pub fn credentials_body() -> Value {
    json!({
        "access_token": "ACCESS",
        "id_token": "ID",
        "refresh_token": "REFRESH",
        "token_type": "Bearer",
        "expires_in": 86400,
        "scope": "openid profile"
    })
}

pub fn profile_body() -> Value {
    json!({
        "sub": "auth0|123",
        "name": "Jane Doe",
        "email": "jane@example.com",
        "email_verified": true
    })
}
