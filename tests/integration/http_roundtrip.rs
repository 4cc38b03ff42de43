//! Full request/response cycle through the reqwest transport

use super::*;
use auth_api_integration::{AuthenticationError, Execute, NetworkError};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

fn client_for(server: &MockServer) -> AuthenticationApiClient {
    AuthenticationApiClient::new(test_config(&server.uri())).expect("client builds")
}

#[tokio::test]
async fn test_login_roundtrip() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "username": "a@b.com",
            "password": "p",
            "grant_type": "http://auth0.com/oauth/grant-type/password-realm",
            "realm": "Username-Password-Authentication",
            "client_id": CLIENT_ID
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(credentials_body()))
        .expect(1)
        .mount(&server)
        .await;

    let credentials = client_for(&server)
        .login("a@b.com", "p", "Username-Password-Authentication")
        .execute()
        .await
        .unwrap();

    assert_eq!(credentials.access_token(), "ACCESS");
    assert_eq!(credentials.expires_in, Some(86400));
    assert_eq!(credentials.scopes(), vec!["openid", "profile"]);
}

#[tokio::test]
async fn test_api_error_is_decoded() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Wrong email or password."
        })))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .login_with_password("a@b.com", "bad")
        .execute()
        .await
        .unwrap_err();

    assert_eq!(error.error_code(), "invalid_grant");
    let api = error.as_api_error().unwrap();
    assert_eq!(api.status, 403);
    assert!(api.is_invalid_credentials());
    assert!(!error.is_retryable());
}

#[tokio::test]
async fn test_plain_text_error_body() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/dbconnections/change_password"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .reset_password("a@b.com", "db")
        .execute()
        .await
        .unwrap_err();

    let api = error.as_api_error().unwrap();
    assert_eq!(api.code, "a0.sdk.internal_error.plain");
    assert_eq!(api.description, "Internal Server Error");
    assert!(error.is_retryable());
}

#[tokio::test]
async fn test_user_info_roundtrip() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/userinfo"))
        .and(header("Authorization", "Bearer ACCESS"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
        .mount(&server)
        .await;

    let profile = client_for(&server).user_info("ACCESS").execute().await.unwrap();
    assert_eq!(profile.email.as_deref(), Some("jane@example.com"));
    assert_eq!(profile.email_verified, Some(true));
}

#[tokio::test]
async fn test_sign_up_roundtrip() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/dbconnections/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "5f1",
            "email": "a@b.com",
            "email_verified": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(credentials_body()))
        .expect(1)
        .mount(&server)
        .await;

    let credentials = client_for(&server)
        .sign_up("a@b.com", "p", None, "db")
        .execute()
        .await
        .unwrap();
    assert_eq!(credentials.id_token(), Some("ID"));
}

#[tokio::test]
async fn test_fetch_json_web_keys() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/.well-known/jwks.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "keys": [{
                "kty": "RSA",
                "kid": "key-1",
                "alg": "RS256",
                "use": "sig",
                "n": "sXchDaQebHnPiGvyDOAT4saGEUetSyo9MKLOoWFsueri23bOdgWp4Dy1WlUzewbgBHod5pcM9H95GQRV3JDXboIRROSBigeC5yjU1hGzHHyXss8UDprecbAYxknTcQkhslANGRUZmdTOQ5qTRsLAt6BTYuyvVRdhS8exSZEy_c4gs_7svlJJQ4H9_NxsiIoLwAEk7-Q3UXERGYw_75IDrGA84-lA_-Ct4eTlXHBIY2EaV7t7LjJaynVJCpkv4LKjTTAumiGUIuQhrNhZLuF_RJLqHpM2kgWFLU7-VTdL1VbC2tejvcI2BlMkEpk1BzBZI0KQB0GaDWFLN-aEAw3vRw",
                "e": "AQAB"
            }]
        })))
        .mount(&server)
        .await;

    let jwks = client_for(&server).fetch_json_web_keys().execute().await.unwrap();
    let key = jwks.find("key-1").unwrap();
    assert!(key.is_rsa());
    assert_eq!(key.alg.as_deref(), Some("RS256"));
}

#[tokio::test]
async fn test_default_headers_and_user_agent_are_sent() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/oauth/revoke"))
        .and(header("Auth0-Client", "client-info"))
        .and(header("user-agent", "integration-test/1.0"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let config = account_config()
        .client_id(CLIENT_ID)
        .domain(server.uri())
        .user_agent("integration-test/1.0")
        .add_default_header("Auth0-Client", "client-info")
        .build()
        .unwrap();

    AuthenticationApiClient::new(config)
        .unwrap()
        .revoke_token("REFRESH")
        .execute()
        .await
        .unwrap();
}

#[tokio::test]
async fn test_redirect_is_not_followed() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", "https://elsewhere.example.com/"),
        )
        .mount(&server)
        .await;

    let error = client_for(&server).renew_auth("REFRESH").execute().await.unwrap_err();
    let api = error.as_api_error().unwrap();
    assert_eq!(api.status, 302);
    assert_eq!(api.code, "a0.sdk.internal_error.empty");
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_read_timeout() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(credentials_body())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let error = client_for(&server)
        .renew_auth("REFRESH")
        .timeout(Duration::from_millis(200))
        .execute()
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        AuthenticationError::Network(NetworkError::Timeout { .. })
    ));
}
