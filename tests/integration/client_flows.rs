//! Client flows against the mock transport

use super::*;
use async_trait::async_trait;
use auth_api_integration::{
    AuthenticationError, Execute, HttpRequest, HttpResponse, HttpTransport, NetworkError,
    PasswordlessType, RequestError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[tokio::test]
async fn test_login_sends_exact_body() {
    let (client, mock) = mock_client();
    mock.queue_json_response(200, credentials_body());

    let credentials = client.login("a@b.com", "p", "r").execute().await.unwrap();
    assert_eq!(credentials.access_token(), "ACCESS");
    assert_eq!(credentials.refresh_token(), Some("REFRESH"));

    let sent = mock.get_last_request().unwrap();
    assert_eq!(sent.url, "https://tenant.auth0.com/oauth/token");
    assert_eq!(
        sent.json_body().unwrap(),
        json!({
            "username": "a@b.com",
            "password": "p",
            "grant_type": "http://auth0.com/oauth/grant-type/password-realm",
            "realm": "r",
            "client_id": CLIENT_ID
        })
    );
}

#[tokio::test]
async fn test_sign_up_creates_then_logs_in() {
    let (client, mock) = mock_client();
    mock.queue_json_response(200, json!({"_id": "5f1", "email": "a@b.com", "email_verified": false}));
    mock.queue_json_response(200, credentials_body());

    let credentials = client
        .sign_up("a@b.com", "p", Some("alice"), "db")
        .set_scope("openid offline_access")
        .execute()
        .await
        .unwrap();
    assert_eq!(credentials.access_token(), "ACCESS");

    let requests = mock.get_requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].url.ends_with("/dbconnections/signup"));
    assert!(requests[1].url.ends_with("/oauth/token"));

    let signup = requests[0].json_body().unwrap();
    assert_eq!(signup["username"], "alice");
    assert_eq!(signup["connection"], "db");

    let login = requests[1].json_body().unwrap();
    assert_eq!(login["username"], "a@b.com");
    assert_eq!(login["realm"], "db");
    assert_eq!(login["scope"], "openid offline_access");
}

#[tokio::test]
async fn test_sign_up_failure_never_logs_in() {
    let (client, mock) = mock_client();
    mock.queue_json_response(
        400,
        json!({"code": "user_exists", "description": "The user already exists."}),
    );

    let error = client
        .sign_up("a@b.com", "p", None, "db")
        .execute()
        .await
        .unwrap_err();

    let api = error.as_api_error().unwrap();
    assert_eq!(api.status, 400);
    assert_eq!(api.code, "user_exists");
    assert_eq!(mock.calls_to("oauth/token"), 0);
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_sign_up_login_failure_keeps_created_user() {
    let (client, mock) = mock_client();
    mock.queue_json_response(200, json!({"_id": "5f1", "email": "a@b.com"}));
    mock.queue_json_response(
        403,
        json!({"error": "unauthorized", "error_description": "Blocked by rule"}),
    );

    let error = client
        .sign_up("a@b.com", "p", None, "db")
        .execute()
        .await
        .unwrap_err();

    assert!(error.as_api_error().unwrap().is_rule_error());
    // No follow-up call to undo the sign-up
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn test_passwordless_start_defaults() {
    let (client, mock) = mock_client();
    mock.queue_json_response(200, json!({}));
    mock.queue_json_response(200, json!({}));

    client
        .passwordless_with_email("a@b.com", PasswordlessType::Code, None)
        .execute()
        .await
        .unwrap();
    client
        .passwordless_with_sms("+15550000", PasswordlessType::AndroidLink, None)
        .execute()
        .await
        .unwrap();

    let requests = mock.get_requests();
    assert_eq!(
        requests[0].json_body().unwrap(),
        json!({"email": "a@b.com", "send": "code", "connection": "email", "client_id": CLIENT_ID})
    );
    assert_eq!(
        requests[1].json_body().unwrap(),
        json!({"phone_number": "+15550000", "send": "link", "connection": "sms", "client_id": CLIENT_ID})
    );
    assert_eq!(mock.calls_to("passwordless/start"), 2);
}

#[tokio::test]
async fn test_profile_after_login_uses_new_token() {
    let (client, mock) = mock_client();
    mock.queue_json_response(200, credentials_body());
    mock.queue_json_response(200, profile_body());

    let authentication = client
        .get_profile_after(client.login_with_password("a@b.com", "p"))
        .set_audience("https://api.example.com")
        .execute()
        .await
        .unwrap();

    assert_eq!(authentication.credentials.access_token(), "ACCESS");
    assert_eq!(authentication.profile.id(), Some("auth0|123"));

    let requests = mock.get_requests();
    assert_eq!(requests[0].json_body().unwrap()["audience"], "https://api.example.com");
    assert!(requests[1].url.ends_with("/userinfo"));
    assert_eq!(requests[1].header("Authorization"), Some("Bearer ACCESS"));
}

#[tokio::test]
async fn test_profile_after_failed_login_skips_userinfo() {
    let (client, mock) = mock_client();
    mock.queue_json_response(
        401,
        json!({"error": "invalid_grant", "error_description": "Wrong email or password."}),
    );

    let error = client
        .get_profile_after(client.login("a@b.com", "bad", "db"))
        .execute()
        .await
        .unwrap_err();

    assert!(error.as_api_error().unwrap().is_invalid_credentials());
    assert_eq!(mock.calls_to("userinfo"), 0);
}

#[tokio::test]
async fn test_mfa_required_then_otp() {
    let (client, mock) = mock_client();
    mock.queue_json_response(
        403,
        json!({
            "error": "mfa_required",
            "error_description": "Multifactor authentication required",
            "mfa_token": "MFA"
        }),
    );
    mock.queue_json_response(200, credentials_body());

    let error = client.login("a@b.com", "p", "db").execute().await.unwrap_err();
    let api = error.as_api_error().unwrap();
    assert!(api.is_multifactor_required());
    let mfa_token = api.mfa_token().unwrap().to_string();

    client.login_with_otp(&mfa_token, "123456").execute().await.unwrap();
    let body = mock.get_last_request().unwrap().json_body().unwrap();
    assert_eq!(body["mfa_token"], "MFA");
    assert_eq!(body["otp"], "123456");
    assert_eq!(body["grant_type"], "http://auth0.com/oauth/grant-type/mfa-otp");
}

#[tokio::test]
async fn test_network_failure_is_reported_as_such() {
    let (client, mock) = mock_client();
    mock.queue_network_error(NetworkError::ConnectionFailed {
        message: "connection refused".to_string(),
    });

    let error = client.renew_auth("REFRESH").execute().await.unwrap_err();
    assert!(error.is_network_error());
    assert!(error.is_retryable());
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_redirect_status_is_api_error() {
    let (client, mock) = mock_client();
    mock.queue_response(HttpResponse::new(302, ""));

    let error = client.renew_auth("REFRESH").execute().await.unwrap_err();
    let api = error.as_api_error().unwrap();
    assert_eq!(api.status, 302);
    assert_eq!(api.code, "a0.sdk.internal_error.empty");
}

#[tokio::test]
async fn test_revoke_token_body() {
    let (client, mock) = mock_client();
    mock.queue_response(HttpResponse::new(200, ""));

    client.revoke_token("REFRESH").execute().await.unwrap();
    let sent = mock.get_last_request().unwrap();
    assert!(sent.url.ends_with("/oauth/revoke"));
    assert_eq!(
        sent.json_body().unwrap(),
        json!({"client_id": CLIENT_ID, "token": "REFRESH"})
    );
}

#[test]
fn test_blocking_execution() {
    let (client, mock) = mock_client();
    mock.queue_json_response(200, credentials_body());

    let credentials = client.renew_auth("REFRESH").execute_blocking().unwrap();
    assert_eq!(credentials.token_type, "Bearer");
}

/// Transport that never answers in time.
#[derive(Default)]
struct StalledTransport {
    calls: AtomicUsize,
}

#[async_trait]
impl HttpTransport for StalledTransport {
    async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, AuthenticationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(HttpResponse::new(200, "{}"))
    }
}

#[tokio::test]
async fn test_cancel_started_sign_up() {
    let transport = Arc::new(StalledTransport::default());
    let client = AuthenticationApiClient::with_transport(test_config("tenant.auth0.com"), transport.clone());

    let handle = client.sign_up("a@b.com", "p", None, "db").start();
    while transport.calls.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }
    handle.cancel();

    let outcome = handle.await;
    assert!(matches!(
        outcome,
        Err(AuthenticationError::Request(RequestError::Canceled))
    ));
    assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
}
