//! Authentication API Client
//!
//! Entry point that builds the request for each authentication flow. Every
//! method returns an unstarted request; nothing is sent until the caller
//! executes or starts it.

use std::sync::Arc;
use tracing::debug;

use crate::core::parameters::{ParameterBuilder, ParameterSet};
use crate::core::pkce::Pkce;
use crate::core::request::{decode_json, discard_body, Request, ResponseDecoder};
use crate::core::transport::{HttpTransport, ReqwestHttpTransport};
use crate::error::AuthResult;
use crate::flows::{AuthenticationRequest, ProfileRequest, SignUpRequest, AUTHORIZATION_HEADER};
use crate::types::{
    AccountConfig, Credentials, DatabaseUser, GrantType, JsonWebKeySet, PasswordlessType,
    UserProfile, EMAIL_CONNECTION, SMS_CONNECTION,
};

const USERNAME_KEY: &str = "username";
const PASSWORD_KEY: &str = "password";
const EMAIL_KEY: &str = "email";
const PHONE_NUMBER_KEY: &str = "phone_number";
const OAUTH_CODE_KEY: &str = "code";
const CODE_VERIFIER_KEY: &str = "code_verifier";
const REDIRECT_URI_KEY: &str = "redirect_uri";
const TOKEN_KEY: &str = "token";
const MFA_TOKEN_KEY: &str = "mfa_token";
const ONE_TIME_PASSWORD_KEY: &str = "otp";
const SUBJECT_TOKEN_KEY: &str = "subject_token";
const SUBJECT_TOKEN_TYPE_KEY: &str = "subject_token_type";

const TOKEN_PATH: &str = "oauth/token";
const REVOKE_PATH: &str = "oauth/revoke";
const SIGN_UP_PATH: &str = "dbconnections/signup";
const CHANGE_PASSWORD_PATH: &str = "dbconnections/change_password";
const PASSWORDLESS_START_PATH: &str = "passwordless/start";
const USER_INFO_PATH: &str = "userinfo";
const JWKS_PATH: &str = ".well-known/jwks.json";

/// Client for the authentication API of one account.
///
/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct AuthenticationApiClient {
    config: Arc<AccountConfig>,
    transport: Arc<dyn HttpTransport>,
}

impl AuthenticationApiClient {
    /// Create a client backed by the reqwest transport.
    pub fn new(config: AccountConfig) -> AuthResult<Self> {
        let transport = Arc::new(ReqwestHttpTransport::from_config(&config)?);
        Ok(Self::with_transport(config, transport))
    }

    /// Create a client with a custom transport.
    pub fn with_transport(config: AccountConfig, transport: Arc<dyn HttpTransport>) -> Self {
        debug!(base_url = %config.base_url, "Authentication API client created");
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    pub fn client_id(&self) -> &str {
        &self.config.client_id
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn config(&self) -> &AccountConfig {
        &self.config
    }

    // ========== Token endpoint ==========

    /// Log in with username or email and password against a database
    /// connection (`realm`).
    ///
    /// Requires the password-realm grant to be enabled for the application.
    pub fn login(
        &self,
        username_or_email: &str,
        password: &str,
        realm: &str,
    ) -> AuthenticationRequest {
        let parameters = ParameterBuilder::new()
            .set(USERNAME_KEY, username_or_email)
            .set(PASSWORD_KEY, password)
            .set_grant_type(GrantType::PasswordRealm)
            .set_realm(realm)
            .build();
        self.authentication_request(parameters)
    }

    /// Log in against the tenant's default directory.
    pub fn login_with_password(&self, username_or_email: &str, password: &str) -> AuthenticationRequest {
        let parameters = ParameterBuilder::new()
            .set(USERNAME_KEY, username_or_email)
            .set(PASSWORD_KEY, password)
            .set_grant_type(GrantType::Password)
            .build();
        self.authentication_request(parameters)
    }

    /// Complete a login that failed with `mfa_required`, using the
    /// error's `mfa_token` and the one-time password.
    pub fn login_with_otp(&self, mfa_token: &str, otp: &str) -> AuthenticationRequest {
        let parameters = ParameterBuilder::new()
            .set_grant_type(GrantType::MfaOtp)
            .set(MFA_TOKEN_KEY, mfa_token)
            .set(ONE_TIME_PASSWORD_KEY, otp)
            .build();
        self.authentication_request(parameters)
    }

    /// Exchange a token issued by a native social provider.
    pub fn login_with_native_social_token(&self, token: &str, token_type: &str) -> AuthenticationRequest {
        let parameters = ParameterBuilder::new_authentication_builder()
            .set_grant_type(GrantType::TokenExchange)
            .set(SUBJECT_TOKEN_KEY, token)
            .set(SUBJECT_TOKEN_TYPE_KEY, token_type)
            .build();
        self.authentication_request(parameters)
    }

    /// Log in with the code received by email. `realm` defaults to `email`.
    pub fn login_with_email(
        &self,
        email: &str,
        verification_code: &str,
        realm: Option<&str>,
    ) -> AuthenticationRequest {
        self.passwordless_login(email, verification_code, realm.unwrap_or(EMAIL_CONNECTION))
    }

    /// Log in with the code received by SMS. `realm` defaults to `sms`.
    pub fn login_with_phone_number(
        &self,
        phone_number: &str,
        verification_code: &str,
        realm: Option<&str>,
    ) -> AuthenticationRequest {
        self.passwordless_login(phone_number, verification_code, realm.unwrap_or(SMS_CONNECTION))
    }

    fn passwordless_login(&self, username: &str, code: &str, realm: &str) -> AuthenticationRequest {
        let parameters = ParameterBuilder::new_authentication_builder()
            .set(USERNAME_KEY, username)
            .set_grant_type(GrantType::PasswordlessOtp)
            .set(ONE_TIME_PASSWORD_KEY, code)
            .set_realm(realm)
            .build();
        self.authentication_request(parameters)
    }

    /// Obtain new credentials with a refresh token.
    pub fn renew_auth(&self, refresh_token: &str) -> Request<Credentials> {
        let parameters = ParameterBuilder::new()
            .set_client_id(self.client_id())
            .set_refresh_token(refresh_token)
            .set_grant_type(GrantType::RefreshToken)
            .build();
        self.post(TOKEN_PATH, decode_json::<Credentials>)
            .add_parameters(parameters)
    }

    /// Exchange an authorization code obtained with PKCE.
    pub fn token(
        &self,
        authorization_code: &str,
        code_verifier: &str,
        redirect_uri: &str,
    ) -> Request<Credentials> {
        let parameters = ParameterBuilder::new()
            .set_client_id(self.client_id())
            .set_grant_type(GrantType::AuthorizationCode)
            .set(OAUTH_CODE_KEY, authorization_code)
            .set(REDIRECT_URI_KEY, redirect_uri)
            .set(CODE_VERIFIER_KEY, code_verifier)
            .build();
        self.post(TOKEN_PATH, decode_json::<Credentials>)
            .add_parameters(parameters)
    }

    /// [`token`](Self::token) taking the verifier from a [`Pkce`] pair.
    pub fn token_with_pkce(
        &self,
        authorization_code: &str,
        pkce: &Pkce,
        redirect_uri: &str,
    ) -> Request<Credentials> {
        self.token(authorization_code, pkce.code_verifier(), redirect_uri)
    }

    // ========== Database connections ==========

    /// Create a user in a database connection. `username` is only sent when
    /// given.
    pub fn create_user(
        &self,
        email: &str,
        password: &str,
        username: Option<&str>,
        connection: &str,
    ) -> Request<DatabaseUser> {
        let parameters = ParameterBuilder::new()
            .set(USERNAME_KEY, username)
            .set(EMAIL_KEY, email)
            .set(PASSWORD_KEY, password)
            .set_connection(connection)
            .set_client_id(self.client_id())
            .build();
        self.post(SIGN_UP_PATH, decode_json::<DatabaseUser>)
            .add_parameters(parameters)
    }

    /// Create a user, then log in with the same email and password.
    pub fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: Option<&str>,
        connection: &str,
    ) -> SignUpRequest {
        let create_user = self.create_user(email, password, username, connection);
        let authentication = self.login(email, password, connection);
        SignUpRequest::new(create_user, authentication)
    }

    /// Ask the server to send a change-password email.
    pub fn reset_password(&self, email: &str, connection: &str) -> Request<()> {
        let parameters = ParameterBuilder::new()
            .set(EMAIL_KEY, email)
            .set_client_id(self.client_id())
            .set_connection(connection)
            .build();
        self.post(CHANGE_PASSWORD_PATH, discard_body)
            .add_parameters(parameters)
    }

    /// Revoke a refresh token.
    pub fn revoke_token(&self, refresh_token: &str) -> Request<()> {
        let parameters = ParameterBuilder::new()
            .set_client_id(self.client_id())
            .set(TOKEN_KEY, refresh_token)
            .build();
        self.post(REVOKE_PATH, discard_body)
            .add_parameters(parameters)
    }

    // ========== Passwordless ==========

    /// Start a passwordless flow by email. `connection` defaults to `email`.
    pub fn passwordless_with_email(
        &self,
        email: &str,
        passwordless_type: PasswordlessType,
        connection: Option<&str>,
    ) -> Request<()> {
        let parameters = ParameterBuilder::new()
            .set(EMAIL_KEY, email)
            .set_send(passwordless_type)
            .set_connection(connection.unwrap_or(EMAIL_CONNECTION))
            .build();
        self.passwordless_start(parameters)
    }

    /// Start a passwordless flow by SMS. `connection` defaults to `sms`.
    pub fn passwordless_with_sms(
        &self,
        phone_number: &str,
        passwordless_type: PasswordlessType,
        connection: Option<&str>,
    ) -> Request<()> {
        let parameters = ParameterBuilder::new()
            .set(PHONE_NUMBER_KEY, phone_number)
            .set_send(passwordless_type)
            .set_connection(connection.unwrap_or(SMS_CONNECTION))
            .build();
        self.passwordless_start(parameters)
    }

    fn passwordless_start(&self, parameters: ParameterSet) -> Request<()> {
        let parameters = ParameterBuilder::from_parameters(parameters)
            .set_client_id(self.client_id())
            .build();
        self.post(PASSWORDLESS_START_PATH, discard_body)
            .add_parameters(parameters)
    }

    // ========== Profile ==========

    /// Fetch the profile of the user owning `access_token`.
    pub fn user_info(&self, access_token: &str) -> Request<UserProfile> {
        self.profile_request()
            .add_header(AUTHORIZATION_HEADER, format!("Bearer {}", access_token))
    }

    /// Run `authentication_request`, then fetch the profile with the access
    /// token it produced.
    pub fn get_profile_after(&self, authentication_request: AuthenticationRequest) -> ProfileRequest {
        ProfileRequest::new(authentication_request, self.profile_request())
    }

    /// Fetch the tenant's public signing keys.
    pub fn fetch_json_web_keys(&self) -> Request<JsonWebKeySet> {
        self.with_default_headers(Request::get(
            self.transport.clone(),
            self.config.endpoint(JWKS_PATH),
            decode_json::<JsonWebKeySet>,
        ))
    }

    // ========== Internal ==========

    fn authentication_request(&self, parameters: ParameterSet) -> AuthenticationRequest {
        let parameters = ParameterBuilder::from_parameters(parameters)
            .set_client_id(self.client_id())
            .build();
        AuthenticationRequest::new(self.post(TOKEN_PATH, decode_json::<Credentials>))
            .add_authentication_parameters(parameters)
    }

    fn profile_request(&self) -> Request<UserProfile> {
        self.with_default_headers(Request::get(
            self.transport.clone(),
            self.config.endpoint(USER_INFO_PATH),
            decode_json::<UserProfile>,
        ))
    }

    fn post<T: Send + 'static>(&self, path: &str, decoder: ResponseDecoder<T>) -> Request<T> {
        self.with_default_headers(Request::post(
            self.transport.clone(),
            self.config.endpoint(path),
            decoder,
        ))
    }

    fn with_default_headers<T: Send + 'static>(&self, request: Request<T>) -> Request<T> {
        self.config
            .default_headers
            .iter()
            .fold(request, |request, (name, value)| {
                request.add_header(name.clone(), value.clone())
            })
    }
}

impl std::fmt::Debug for AuthenticationApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationApiClient")
            .field("client_id", &self.config.client_id)
            .field("base_url", &self.config.base_url)
            .finish()
    }
}
