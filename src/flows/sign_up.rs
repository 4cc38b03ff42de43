//! Sign-Up Request
//!
//! Creates a database user, then logs in with the same credentials.

use async_trait::async_trait;
use tracing::debug;

use super::authentication::AuthenticationRequest;
use crate::core::parameters::{ParameterSet, CONNECTION_KEY};
use crate::core::{Execute, Request};
use crate::error::AuthResult;
use crate::types::{Credentials, DatabaseUser};

/// Create-then-login composite resolving to the login's [`Credentials`].
///
/// The login only starts after the user was created. If the login fails,
/// the created user is kept: the failure is returned as-is and no attempt
/// is made to delete the account.
#[derive(Debug)]
pub struct SignUpRequest {
    sign_up: Request<DatabaseUser>,
    authentication: AuthenticationRequest,
}

impl SignUpRequest {
    pub fn new(sign_up: Request<DatabaseUser>, authentication: AuthenticationRequest) -> Self {
        Self {
            sign_up,
            authentication,
        }
    }

    /// Extra fields for the create-user call (e.g. `user_metadata`).
    pub fn add_sign_up_parameters(mut self, parameters: ParameterSet) -> Self {
        self.sign_up = self.sign_up.add_parameters(parameters);
        self
    }

    /// Extra fields for the login call.
    pub fn add_authentication_parameters(mut self, parameters: ParameterSet) -> Self {
        self.authentication = self.authentication.add_authentication_parameters(parameters);
        self
    }

    /// Header sent with both calls.
    pub fn add_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let (name, value) = (name.into(), value.into());
        self.sign_up = self.sign_up.add_header(name.clone(), value.clone());
        self.authentication = self.authentication.add_header(name, value);
        self
    }

    pub fn set_scope(mut self, scope: impl Into<String>) -> Self {
        self.authentication = self.authentication.set_scope(scope);
        self
    }

    pub fn set_audience(mut self, audience: impl Into<String>) -> Self {
        self.authentication = self.authentication.set_audience(audience);
        self
    }

    /// Database connection for the user, used as realm for the login.
    pub fn set_connection(mut self, connection: impl Into<String>) -> Self {
        let connection = connection.into();
        self.sign_up = self.sign_up.add_parameter(CONNECTION_KEY, connection.clone());
        self.authentication = self.authentication.set_realm(connection);
        self
    }
}

#[async_trait]
impl Execute for SignUpRequest {
    type Output = Credentials;

    async fn execute(self) -> AuthResult<Credentials> {
        let authentication = self.authentication;
        self.sign_up
            .and_then(move |user: DatabaseUser| {
                debug!(email_verified = user.email_verified, "Database user created, logging in");
                authentication
            })
            .execute()
            .await
    }
}
