//! Profile Request
//!
//! Logs in, then fetches the user's profile with the new access token.

use async_trait::async_trait;
use std::time::Duration;

use super::authentication::AuthenticationRequest;
use crate::core::parameters::ParameterSet;
use crate::core::{Execute, Request};
use crate::error::AuthResult;
use crate::types::{Authentication, Credentials, UserProfile};

pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Login-then-userinfo composite resolving to [`Authentication`].
///
/// Configuration methods apply to the login; the profile call only gets the
/// bearer header derived from the login's access token.
#[derive(Debug)]
pub struct ProfileRequest {
    authentication: AuthenticationRequest,
    user_info: Request<UserProfile>,
}

impl ProfileRequest {
    pub fn new(authentication: AuthenticationRequest, user_info: Request<UserProfile>) -> Self {
        Self {
            authentication,
            user_info,
        }
    }

    pub fn add_parameters(mut self, parameters: ParameterSet) -> Self {
        self.authentication = self.authentication.add_authentication_parameters(parameters);
        self
    }

    pub fn add_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
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

    /// Timeout applied to both calls.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.authentication = self.authentication.timeout(timeout);
        self.user_info = self.user_info.timeout(timeout);
        self
    }
}

#[async_trait]
impl Execute for ProfileRequest {
    type Output = Authentication;

    async fn execute(self) -> AuthResult<Authentication> {
        let user_info = self.user_info;
        self.authentication
            .and_then(move |credentials: Credentials| {
                user_info
                    .add_header(AUTHORIZATION_HEADER, credentials.authorization_header())
                    .map(move |profile| Authentication {
                        profile,
                        credentials,
                    })
            })
            .execute()
            .await
    }
}
