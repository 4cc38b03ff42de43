//! Authentication Request
//!
//! Token endpoint request. Grant-specific parameters can be merged in from
//! several call sites before it fires.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

use crate::core::parameters::{
    ParameterBuilder, ParameterSet, AUDIENCE_KEY, CONNECTION_KEY, REALM_KEY, SCOPE_KEY,
};
use crate::core::{Execute, Request};
use crate::error::{AuthResult, RequestError};
use crate::types::{Credentials, GrantType};

/// Request to `oauth/token` resolving to [`Credentials`].
#[derive(Debug)]
pub struct AuthenticationRequest {
    request: Request<Credentials>,
}

impl AuthenticationRequest {
    /// Wrap a token endpoint request.
    pub fn new(request: Request<Credentials>) -> Self {
        Self { request }
    }

    /// Merge grant-specific parameters. May be called any number of times;
    /// the last write of a key wins.
    pub fn add_authentication_parameters(mut self, parameters: ParameterSet) -> Self {
        self.request = self.request.add_parameters(parameters);
        self
    }

    pub fn add_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.request = self.request.add_parameter(key, value);
        self
    }

    pub fn add_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request = self.request.add_header(name, value);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.request = self.request.timeout(timeout);
        self
    }

    pub fn set_grant_type(self, grant_type: GrantType) -> Self {
        let parameters = ParameterBuilder::new().set_grant_type(grant_type).build();
        self.add_authentication_parameters(parameters)
    }

    pub fn set_scope(self, scope: impl Into<String>) -> Self {
        self.add_parameter(SCOPE_KEY, scope.into())
    }

    pub fn set_audience(self, audience: impl Into<String>) -> Self {
        self.add_parameter(AUDIENCE_KEY, audience.into())
    }

    pub fn set_realm(self, realm: impl Into<String>) -> Self {
        self.add_parameter(REALM_KEY, realm.into())
    }

    pub fn set_connection(self, connection: impl Into<String>) -> Self {
        self.add_parameter(CONNECTION_KEY, connection.into())
    }

    pub fn parameters(&self) -> &ParameterSet {
        self.request.parameters()
    }

    pub fn url(&self) -> &str {
        self.request.url()
    }

    /// Every field the configured grant type needs must be present.
    fn validate(&self) -> AuthResult<()> {
        let Some(grant_type) = self.parameters().grant_type() else {
            return Ok(());
        };

        if let Some(field) = grant_type
            .required_parameters()
            .iter()
            .find(|field| !self.parameters().contains_key(field))
        {
            warn!(grant_type = %grant_type, field = *field, "Token request is missing a required parameter");
            return Err(RequestError::MissingParameter {
                grant_type: grant_type.to_string(),
                field: field.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

#[async_trait]
impl Execute for AuthenticationRequest {
    type Output = Credentials;

    async fn execute(self) -> AuthResult<Credentials> {
        self.validate()?;
        self.request.execute().await
    }
}
