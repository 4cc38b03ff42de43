//! Request
//!
//! A single outbound API call: target, accumulated body and headers, and the
//! decoders that turn the response into a typed value or a typed error.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::chain::Execute;
use super::parameters::ParameterSet;
use super::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::error::{ApiError, AuthResult, AuthenticationError, ProtocolError};

/// Turns a successful (2xx) response into the success value.
pub type ResponseDecoder<T> = fn(&HttpResponse) -> AuthResult<T>;

/// Turns a non-2xx response into the error value.
pub type ErrorDecoder = fn(&HttpResponse) -> AuthenticationError;

/// Decode the body as JSON.
pub fn decode_json<T: DeserializeOwned>(response: &HttpResponse) -> AuthResult<T> {
    serde_json::from_str(&response.body).map_err(|e| {
        warn!(status = response.status, error = %e, "Response body did not match the expected shape");
        ProtocolError::InvalidJson {
            message: e.to_string(),
            body: response.body.clone(),
        }
        .into()
    })
}

/// Ignore the body. Used by endpoints whose success carries no payload.
pub fn discard_body(_response: &HttpResponse) -> AuthResult<()> {
    Ok(())
}

/// Decode the body as an [`ApiError`].
pub fn decode_api_error(response: &HttpResponse) -> AuthenticationError {
    ApiError::from_response(response.status, &response.body).into()
}

/// An unstarted API call resolving to `T`.
///
/// Configuration methods consume and return the request. Executing it
/// consumes it too, so a request fires at most once and cannot be changed
/// once started:
///
/// ```compile_fail
/// # use auth_api_integration::{Execute, Request};
/// # async fn twice(request: Request<()>) {
/// let _ = request.execute().await;
/// let _ = request.execute().await;
/// # }
/// ```
pub struct Request<T> {
    transport: Arc<dyn HttpTransport>,
    method: HttpMethod,
    url: String,
    parameters: ParameterSet,
    headers: HashMap<String, String>,
    timeout: Option<Duration>,
    decoder: ResponseDecoder<T>,
    error_decoder: ErrorDecoder,
}

impl<T: Send + 'static> Request<T> {
    /// Create a request with the default error decoder.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        method: HttpMethod,
        url: impl Into<String>,
        decoder: ResponseDecoder<T>,
    ) -> Self {
        Self {
            transport,
            method,
            url: url.into(),
            parameters: ParameterSet::new(),
            headers: HashMap::new(),
            timeout: None,
            decoder,
            error_decoder: decode_api_error,
        }
    }

    /// POST request.
    pub fn post(
        transport: Arc<dyn HttpTransport>,
        url: impl Into<String>,
        decoder: ResponseDecoder<T>,
    ) -> Self {
        Self::new(transport, HttpMethod::Post, url, decoder)
    }

    /// GET request.
    pub fn get(
        transport: Arc<dyn HttpTransport>,
        url: impl Into<String>,
        decoder: ResponseDecoder<T>,
    ) -> Self {
        Self::new(transport, HttpMethod::Get, url, decoder)
    }

    /// Replace the error decoder.
    pub fn with_error_decoder(mut self, error_decoder: ErrorDecoder) -> Self {
        self.error_decoder = error_decoder;
        self
    }

    /// Add one body parameter. `null` removes the key.
    pub fn add_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key, value);
        self
    }

    /// Merge parameters into the body, overwriting on collision.
    pub fn add_parameters(mut self, parameters: ParameterSet) -> Self {
        self.parameters.merge(parameters);
        self
    }

    /// Add a header, replacing any previous value under the same name in
    /// any letter case.
    pub fn add_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Override the transport timeout for this call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    /// Header names are stored lowercase.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Header value, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    fn to_http_request(&self) -> HttpRequest {
        let mut headers = self.headers.clone();
        headers
            .entry("accept".to_string())
            .or_insert_with(|| "application/json".to_string());

        let (url, body) = match self.method {
            HttpMethod::Post => {
                headers
                    .entry("content-type".to_string())
                    .or_insert_with(|| "application/json".to_string());
                (self.url.clone(), Some(self.parameters.to_json().to_string()))
            }
            HttpMethod::Get if self.parameters.is_empty() => (self.url.clone(), None),
            HttpMethod::Get => {
                let mut query = url::form_urlencoded::Serializer::new(String::new());
                for (key, value) in self.parameters.iter() {
                    match value {
                        Value::String(s) => query.append_pair(key, s),
                        other => query.append_pair(key, &other.to_string()),
                    };
                }
                let separator = if self.url.contains('?') { '&' } else { '?' };
                (format!("{}{}{}", self.url, separator, query.finish()), None)
            }
        };

        HttpRequest {
            method: self.method,
            url,
            headers,
            body,
            timeout: self.timeout,
        }
    }
}

#[async_trait]
impl<T: Send + 'static> Execute for Request<T> {
    type Output = T;

    async fn execute(self) -> AuthResult<T> {
        let http_request = self.to_http_request();
        debug!(
            method = self.method.as_str(),
            url = %self.url,
            parameters = ?self.parameters.keys().collect::<Vec<_>>(),
            "Sending request"
        );

        let response = self.transport.send(http_request).await?;
        debug!(status = response.status, url = %self.url, "Response received");

        if response.is_success() {
            (self.decoder)(&response)
        } else {
            Err((self.error_decoder)(&response))
        }
    }
}

impl<T> fmt::Debug for Request<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Values are left out: bodies carry passwords and tokens
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("parameters", &self.parameters.keys().collect::<Vec<_>>())
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field("timeout", &self.timeout)
            .finish()
    }
}
