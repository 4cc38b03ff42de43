//! HTTP Transport
//!
//! HTTP client interface and implementations for authentication API requests.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, trace};

use crate::error::{AuthenticationError, ConfigurationError, NetworkError, ProtocolError};
use crate::types::AccountConfig;

/// HTTP request definition.
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Request URL.
    pub url: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Option<String>,
    /// Request timeout.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Parse the body as JSON, if any.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_str(body).ok())
    }

    /// Header lookup, case-insensitive on the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// HTTP method.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// HTTP response definition.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: String,
}

impl HttpResponse {
    /// Create a response with a status and body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Create a JSON response.
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        let mut response = Self::new(status, body.to_string());
        response
            .headers
            .insert("content-type".to_string(), "application/json".to_string());
        response
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP transport interface (for dependency injection).
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send an HTTP request.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, AuthenticationError>;
}

/// Default reqwest-based HTTP transport.
pub struct ReqwestHttpTransport {
    client: reqwest::Client,
    read_timeout: Duration,
    max_response_size: usize,
}

impl ReqwestHttpTransport {
    /// Create transport from the account configuration.
    pub fn from_config(config: &AccountConfig) -> Result<Self, AuthenticationError> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.read_timeout)
            .redirect(reqwest::redirect::Policy::none());

        if config.enforce_tls12 {
            builder = builder.min_tls_version(reqwest::tls::Version::TLS_1_2);
        }

        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }

        let client = builder.build().map_err(|e| {
            AuthenticationError::Configuration(ConfigurationError::HttpClient {
                message: e.to_string(),
            })
        })?;

        Ok(Self {
            client,
            read_timeout: config.read_timeout,
            max_response_size: config.max_response_size,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestHttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, AuthenticationError> {
        let timeout = request.timeout.unwrap_or(self.read_timeout);

        let mut req_builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }

        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        req_builder = req_builder.timeout(timeout);

        let response = req_builder.send().await.map_err(|e| {
            debug!(url = %request.url, error = %e, "Transport failure");
            if e.is_timeout() {
                NetworkError::Timeout { timeout }
            } else if e.is_connect() || e.is_request() {
                NetworkError::ConnectionFailed {
                    message: e.to_string(),
                }
            } else {
                NetworkError::SendFailed {
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();

        // Redirects are not followed; a 3xx reaches the error decoder like
        // any other non-2xx status
        let mut headers = HashMap::new();
        for (key, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(key.to_string().to_lowercase(), v.to_string());
            }
        }

        if let Some(len) = response.content_length() {
            if len as usize > self.max_response_size {
                return Err(ProtocolError::ResponseTooLarge { size: len as usize }.into());
            }
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                NetworkError::Timeout { timeout }
            } else {
                NetworkError::ConnectionFailed {
                    message: e.to_string(),
                }
            }
        })?;

        if body.len() > self.max_response_size {
            return Err(ProtocolError::ResponseTooLarge { size: body.len() }.into());
        }

        trace!(status, bytes = body.len(), "Response received");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Mock HTTP transport for testing.
///
/// Responses are returned in the order they were queued. Every request is
/// recorded, including those answered with a queued network failure.
#[derive(Default)]
pub struct MockHttpTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, NetworkError>>>,
    request_history: Mutex<Vec<HttpRequest>>,
    default_response: Mutex<Option<HttpResponse>>,
}

impl MockHttpTransport {
    /// Create new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response to return.
    pub fn queue_response(&self, response: HttpResponse) -> &Self {
        self.responses.lock().unwrap().push_back(Ok(response));
        self
    }

    /// Queue a JSON response.
    pub fn queue_json_response(&self, status: u16, body: serde_json::Value) -> &Self {
        self.queue_response(HttpResponse::json(status, &body))
    }

    /// Queue a transport failure (no response received).
    pub fn queue_network_error(&self, error: NetworkError) -> &Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    /// Set default response when queue is empty.
    pub fn set_default_response(&self, response: HttpResponse) -> &Self {
        *self.default_response.lock().unwrap() = Some(response);
        self
    }

    /// Get request history.
    pub fn get_requests(&self) -> Vec<HttpRequest> {
        self.request_history.lock().unwrap().clone()
    }

    /// Get last request.
    pub fn get_last_request(&self) -> Option<HttpRequest> {
        self.request_history.lock().unwrap().last().cloned()
    }

    /// Number of requests sent so far.
    pub fn call_count(&self) -> usize {
        self.request_history.lock().unwrap().len()
    }

    /// Number of requests whose URL ends with the given path.
    pub fn calls_to(&self, path: &str) -> usize {
        self.request_history
            .lock()
            .unwrap()
            .iter()
            .filter(|request| request.url.ends_with(path))
            .count()
    }

    /// Clear request history.
    pub fn clear_history(&self) {
        self.request_history.lock().unwrap().clear();
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, AuthenticationError> {
        self.request_history.lock().unwrap().push(request);

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(error)) => Err(error.into()),
            None => self.default_response.lock().unwrap().clone().ok_or_else(|| {
                NetworkError::ConnectionFailed {
                    message: "No mock response available".to_string(),
                }
                .into()
            }),
        }
    }
}
