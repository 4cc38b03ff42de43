//! Core Components
//!
//! Transport, parameters, requests and the execution model shared by every
//! flow.

pub mod chain;
pub mod parameters;
pub mod pkce;
pub mod request;
pub mod transport;

pub use chain::{AndThen, Execute, Map, RequestHandle};
pub use parameters::{ParameterBuilder, ParameterSet};
pub use pkce::Pkce;
pub use request::{
    decode_api_error, decode_json, discard_body, ErrorDecoder, Request, ResponseDecoder,
};
pub use transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MockHttpTransport,
    ReqwestHttpTransport,
};
