//! Authentication Flows
//!
//! Token endpoint request and the composite requests built on the chain
//! combinator.

pub mod authentication;
pub mod profile;
pub mod sign_up;

pub use authentication::AuthenticationRequest;
pub use profile::{ProfileRequest, AUTHORIZATION_HEADER};
pub use sign_up::SignUpRequest;
