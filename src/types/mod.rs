//! Authentication Types
//!
//! Configuration, wire enumerations and decoded response payloads.

pub mod config;
pub mod credentials;
pub mod grant;
pub mod jwks;
pub mod profile;

pub use config::*;
pub use credentials::*;
pub use grant::*;
pub use jwks::*;
pub use profile::*;
