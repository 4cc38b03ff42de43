//! Builders
//!
//! Fluent builder for the account configuration.

pub mod config;

pub use config::{account_config, AccountConfigBuilder};
