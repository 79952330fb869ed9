//! Token launchpad backend
//!
//! Accepts an image plus token parameters, pins both to content-addressed
//! storage and answers with a partially-signed transaction that creates and
//! mints the token once the creator's wallet signs it.

pub mod adapters;
pub mod api;
pub mod config;
pub mod core;

pub use config::ServerConfig;
