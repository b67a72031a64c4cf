//! # rides-core
//!
//! Core types and utilities for building ride request deeplinks.
//!
//! This crate provides the shared error type, client configuration, and the encoded
//! query parameter store that the deeplink builder serializes.
//!
//! ## Modules
//!
//! - [`error`] - Error types and stable error codes
//! - [`types`] - Query parameter names and their wire-format keys
//! - [`config`] - Client identity and web fallback configuration
//! - [`query`] - Parameter storage and percent-encoding

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod query;
pub mod types;

// Re-export commonly used types
pub use config::RidesConfig;
pub use error::{Error, Result};
pub use query::ParameterStore;
pub use types::QueryParameterName;
