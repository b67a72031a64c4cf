//! Ride request deeplinks for Uber-compatible rides apps.
//!
//! Provides a builder that accumulates pickup, dropoff and product parameters and
//! serializes them into an `uber://` deeplink, plus the platform boundary used to
//! open it or fall back to the web sign-up page.

#![deny(missing_docs)]

pub mod builder;
pub mod platform;
pub mod request;

pub use builder::{DeeplinkBuilder, InvocationSource};
pub use platform::{NoopUrlOpener, UrlOpener};
pub use request::{Location, RideParameters};

/// Convenient result alias that reuses the shared core error type.
pub type Result<T> = rides_core::Result<T>;
