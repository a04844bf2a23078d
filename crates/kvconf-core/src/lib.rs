//! kvconf Core Types and Traits
//!
//! This crate provides the fundamental types and traits shared by every
//! configuration backend:
//! - The `ConfigProvider` capability contract
//! - The request-scoped `ServiceContext`
//! - The `Service` lifecycle trait and the explicit `Registry`
//! - Core error types

pub mod config_provider;
pub mod context;
pub mod error;
pub mod memory;
pub mod registry;
pub mod service;

#[cfg(any(test, feature = "test-support"))]
pub mod conformance;

pub use config_provider::{ConfigProvider, ConfigProviderExt};
pub use context::ServiceContext;
pub use error::{Error, Result};
pub use registry::Registry;
pub use service::Service;
