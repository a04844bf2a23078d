//! Consul KV configuration provider for kvconf
//!
//! This crate implements the `ConfigProvider` capability on top of the
//! Consul KV HTTP API. Each configuration name maps to one key whose value
//! is the JSON-encoded configuration.
//!
//! # Features
//! - `ConsulService` lifecycle participant with host/port validation
//! - `GET /v1/kv/{name}` decoding of the one-element KV entry list
//! - `PUT /v1/kv/{name}` with a JSON body
//! - Registration into a `kvconf_core::Registry`
//!
//! # Example
//! ```no_run
//! # use kvconf_consul::{ConsulService, declare};
//! # use kvconf_core::{ConfigProviderExt, Registry, ServiceContext};
//! # async fn example() -> kvconf_core::Result<()> {
//! let mut registry = Registry::new();
//! declare(&mut registry, ConsulService::default());
//! registry.require_config_provider();
//! registry.resolve()?;
//!
//! let ctx = registry.start(&ServiceContext::background()).await?;
//! let provider = registry.config_provider()?;
//! provider
//!     .put_config(&ctx, "svc/cfg", &serde_json::json!({"timeout": 30}))
//!     .await?;
//! registry.stop(&ctx).await;
//! # Ok(())
//! # }
//! ```

mod client;
mod codec;
mod declare;
mod entry;
mod provider;
mod service;

pub use client::ConsulClient;
pub use codec::{decode_body, encode_body};
pub use declare::declare;
pub use entry::KvEntry;
pub use provider::ConsulConfigProvider;
pub use service::{ConsulService, DEFAULT_CONSUL_HOST, DEFAULT_CONSUL_PORT};
