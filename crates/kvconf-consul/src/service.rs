//! Consul service descriptor and lifecycle

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use kvconf_core::{Error, Result, Service, ServiceContext};

use crate::client::ConsulClient;

pub const DEFAULT_CONSUL_HOST: &str = "127.0.0.1";
pub const DEFAULT_CONSUL_PORT: u16 = 8500;

/// Connection parameters of the Consul agent
///
/// Deserializes from a config section with both fields defaulted:
///
/// ```toml
/// [consul]
/// host = "consul.service.internal"
/// port = 8500
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConsulService {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Context key under which a started service publishes its client
struct ConsulHandle(Arc<ConsulClient>);

impl ConsulService {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Check the connection parameters
    ///
    /// # Errors
    /// - `Error::Validation` if the host is empty or the port is zero
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(Error::Validation("host can't be empty".to_string()));
        }
        if self.port == 0 {
            return Err(Error::Validation(format!(
                "passed port is invalid: {}",
                self.port
            )));
        }
        Ok(())
    }

    /// Recover the client published by `start`
    ///
    /// # Errors
    /// - `Error::ServiceNotStarted` if `ctx` was not derived from a started
    ///   `ConsulService`
    pub fn lookup(ctx: &ServiceContext) -> Result<Arc<ConsulClient>> {
        ctx.value::<ConsulHandle>()
            .map(|handle| handle.0.clone())
            .ok_or_else(|| {
                Error::ServiceNotStarted(
                    "context carries no Consul service, pass the context returned by start"
                        .to_string(),
                )
            })
    }
}

impl Default for ConsulService {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[async_trait]
impl Service for ConsulService {
    fn name(&self) -> &str {
        "consul"
    }

    async fn start(&self, ctx: &ServiceContext) -> Result<ServiceContext> {
        let client = ConsulClient::new(self.clone())?;
        info!("Consul config provider bound to {}:{}", self.host, self.port);
        Ok(ctx.with_value(ConsulHandle(Arc::new(client))))
    }

    async fn stop(&self, _ctx: &ServiceContext) {
        // The client holds no connection that outlives a request
        debug!("Consul config provider stopped");
    }
}

fn default_host() -> String {
    DEFAULT_CONSUL_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_CONSUL_PORT
}
