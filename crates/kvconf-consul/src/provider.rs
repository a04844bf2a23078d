//! `ConfigProvider` implementation backed by Consul KV

use async_trait::async_trait;

use kvconf_core::{ConfigProvider, Result, ServiceContext};

use crate::service::ConsulService;

/// The config capability served by a started [`ConsulService`]
///
/// Stateless: every call recovers the client from the context it is given.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsulConfigProvider;

#[async_trait]
impl ConfigProvider for ConsulConfigProvider {
    async fn get_config_value(
        &self,
        ctx: &ServiceContext,
        name: &str,
    ) -> Result<Option<serde_json::Value>> {
        ConsulService::lookup(ctx)?.get_config(name).await
    }

    async fn put_config_value(
        &self,
        ctx: &ServiceContext,
        name: &str,
        config: serde_json::Value,
    ) -> Result<()> {
        ConsulService::lookup(ctx)?
            .put_config_value(name, &config)
            .await
    }
}
