//! Configuration provider capability
//!
//! The `ConfigProvider` trait is the abstract get/put contract the rest of
//! a system depends on, independent of the backing store. Providers work on
//! untyped JSON values so the trait stays object safe; `ConfigProviderExt`
//! layers the typed decode-into-destination API on top of any provider.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, Result, ServiceContext};

/// Configuration provider trait
///
/// Implementations:
/// - `MemoryConfigProvider`: in-process map (tests, local wiring)
/// - `ConsulConfigProvider`: Consul KV over HTTP (`kvconf-consul`)
///
/// # Example
/// ```no_run
/// # use kvconf_core::{ConfigProvider, ConfigProviderExt, ServiceContext};
/// # #[derive(serde::Deserialize, Default)]
/// # struct AppConfig { timeout: u32 }
/// # async fn example(provider: &dyn ConfigProvider, ctx: &ServiceContext) -> kvconf_core::Result<()> {
/// let mut config = AppConfig::default();
/// if provider.get_config(ctx, "svc/cfg", &mut config).await? {
///     println!("timeout = {}", config.timeout);
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    /// Get the configuration stored under `name`
    ///
    /// # Arguments
    /// * `ctx` - Context produced by starting the provider's service
    /// * `name` - Configuration name (key path)
    ///
    /// # Returns
    /// `Ok(None)` when nothing is stored under `name`.
    ///
    /// # Errors
    /// - `Error::ServiceNotStarted` if `ctx` lacks the provider's service
    /// - `Error::Validation` if `name` is empty
    /// - `Error::Transport` / `Error::UnexpectedStatus` for backend failures
    /// - `Error::Serialization` if the stored payload is not valid JSON
    async fn get_config_value(
        &self,
        ctx: &ServiceContext,
        name: &str,
    ) -> Result<Option<serde_json::Value>>;

    /// Store `config` under `name`
    ///
    /// # Errors
    /// - `Error::ServiceNotStarted` if `ctx` lacks the provider's service
    /// - `Error::Validation` if `name` is empty or `config` is null
    /// - `Error::Transport` for backend failures
    async fn put_config_value(
        &self,
        ctx: &ServiceContext,
        name: &str,
        config: serde_json::Value,
    ) -> Result<()>;
}

/// Typed access to any `ConfigProvider`
#[async_trait]
pub trait ConfigProviderExt: ConfigProvider {
    /// Decode the configuration stored under `name` into `config`
    ///
    /// Returns `Ok(false)` and leaves `config` untouched when nothing is
    /// stored under `name`.
    async fn get_config<T>(
        &self,
        ctx: &ServiceContext,
        name: &str,
        config: &mut T,
    ) -> Result<bool>
    where
        T: DeserializeOwned + Send,
    {
        match self.get_config_value(ctx, name).await? {
            Some(value) => {
                *config = serde_json::from_value(value)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Encode `config` and store it under `name`
    ///
    /// A value that serializes to JSON `null` is rejected before the
    /// provider is called.
    async fn put_config<T>(&self, ctx: &ServiceContext, name: &str, config: &T) -> Result<()>
    where
        T: Serialize + Sync + ?Sized,
    {
        let value = serde_json::to_value(config)?;
        ensure_present(&value)?;
        self.put_config_value(ctx, name, value).await
    }
}

impl<P: ConfigProvider + ?Sized> ConfigProviderExt for P {}

/// Reject a null configuration value
pub fn ensure_present(config: &serde_json::Value) -> Result<()> {
    if config.is_null() {
        return Err(Error::Validation("config must not be nil".to_string()));
    }
    Ok(())
}

/// Reject an empty configuration name
pub fn ensure_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::Validation("config name can't be empty".to_string()));
    }
    Ok(())
}
