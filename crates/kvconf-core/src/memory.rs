//! In-memory configuration provider

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use crate::config_provider::{ensure_name, ensure_present};
use crate::{ConfigProvider, Error, Result, ServiceContext};

/// A [`ConfigProvider`] that keeps configurations in a process-local map
///
/// It needs no service and ignores the context, which makes it a drop-in
/// stand-in for remote providers when wiring and testing callers.
#[derive(Debug, Default)]
pub struct MemoryConfigProvider {
    configs: Mutex<HashMap<String, serde_json::Value>>,
}

impl MemoryConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored configurations
    pub fn len(&self) -> usize {
        self.configs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ConfigProvider for MemoryConfigProvider {
    async fn get_config_value(
        &self,
        _ctx: &ServiceContext,
        name: &str,
    ) -> Result<Option<serde_json::Value>> {
        ensure_name(name)?;
        let configs = self
            .configs
            .lock()
            .map_err(|_| Error::Internal("config map lock poisoned".to_string()))?;
        Ok(configs.get(name).cloned())
    }

    async fn put_config_value(
        &self,
        _ctx: &ServiceContext,
        name: &str,
        config: serde_json::Value,
    ) -> Result<()> {
        ensure_name(name)?;
        ensure_present(&config)?;
        let mut configs = self
            .configs
            .lock()
            .map_err(|_| Error::Internal("config map lock poisoned".to_string()))?;
        configs.insert(name.to_string(), config);
        debug!("Stored config '{}' in memory", name);
        Ok(())
    }
}
