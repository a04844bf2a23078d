//! Explicit service and capability registry
//!
//! The registry is built once at process wiring time. Backends declare
//! their services and capability implementations into it, consumers declare
//! what they require, and `resolve` checks that every requirement has
//! exactly one provider before anything is started.

use std::sync::Arc;

use tracing::{debug, info};

use crate::{ConfigProvider, Error, Result, Service, ServiceContext};

/// Registry of lifecycle services and capability providers
///
/// # Example
/// ```no_run
/// # use kvconf_core::{ConfigProvider, Registry, ServiceContext};
/// # async fn example(mut registry: Registry) -> kvconf_core::Result<()> {
/// registry.require_config_provider();
/// registry.resolve()?;
///
/// let ctx = registry.start(&ServiceContext::background()).await?;
/// let provider = registry.config_provider()?;
/// let exists = provider.get_config_value(&ctx, "svc/cfg").await?.is_some();
/// registry.stop(&ctx).await;
/// # let _ = exists;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct Registry {
    services: Vec<Arc<dyn Service>>,
    config_providers: Vec<Arc<dyn ConfigProvider>>,
    config_provider_required: bool,
    resolved: bool,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a lifecycle service
    ///
    /// Services are started in declaration order and stopped in reverse.
    pub fn provide_service(&mut self, service: Arc<dyn Service>) {
        debug!("Registered service '{}'", service.name());
        self.services.push(service);
        self.resolved = false;
    }

    /// Declare the implementation behind the config capability
    pub fn provide_config_provider(&mut self, provider: Arc<dyn ConfigProvider>) {
        self.config_providers.push(provider);
        self.resolved = false;
    }

    /// Declare that something in the process depends on the config capability
    pub fn require_config_provider(&mut self) {
        self.config_provider_required = true;
        self.resolved = false;
    }

    /// Check that every requirement has exactly one provider
    ///
    /// # Errors
    /// - `Error::Registry` if a required capability has no provider or a
    ///   capability has more than one
    pub fn resolve(&mut self) -> Result<()> {
        match self.config_providers.len() {
            0 if self.config_provider_required => {
                return Err(Error::Registry(
                    "no implementation provided for required config capability".to_string(),
                ));
            }
            0 | 1 => {}
            n => {
                return Err(Error::Registry(format!(
                    "config capability provided {} times, expected once",
                    n
                )));
            }
        }

        self.resolved = true;
        debug!(
            "Registry resolved: {} service(s), config provider: {}",
            self.services.len(),
            !self.config_providers.is_empty()
        );
        Ok(())
    }

    /// Get the resolved config capability
    ///
    /// # Errors
    /// - `Error::Registry` if the registry is unresolved or nothing provides
    ///   the capability
    pub fn config_provider(&self) -> Result<Arc<dyn ConfigProvider>> {
        self.ensure_resolved()?;
        self.config_providers.first().cloned().ok_or_else(|| {
            Error::Registry("no implementation provided for config capability".to_string())
        })
    }

    /// Number of declared services
    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    /// Start every declared service
    ///
    /// Each service receives the context derived by the one before it. If a
    /// service fails to start, the services already started are stopped in
    /// reverse order and the error is returned.
    pub async fn start(&self, ctx: &ServiceContext) -> Result<ServiceContext> {
        self.ensure_resolved()?;

        let mut current = ctx.clone();
        for (started, service) in self.services.iter().enumerate() {
            match service.start(&current).await {
                Ok(next) => {
                    info!("Started service '{}'", service.name());
                    current = next;
                }
                Err(e) => {
                    for service in self.services[..started].iter().rev() {
                        service.stop(&current).await;
                        info!("Stopped service '{}'", service.name());
                    }
                    return Err(e);
                }
            }
        }
        Ok(current)
    }

    /// Stop every declared service in reverse declaration order
    pub async fn stop(&self, ctx: &ServiceContext) {
        for service in self.services.iter().rev() {
            service.stop(ctx).await;
            info!("Stopped service '{}'", service.name());
        }
    }

    fn ensure_resolved(&self) -> Result<()> {
        if !self.resolved {
            return Err(Error::Registry(
                "registry must be resolved before use".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryConfigProvider;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Marker(&'static str);

    struct RecordingService {
        name: &'static str,
        fail: bool,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingService {
        fn new(name: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Arc<Self> {
            Arc::new(Self {
                name,
                fail: false,
                log: log.clone(),
            })
        }

        fn failing(name: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Arc<Self> {
            Arc::new(Self {
                name,
                fail: true,
                log: log.clone(),
            })
        }
    }

    #[async_trait]
    impl Service for RecordingService {
        fn name(&self) -> &str {
            self.name
        }

        async fn start(&self, ctx: &ServiceContext) -> Result<ServiceContext> {
            self.log.lock().unwrap().push(format!("start {}", self.name));
            if self.fail {
                return Err(Error::Validation(format!("{} refused to start", self.name)));
            }
            Ok(ctx.with_value(Marker(self.name)))
        }

        async fn stop(&self, _ctx: &ServiceContext) {
            self.log.lock().unwrap().push(format!("stop {}", self.name));
        }
    }

    #[test]
    fn test_resolve_missing_required_provider() {
        let mut registry = Registry::new();
        registry.require_config_provider();

        let result = registry.resolve();
        assert!(matches!(result, Err(Error::Registry(_))));
    }

    #[test]
    fn test_resolve_duplicate_provider() {
        let mut registry = Registry::new();
        registry.provide_config_provider(Arc::new(MemoryConfigProvider::new()));
        registry.provide_config_provider(Arc::new(MemoryConfigProvider::new()));

        let err = registry.resolve().unwrap_err();
        assert!(err.to_string().contains("2 times"));
    }

    #[test]
    fn test_config_provider_requires_resolve() {
        let mut registry = Registry::new();
        registry.provide_config_provider(Arc::new(MemoryConfigProvider::new()));
        assert!(registry.config_provider().is_err());

        registry.resolve().unwrap();
        assert!(registry.config_provider().is_ok());
    }

    #[test]
    fn test_unrequired_capability_may_be_absent() {
        let mut registry = Registry::new();
        registry.resolve().unwrap();
        assert!(registry.config_provider().is_err());
    }

    #[tokio::test]
    async fn test_start_threads_context_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = Registry::new();
        registry.provide_service(RecordingService::new("first", &log));
        registry.provide_service(RecordingService::new("second", &log));
        registry.resolve().unwrap();

        let base = ServiceContext::background();
        let ctx = registry.start(&base).await.unwrap();

        // Later services shadow the marker of earlier ones
        assert_eq!(ctx.value::<Marker>().map(|m| m.0), Some("second"));
        assert!(base.is_empty());

        registry.stop(&ctx).await;
        assert_eq!(
            *log.lock().unwrap(),
            vec!["start first", "start second", "stop second", "stop first"]
        );
    }

    #[tokio::test]
    async fn test_start_failure_stops_started_services() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = Registry::new();
        registry.provide_service(RecordingService::new("first", &log));
        registry.provide_service(RecordingService::new("second", &log));
        registry.provide_service(RecordingService::failing("third", &log));
        registry.resolve().unwrap();

        let result = registry.start(&ServiceContext::background()).await;
        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "start first",
                "start second",
                "start third",
                "stop second",
                "stop first"
            ]
        );
    }

    #[tokio::test]
    async fn test_start_requires_resolve() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = Registry::new();
        registry.provide_service(RecordingService::new("first", &log));

        let result = registry.start(&ServiceContext::background()).await;
        assert!(matches!(result, Err(Error::Registry(_))));
        assert!(log.lock().unwrap().is_empty());
    }
}
