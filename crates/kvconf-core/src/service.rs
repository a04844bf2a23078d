//! Service lifecycle trait

use async_trait::async_trait;

use crate::{Result, ServiceContext};

/// A participant in the process-wide service lifecycle
///
/// `start` validates the service and publishes whatever handle its
/// capabilities need into a derived context. `stop` releases what `start`
/// acquired and cannot fail.
#[async_trait]
pub trait Service: Send + Sync {
    /// Human-readable name used in logs and registry errors
    fn name(&self) -> &str;

    /// Start the service
    ///
    /// # Returns
    /// A context derived from `ctx` carrying this service's handle.
    ///
    /// # Errors
    /// - `Error::Validation` if the service is misconfigured
    async fn start(&self, ctx: &ServiceContext) -> Result<ServiceContext>;

    /// Stop the service
    async fn stop(&self, ctx: &ServiceContext);
}
