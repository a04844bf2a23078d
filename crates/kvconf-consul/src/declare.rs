//! Registration of the Consul provider

use std::sync::Arc;

use kvconf_core::Registry;

use crate::provider::ConsulConfigProvider;
use crate::service::ConsulService;

/// Register `service` as a lifecycle participant and Consul as the
/// implementation of the config capability
pub fn declare(registry: &mut Registry, service: ConsulService) {
    registry.provide_service(Arc::new(service));
    registry.provide_config_provider(Arc::new(ConsulConfigProvider));
}
