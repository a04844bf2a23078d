//! Behavioral checks shared by every `ConfigProvider`
//!
//! Backends run [`check_provider`] from their own tests against a started
//! context. The checks write under the `kvconf-conformance/` prefix.

use serde::{Deserialize, Serialize};

use crate::{ConfigProvider, ConfigProviderExt, Error, ServiceContext};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct ConformanceConfig {
    name: String,
    timeout: u64,
    enabled: bool,
    #[serde(default)]
    tags: Vec<String>,
}

/// Run the provider conformance checks, panicking on the first failure
pub async fn check_provider(provider: &dyn ConfigProvider, ctx: &ServiceContext) {
    let name = "kvconf-conformance/config";

    let stored = ConformanceConfig {
        name: "conformance".to_string(),
        timeout: 30,
        enabled: true,
        tags: vec!["a".to_string(), "b".to_string()],
    };
    provider
        .put_config(ctx, name, &stored)
        .await
        .expect("put of a structured config should succeed");

    let mut loaded = ConformanceConfig::default();
    let found = provider
        .get_config(ctx, name, &mut loaded)
        .await
        .expect("get of a stored config should succeed");
    assert!(found, "stored config should be found");
    assert_eq!(loaded, stored, "stored config should round-trip");

    let updated = ConformanceConfig {
        timeout: 60,
        ..stored.clone()
    };
    provider
        .put_config(ctx, name, &updated)
        .await
        .expect("overwrite should succeed");
    let mut loaded = ConformanceConfig::default();
    provider
        .get_config(ctx, name, &mut loaded)
        .await
        .expect("get after overwrite should succeed");
    assert_eq!(loaded, updated, "overwrite should replace the config");

    let mut untouched = stored.clone();
    let found = provider
        .get_config(ctx, "kvconf-conformance/never-written", &mut untouched)
        .await
        .expect("get of a missing config should not fail");
    assert!(!found, "missing config should not be found");
    assert_eq!(untouched, stored, "missing config should leave destination untouched");

    let result = provider
        .put_config(ctx, name, &None::<ConformanceConfig>)
        .await;
    assert!(
        matches!(result, Err(Error::Validation(_))),
        "null config should be rejected, got {:?}",
        result
    );
}
