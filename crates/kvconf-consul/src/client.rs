//! HTTP client for the Consul KV API

use reqwest::{Client, StatusCode, Url, header::CONTENT_TYPE};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use kvconf_core::config_provider::{ensure_name, ensure_present};
use kvconf_core::{Error, Result};

use crate::codec::{decode_body, encode_body};
use crate::service::ConsulService;

/// Client bound to one validated Consul agent
///
/// Created by `ConsulService::start`. The underlying `reqwest::Client`
/// pools connections; no request timeout is set beyond the transport
/// defaults.
#[derive(Debug, Clone)]
pub struct ConsulClient {
    service: ConsulService,
    http: Client,
}

impl ConsulClient {
    /// Create a client for `service`
    ///
    /// # Errors
    /// - `Error::Validation` if the service has an empty host or zero port
    /// - `Error::Transport` if the HTTP client cannot be built
    pub fn new(service: ConsulService) -> Result<Self> {
        service.validate()?;

        let http = Client::builder()
            .user_agent(format!("kvconf/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { service, http })
    }

    /// The descriptor this client was created from
    pub fn service(&self) -> &ConsulService {
        &self.service
    }

    /// URL of the KV endpoint for `name`
    ///
    /// Each `/`-separated segment of `name` is percent-encoded, so `?`, `#`
    /// and spaces stay part of the key instead of starting a query or
    /// fragment.
    ///
    /// # Errors
    /// - `Error::Validation` if the host does not form a valid URL
    pub fn kv_url(&self, name: &str) -> Result<Url> {
        let base = format!("http://{}:{}/v1/kv", self.service.host, self.service.port);
        let mut url = Url::parse(&base)
            .map_err(|e| Error::Validation(format!("invalid Consul address {}: {}", base, e)))?;
        url.path_segments_mut()
            .map_err(|()| Error::Validation(format!("invalid Consul address {}", base)))?
            .extend(name.split('/'));
        Ok(url)
    }

    /// Fetch and decode the configuration stored under `name`
    ///
    /// # Returns
    /// `Ok(None)` if Consul answers 404 or returns no entries.
    ///
    /// # Errors
    /// - `Error::Validation` if `name` is empty
    /// - `Error::Transport` if the request fails
    /// - `Error::UnexpectedStatus` for any status other than 200 or 404
    /// - `Error::Serialization` if the body or payload is malformed
    pub async fn get_config<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        ensure_name(name)?;
        let url = self.kv_url(name)?;

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::Transport(format!("GET {} failed: {}", url, e)))?;

        let status = response.status();
        debug!("GET {} -> {}", url, status);

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status != StatusCode::OK {
            return Err(Error::UnexpectedStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| {
                Error::Transport(format!("Failed to read body of GET {}: {}", url, e))
            })?;
        decode_body(&body)
    }

    /// Encode `config` and store it under `name`
    ///
    /// Only transport failures are errors: the response status is logged
    /// but not checked.
    ///
    /// # Errors
    /// - `Error::Validation` if `name` is empty or `config` serializes to null
    /// - `Error::Serialization` if `config` cannot be encoded
    /// - `Error::Transport` if the request fails
    pub async fn put_config<T: Serialize + ?Sized>(&self, name: &str, config: &T) -> Result<()> {
        let value = serde_json::to_value(config)?;
        self.put_config_value(name, &value).await
    }

    /// Store an already-converted JSON `config` under `name`
    ///
    /// # Errors
    /// Same as [`ConsulClient::put_config`].
    pub async fn put_config_value(&self, name: &str, config: &serde_json::Value) -> Result<()> {
        ensure_name(name)?;
        ensure_present(config)?;
        let body = encode_body(config)?;
        let url = self.kv_url(name)?;

        let response = self
            .http
            .put(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("PUT {} failed: {}", url, e)))?;

        let status = response.status();
        debug!("PUT {} -> {}", url, status);
        if !status.is_success() {
            warn!("Consul answered PUT {} with status {}", url, status);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kv_url() {
        let client = ConsulClient::new(ConsulService::new("consul.local", 8501)).unwrap();
        assert_eq!(
            client.kv_url("svc/cfg").unwrap().as_str(),
            "http://consul.local:8501/v1/kv/svc/cfg"
        );
    }

    #[test]
    fn test_kv_url_encodes_reserved_characters() {
        let client = ConsulClient::new(ConsulService::new("127.0.0.1", 8500)).unwrap();

        let url = client.kv_url("svc/cfg?dc=other").unwrap();
        assert_eq!(url.path(), "/v1/kv/svc/cfg%3Fdc=other");
        assert!(url.query().is_none());

        let url = client.kv_url("svc/cfg#frag").unwrap();
        assert_eq!(url.path(), "/v1/kv/svc/cfg%23frag");
        assert!(url.fragment().is_none());

        let url = client.kv_url("svc/a b").unwrap();
        assert_eq!(url.path(), "/v1/kv/svc/a%20b");
    }

    #[test]
    fn test_kv_url_rejects_invalid_host() {
        let client = ConsulClient::new(ConsulService::new("bad host", 8500)).unwrap();
        assert!(matches!(client.kv_url("svc/cfg"), Err(Error::Validation(_))));
    }

    #[test]
    fn test_new_validates_service() {
        let result = ConsulClient::new(ConsulService::new("", 8500));
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_empty_name_rejected_before_request() {
        // Port 1 is never a Consul agent; validation must fail first
        let client = ConsulClient::new(ConsulService::new("127.0.0.1", 1)).unwrap();

        let get = client.get_config::<serde_json::Value>("").await;
        assert!(matches!(get, Err(Error::Validation(_))));

        let put = client.put_config("", &serde_json::json!({"a": 1})).await;
        assert!(matches!(put, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_null_put_rejected_before_request() {
        let client = ConsulClient::new(ConsulService::new("127.0.0.1", 1)).unwrap();

        let result = client.put_config("svc/cfg", &Option::<u32>::None).await;
        assert!(matches!(result, Err(Error::Validation(_))));

        let result = client
            .put_config_value("svc/cfg", &serde_json::Value::Null)
            .await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }
}
