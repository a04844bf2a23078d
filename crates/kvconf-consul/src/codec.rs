//! Transport codec for the Consul KV endpoint

use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use kvconf_core::Result;

use crate::entry::KvEntry;

/// Encode a configuration value as a JSON request body
pub fn encode_body<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

/// Decode a `GET /v1/kv/{key}` response body into `T`
///
/// The body is a list of KV entries; the first entry's payload is decoded
/// as JSON. An empty list means the key holds nothing and yields `None`.
///
/// # Errors
/// - `Error::Serialization` if the body is not an entry list, a payload is
///   not valid base64, or the payload does not decode into `T`
pub fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<Option<T>> {
    let entries: Vec<KvEntry> = serde_json::from_slice(body)?;
    let Some(entry) = entries.into_iter().next() else {
        debug!("KV response contained no entries");
        return Ok(None);
    };

    let payload = entry.value.unwrap_or_default();
    Ok(Some(serde_json::from_slice(&payload)?))
}
