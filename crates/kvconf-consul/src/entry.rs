//! Consul KV entry wire type

use serde::{Deserialize, Serialize};

/// A single key as returned by `GET /v1/kv/{key}`
///
/// Only `value` is consumed by the provider. The index fields are what a
/// check-and-set or blocking query would build on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KvEntry {
    /// Key name, also the URL path segment after `/v1/kv/`
    pub key: String,

    /// Index at which the key was created
    #[serde(default)]
    pub create_index: u64,

    /// Index of the last modification; the check-and-set token
    #[serde(default)]
    pub modify_index: u64,

    /// Index of the lock held on the key, if any
    #[serde(default)]
    pub lock_index: u64,

    /// User-defined flags, opaque to Consul
    #[serde(default)]
    pub flags: u64,

    /// Raw payload, base64 on the wire and `null` for an empty value
    #[serde(default, with = "base64_value")]
    pub value: Option<Vec<u8>>,

    /// Session holding the lock on this key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
}

impl KvEntry {
    /// Create an entry for `key` holding `value`
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
            ..Default::default()
        }
    }
}

mod base64_value {
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S: Serializer>(
        value: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(bytes) => serializer.serialize_str(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|encoded| STANDARD.decode(encoded).map_err(D::Error::custom))
            .transpose()
    }
}
