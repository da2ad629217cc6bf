use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CodecError;

/// Converts values to and from the string payloads kept in a store.
pub trait Codec<T>: Send + Sync + 'static {
    fn encode(&self, value: &T) -> Result<String, CodecError>;
    fn decode(&self, payload: &str) -> Result<T, CodecError>;
}

/// Structural JSON encoding (the default codec).
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl<T: Serialize + DeserializeOwned> Codec<T> for JsonCodec {
    fn encode(&self, value: &T) -> Result<String, CodecError> {
        Ok(serde_json::to_string(value)?)
    }

    fn decode(&self, payload: &str) -> Result<T, CodecError> {
        Ok(serde_json::from_str(payload)?)
    }
}

/// TOML encoding, for values that are tables (structs and maps).
#[cfg(feature = "toml")]
#[derive(Clone, Copy, Debug, Default)]
pub struct TomlCodec;

#[cfg(feature = "toml")]
impl<T: Serialize + DeserializeOwned> Codec<T> for TomlCodec {
    fn encode(&self, value: &T) -> Result<String, CodecError> {
        Ok(toml::to_string(value)?)
    }

    fn decode(&self, payload: &str) -> Result<T, CodecError> {
        Ok(toml::from_str(payload)?)
    }
}
