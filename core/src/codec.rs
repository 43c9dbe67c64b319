//! JSON mapping used for request bodies and typed responses.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A value that can be JSON-encoded as a request body.
///
/// Implemented for every `Serialize` type, so callers never implement it by
/// hand. It exists so descriptors can hold any body behind a trait object.
pub trait JsonBody: fmt::Debug + Send + Sync {
    fn to_json_value(&self) -> Result<Value, serde_json::Error>;
}

impl<T> JsonBody for T
where
    T: Serialize + fmt::Debug + Send + Sync,
{
    fn to_json_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to encode value as JSON")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode JSON into the requested type")]
    Decode(#[source] serde_json::Error),

    #[error("failed to convert value into the requested type")]
    Convert(#[source] serde_json::Error),
}

/// JSON encode/decode capability injected into the client.
pub trait JsonCodec: Send + Sync {
    fn to_json(&self, value: &dyn JsonBody) -> Result<String, CodecError>;

    fn from_json<T: DeserializeOwned>(&self, json: &str) -> Result<T, CodecError>;

    /// Reshapes a value into another type, e.g. a loosely typed map into a
    /// struct.
    fn convert_value<T: DeserializeOwned>(&self, value: &dyn JsonBody) -> Result<T, CodecError>;
}

/// `serde_json` backed codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeJsonCodec {
    pretty: bool,
}

impl SerdeJsonCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes request bodies with indentation.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl JsonCodec for SerdeJsonCodec {
    fn to_json(&self, value: &dyn JsonBody) -> Result<String, CodecError> {
        let value = value.to_json_value().map_err(CodecError::Encode)?;
        let json = if self.pretty {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        };
        json.map_err(CodecError::Encode)
    }

    fn from_json<T: DeserializeOwned>(&self, json: &str) -> Result<T, CodecError> {
        serde_json::from_str(json).map_err(CodecError::Decode)
    }

    fn convert_value<T: DeserializeOwned>(&self, value: &dyn JsonBody) -> Result<T, CodecError> {
        let value = value.to_json_value().map_err(CodecError::Convert)?;
        serde_json::from_value(value).map_err(CodecError::Convert)
    }
}
