use mk_core::types::MockId;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub const RECORD_EXTENSION: &str = ".json";

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("json encode failed: {message}")]
    JsonEncode { message: String },
    #[error("json decode failed: {message}")]
    JsonDecode { message: String },
}

pub fn encode_json<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec_pretty(value).map_err(|err| CodecError::JsonEncode {
        message: err.to_string(),
    })
}

pub fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    serde_json::from_slice(bytes).map_err(|err| CodecError::JsonDecode {
        message: err.to_string(),
    })
}

pub fn record_file_name(id: &MockId) -> String {
    format!("{id}{RECORD_EXTENSION}")
}

/// Maps a directory entry back to its id; `None` for anything that is not a record file.
pub fn id_from_file_name(name: &str) -> Option<MockId> {
    let stem = name.strip_suffix(RECORD_EXTENSION)?;
    MockId::new(stem.to_string()).ok()
}
