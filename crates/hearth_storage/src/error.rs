use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("json codec error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "toml")]
    #[error("toml encode error: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    #[cfg(feature = "toml")]
    #[error("toml decode error: {0}")]
    TomlDecode(#[from] toml::de::Error),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file `{path}` is not a string map: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
