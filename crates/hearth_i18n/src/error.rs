use thiserror::Error;

#[derive(Debug, Error)]
pub enum I18nError {
    #[error("yaml dictionary error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("json dictionary error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid dictionary entry `{key}`: {msg}")]
    InvalidEntry { key: String, msg: String },
}
