use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("color scheme is controlled by its owner and cannot be set directly")]
    Controlled,

    #[error("toml theme error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json theme error: {0}")]
    Json(#[from] serde_json::Error),
}
