use std::path::PathBuf;

use hearth_i18n::I18nError;
use hearth_storage::StorageError;
use hearth_theme::ThemeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Theme(#[from] ThemeError),

    #[error(transparent)]
    I18n(#[from] I18nError),

    #[error("failed to read settings `{path}`: {source}")]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings `{path}`: {source}")]
    Settings {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
