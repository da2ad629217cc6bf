//! Hearth settings file handling (hearth.toml)

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use hearth_theme::ColorScheme;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::provider::DEFAULT_STORAGE_KEY;

/// Top-level settings (hearth.toml)
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppSettings {
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub defaults: DefaultSettings,
    #[serde(default)]
    pub resources: ResourceSettings,
}

/// Where the persisted config lives
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct StorageSettings {
    /// Key of the config entry inside the store
    #[serde(default = "default_key")]
    pub key: String,
    /// Store file (relative to the settings file)
    #[serde(default = "default_file")]
    pub file: PathBuf,
}

fn default_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_file() -> PathBuf {
    PathBuf::from("hearth-state.json")
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            key: default_key(),
            file: default_file(),
        }
    }
}

/// Values used until the user picks their own
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct DefaultSettings {
    #[serde(default = "default_language")]
    pub language: Option<String>,
    #[serde(default)]
    pub color_scheme: Option<ColorScheme>,
    #[serde(default)]
    pub theme: Option<String>,
}

fn default_language() -> Option<String> {
    Some("en".to_string())
}

impl Default for DefaultSettings {
    fn default() -> Self {
        Self {
            language: default_language(),
            color_scheme: None,
            theme: None,
        }
    }
}

/// Dictionary and theme directories (relative to the settings file)
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResourceSettings {
    #[serde(default = "default_dictionaries")]
    pub dictionaries: PathBuf,
    #[serde(default = "default_themes")]
    pub themes: PathBuf,
}

fn default_dictionaries() -> PathBuf {
    PathBuf::from("resources/dictionaries")
}

fn default_themes() -> PathBuf {
    PathBuf::from("resources/themes")
}

impl Default for ResourceSettings {
    fn default() -> Self {
        Self {
            dictionaries: default_dictionaries(),
            themes: default_themes(),
        }
    }
}

impl AppSettings {
    /// Load settings from `path`
    ///
    /// A missing file yields the defaults. Relative paths inside the file
    /// are resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let settings = match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content).map_err(|source| AppError::Settings {
                path: path.to_path_buf(),
                source,
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file, using defaults");
                Self::default()
            }
            Err(source) => {
                return Err(AppError::SettingsIo {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Ok(settings.relative_to(base))
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Resolve relative paths against `base`
    pub fn relative_to(mut self, base: &Path) -> Self {
        for path in [
            &mut self.storage.file,
            &mut self.resources.dictionaries,
            &mut self.resources.themes,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        self
    }

    /// Defaults as an [`AppConfig`]
    pub fn config_defaults(&self) -> AppConfig {
        AppConfig {
            color_scheme: self.defaults.color_scheme.clone(),
            language: self.defaults.language.clone(),
            theme: self.defaults.theme.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_uses_defaults() {
        let settings = AppSettings::from_toml_str("").unwrap();
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.storage.key, "config");
        assert_eq!(settings.defaults.language.as_deref(), Some("en"));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let settings = AppSettings::from_toml_str(
            r#"
            [defaults]
            color_scheme = "dark"

            [resources]
            themes = "/usr/share/hearth/themes"
            "#,
        )
        .unwrap();

        assert_eq!(settings.defaults.color_scheme, Some(ColorScheme::Dark));
        assert_eq!(settings.defaults.language.as_deref(), Some("en"));
        assert_eq!(settings.resources.dictionaries, default_dictionaries());
        assert_eq!(settings.resources.themes, PathBuf::from("/usr/share/hearth/themes"));
    }

    #[test]
    fn relative_paths_follow_the_settings_file() {
        let settings = AppSettings::default().relative_to(Path::new("/srv/app"));
        assert_eq!(settings.storage.file, PathBuf::from("/srv/app/hearth-state.json"));
        assert_eq!(
            settings.resources.dictionaries,
            PathBuf::from("/srv/app/resources/dictionaries")
        );
    }

    #[test]
    fn load_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hearth.toml");
        fs::write(&path, "[storage\nkey = 1").unwrap();

        let err = AppSettings::load(&path).unwrap_err();
        assert!(matches!(err, AppError::Settings { .. }));
        assert!(err.to_string().contains("hearth.toml"));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let settings = AppSettings::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings.storage.file, dir.path().join("hearth-state.json"));
    }

    #[test]
    fn toml_roundtrip() {
        let settings = AppSettings::default();
        let text = settings.to_toml().unwrap();
        assert_eq!(AppSettings::from_toml_str(&text).unwrap(), settings);
    }
}
