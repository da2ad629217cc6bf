//! Persisted application config

use hearth_theme::ColorScheme;
use serde::{Deserialize, Serialize};

/// User-chosen settings persisted under one storage key
///
/// Stored as JSON, e.g. `{"colorScheme":"dark","language":"eo"}`. Unset
/// fields are omitted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_scheme: Option<ColorScheme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

/// Partial update of an [`AppConfig`]; `None` fields keep their prior value
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigPatch {
    pub color_scheme: Option<ColorScheme>,
    pub language: Option<String>,
    pub theme: Option<String>,
}

impl ConfigPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color_scheme(mut self, scheme: impl Into<ColorScheme>) -> Self {
        self.color_scheme = Some(scheme.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.color_scheme.is_none() && self.language.is_none() && self.theme.is_none()
    }
}

impl From<AppConfig> for ConfigPatch {
    fn from(config: AppConfig) -> Self {
        Self {
            color_scheme: config.color_scheme,
            language: config.language,
            theme: config.theme,
        }
    }
}

impl AppConfig {
    /// Overwrite the fields `patch` sets
    pub fn apply(&mut self, patch: ConfigPatch) {
        if let Some(scheme) = patch.color_scheme {
            self.color_scheme = Some(scheme);
        }
        if let Some(language) = patch.language {
            self.language = Some(language);
        }
        if let Some(theme) = patch.theme {
            self.theme = Some(theme);
        }
    }

    /// Fill unset fields from `fallback`
    pub fn or(self, fallback: &AppConfig) -> AppConfig {
        AppConfig {
            color_scheme: self.color_scheme.or_else(|| fallback.color_scheme.clone()),
            language: self.language.or_else(|| fallback.language.clone()),
            theme: self.theme.or_else(|| fallback.theme.clone()),
        }
    }
}
