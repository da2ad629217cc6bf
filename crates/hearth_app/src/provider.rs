//! Application config provider
//!
//! [`ConfigProvider`] owns the persisted [`AppConfig`] and derives the three
//! UI providers from it:
//!
//! - a controlled [`ColorSchemeProvider`] mirroring `colorScheme`
//! - a fetched [`LocaleProvider`] driven by `language`
//! - a fetched [`ThemeProvider`] driven by `theme`
//!
//! Every setter persists first and only then moves the derived provider, so
//! a failed store write leaves the UI where it was.
//!
//! The locale and theme providers are also reachable through the scope. A
//! language or theme switched there is adopted into the config and
//! persisted; if that write fails it is logged and the UI keeps the switch.

use std::future::{self, Future};
use std::sync::Arc;

use hearth_core::{
    Context, ContextError, ContextScope, FetchError, LoadFuture, Signal, Subscription,
};
use hearth_i18n::{normalize_locale, Dictionary, LocaleProvider, RawDictionary};
use hearth_storage::{KeyValueStore, PersistentValue};
use hearth_theme::{ColorScheme, ColorSchemeProvider, Theme, ThemeProvider};
use tracing::{debug, warn};

use crate::config::{AppConfig, ConfigPatch};
use crate::error::AppError;

/// Storage key used when none is configured
pub const DEFAULT_STORAGE_KEY: &str = "config";

/// Construction options for [`ConfigProvider`]
pub struct ConfigOptions {
    key: String,
    defaults: AppConfig,
    locale: Option<LocaleProvider>,
    theme: Option<ThemeProvider>,
}

impl Default for ConfigOptions {
    fn default() -> Self {
        Self {
            key: DEFAULT_STORAGE_KEY.to_string(),
            defaults: AppConfig::default(),
            locale: None,
            theme: None,
        }
    }
}

impl ConfigOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage key of the persisted config
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Values used for fields the user never set
    pub fn defaults(mut self, defaults: AppConfig) -> Self {
        self.defaults = defaults;
        self
    }

    /// Fetch dictionaries per language code
    pub fn dictionaries<F, Fut>(mut self, fetch: F) -> Self
    where
        F: Fn(&str) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<RawDictionary, FetchError>> + Send + 'static,
    {
        self.locale = Some(LocaleProvider::fetched(fetch, None));
        self
    }

    /// Fetch themes per identifier
    pub fn themes<F, Fut>(mut self, fetch: F) -> Self
    where
        F: Fn(&str) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Theme, FetchError>> + Send + 'static,
    {
        self.theme = Some(ThemeProvider::fetched(fetch, None));
        self
    }
}

/// Aggregates persisted config and the providers derived from it
pub struct ConfigProvider {
    config: PersistentValue<AppConfig>,
    defaults: AppConfig,
    color_scheme: Arc<ColorSchemeProvider>,
    locale: Arc<LocaleProvider>,
    theme: Arc<ThemeProvider>,
    _links: Vec<Subscription>,
}

impl Context for ConfigProvider {
    const NAME: &'static str = "ConfigContext";
}

/// Look up the nearest [`ConfigProvider`]
pub fn use_config(scope: &ContextScope) -> Result<Arc<ConfigProvider>, ContextError> {
    scope.use_context::<ConfigProvider>()
}

impl ConfigProvider {
    /// Open the persisted config in `store` and build the derived providers
    ///
    /// Nothing is fetched yet; call [`initial_load`](Self::initial_load).
    pub fn new(store: Arc<dyn KeyValueStore>, options: ConfigOptions) -> Self {
        let ConfigOptions {
            key,
            defaults,
            locale,
            theme,
        } = options;

        let config = PersistentValue::open(store, key, AppConfig::default());

        let scheme_input = Signal::new(config.with(|c| effective_scheme(c, &defaults)));
        let color_scheme = Arc::new(ColorSchemeProvider::controlled(scheme_input.clone()));
        let mirror = {
            let defaults = defaults.clone();
            config.subscribe(move |c| scheme_input.set(effective_scheme(c, &defaults)))
        };

        let locale = Arc::new(locale.unwrap_or_else(|| LocaleProvider::fixed(Dictionary::new())));
        let theme = Arc::new(theme.unwrap_or_else(|| ThemeProvider::fixed(Theme::new())));

        let adopt_language = {
            let config = config.clone();
            let defaults = defaults.clone();
            locale.subscribe_language(move |language| {
                adopt(&config, &defaults, "language", |c| &mut c.language, language)
            })
        };
        let adopt_theme = {
            let config = config.clone();
            let defaults = defaults.clone();
            theme.subscribe_theme_id(move |id| {
                adopt(&config, &defaults, "theme", |c| &mut c.theme, id)
            })
        };

        Self {
            config,
            defaults,
            color_scheme,
            locale,
            theme,
            _links: vec![mirror, adopt_language, adopt_theme],
        }
    }

    /// Register this provider and every derived provider in `scope`
    pub fn provide(self: &Arc<Self>, scope: &ContextScope) {
        scope.provide(Arc::clone(self));
        scope.provide(Arc::clone(&self.color_scheme));
        scope.provide(Arc::clone(&self.locale));
        scope.provide(Arc::clone(&self.theme));
    }

    /// Fetch the dictionary and theme selected by the current config
    pub fn initial_load(&self) -> LoadFuture {
        let config = self.config();
        let mut loads = Vec::new();
        if let Some(language) = config.language {
            loads.push(self.locale.set_language(language));
        }
        if let Some(theme) = config.theme {
            loads.push(self.theme.set_theme(theme));
        }
        join_all(loads)
    }

    /// Effective config: persisted values, defaults for the rest
    pub fn config(&self) -> AppConfig {
        self.config.get().or(&self.defaults)
    }

    /// Only the values the user set
    pub fn persisted(&self) -> AppConfig {
        self.config.get()
    }

    pub fn color_scheme(&self) -> Option<ColorScheme> {
        self.color_scheme.color_scheme()
    }

    /// Persist a color scheme; `None` falls back to the default
    pub fn set_color_scheme(&self, scheme: Option<ColorScheme>) -> Result<(), AppError> {
        debug!(scheme = ?scheme, "ConfigProvider::set_color_scheme");
        self.config.update(|c| c.color_scheme = scheme)?;
        Ok(())
    }

    /// Swap light and dark (dark when nothing is set)
    pub fn toggle_color_scheme(&self) -> Result<(), AppError> {
        let next = self
            .color_scheme()
            .map(|s| s.toggle())
            .unwrap_or(ColorScheme::Dark);
        self.set_color_scheme(Some(next))
    }

    pub fn language(&self) -> Option<String> {
        self.config().language
    }

    /// Persist a language and fetch its dictionary
    pub fn set_language(&self, language: impl Into<String>) -> Result<LoadFuture, AppError> {
        let language = normalize_locale(&language.into());
        if language.is_empty() {
            return Ok(Box::pin(future::ready(())));
        }
        self.config.update(|c| c.language = Some(language.clone()))?;
        Ok(self.locale.set_language(language))
    }

    pub fn theme(&self) -> Option<String> {
        self.config().theme
    }

    /// Persist a theme identifier and fetch the theme
    pub fn set_theme(&self, theme: impl Into<String>) -> Result<LoadFuture, AppError> {
        let theme = theme.into().trim().to_string();
        if theme.is_empty() {
            return Ok(Box::pin(future::ready(())));
        }
        self.config.update(|c| c.theme = Some(theme.clone()))?;
        Ok(self.theme.set_theme(theme))
    }

    /// Apply a partial update in one store write
    pub fn update(&self, patch: ConfigPatch) -> Result<LoadFuture, AppError> {
        let patch = ConfigPatch {
            language: patch
                .language
                .as_deref()
                .map(normalize_locale)
                .filter(|l| !l.is_empty()),
            theme: patch
                .theme
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from),
            ..patch
        };
        if patch.is_empty() {
            return Ok(Box::pin(future::ready(())));
        }

        debug!(patch = ?patch, "ConfigProvider::update");
        let language = patch.language.clone();
        let theme = patch.theme.clone();
        self.config.update(|c| c.apply(patch))?;

        let mut loads = Vec::new();
        if let Some(language) = language {
            loads.push(self.locale.set_language(language));
        }
        if let Some(theme) = theme {
            loads.push(self.theme.set_theme(theme));
        }
        Ok(join_all(loads))
    }

    /// Delete the persisted config from the store
    ///
    /// The values in memory stay until the next process start.
    pub fn reset(&self) -> Result<(), AppError> {
        self.config.remove()?;
        Ok(())
    }

    pub fn color_scheme_provider(&self) -> Arc<ColorSchemeProvider> {
        Arc::clone(&self.color_scheme)
    }

    pub fn locale(&self) -> Arc<LocaleProvider> {
        Arc::clone(&self.locale)
    }

    pub fn theme_provider(&self) -> Arc<ThemeProvider> {
        Arc::clone(&self.theme)
    }

    /// Observe every persisted config change
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&AppConfig) + Send + Sync + 'static,
    {
        self.config.subscribe(callback)
    }
}

fn effective_scheme(config: &AppConfig, defaults: &AppConfig) -> Option<ColorScheme> {
    config
        .color_scheme
        .clone()
        .or_else(|| defaults.color_scheme.clone())
}

/// Persist a value picked directly on a derived provider
///
/// Nothing is written when the effective config already holds `value`.
fn adopt(
    config: &PersistentValue<AppConfig>,
    defaults: &AppConfig,
    name: &str,
    field: fn(&mut AppConfig) -> &mut Option<String>,
    value: Option<&str>,
) {
    let mut effective = config.get().or(defaults);
    if field(&mut effective).as_deref() == value {
        return;
    }
    debug!(field = name, value = ?value, "ConfigProvider: adopting provider change");
    if let Err(e) = config.update(|c| *field(c) = value.map(String::from)) {
        warn!(field = name, error = %e, "failed to persist provider change");
    }
}

fn join_all(loads: Vec<LoadFuture>) -> LoadFuture {
    Box::pin(async move {
        for load in loads {
            load.await;
        }
    })
}
