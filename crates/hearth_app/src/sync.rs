//! Storage sync for independently owned providers
//!
//! Where [`ConfigProvider`](crate::ConfigProvider) owns the config and
//! derives providers from it, [`StorageSync`] works the other way round: the
//! color-scheme, locale and theme providers already exist, and the sync only
//! seeds them from storage once and then mirrors their live state back.

use std::future;
use std::sync::{Arc, Mutex};

use hearth_core::{LoadFuture, Subscription};
use hearth_i18n::LocaleProvider;
use hearth_storage::{KeyValueStore, PersistentValue};
use hearth_theme::{ColorSchemeProvider, ThemeProvider};
use tracing::{debug, warn};

use crate::config::AppConfig;

/// Whether the stored config has been read yet
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Unloaded,
    /// Snapshot of what the store held when it was read
    Loaded(AppConfig),
}

/// Seeds providers from storage once, then persists their combined state
pub struct StorageSync {
    store: Arc<dyn KeyValueStore>,
    key: String,
    state: LoadState,
    value: Option<PersistentValue<AppConfig>>,
    subscriptions: Vec<Subscription>,
}

struct Sources {
    color: Arc<ColorSchemeProvider>,
    locale: Arc<LocaleProvider>,
    theme: Arc<ThemeProvider>,
}

impl Sources {
    fn snapshot(&self) -> AppConfig {
        AppConfig {
            color_scheme: self.color.color_scheme(),
            language: self.locale.language(),
            theme: self.theme.theme_id(),
        }
    }
}

impl StorageSync {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            state: LoadState::Unloaded,
            value: None,
            subscriptions: Vec::new(),
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Attach to a set of providers
    ///
    /// The first call reads the store (`Unloaded -> Loaded`); later calls
    /// reuse that snapshot. Each stored field is pushed into its provider
    /// only if the provider has no value of its own. From then on every
    /// change of any provider writes the combined state once. Attaching
    /// again replaces the previous providers.
    ///
    /// The returned future drives the fetches started by seeding.
    pub fn attach(
        &mut self,
        color: Arc<ColorSchemeProvider>,
        locale: Arc<LocaleProvider>,
        theme: Arc<ThemeProvider>,
    ) -> LoadFuture {
        self.subscriptions.clear();

        let (stored, value) = match (&self.state, &self.value) {
            (LoadState::Loaded(stored), Some(value)) => (stored.clone(), value.clone()),
            _ => {
                let value = PersistentValue::open(
                    Arc::clone(&self.store),
                    self.key.clone(),
                    AppConfig::default(),
                );
                let stored = value.get();
                debug!(key = %self.key, config = ?stored, "StorageSync: loaded");
                self.state = LoadState::Loaded(stored.clone());
                self.value = Some(value.clone());
                (stored, value)
            }
        };

        let sources = Arc::new(Sources {
            color,
            locale,
            theme,
        });
        let seeding = seed(&sources, stored);

        let persist = {
            let sources = Arc::clone(&sources);
            let last = Mutex::new(sources.snapshot());
            Arc::new(move || {
                let next = sources.snapshot();
                {
                    let mut last = last.lock().unwrap();
                    if *last == next {
                        return;
                    }
                    *last = next.clone();
                }
                if let Err(e) = value.set(next) {
                    warn!(key = %value.key(), error = %e, "StorageSync: failed to persist config");
                }
            })
        };

        let on_color = Arc::clone(&persist);
        let on_language = Arc::clone(&persist);
        let on_theme = persist;
        self.subscriptions = vec![
            sources.color.subscribe(move |_| on_color()),
            sources.locale.subscribe_language(move |_| on_language()),
            sources.theme.subscribe_theme_id(move |_| on_theme()),
        ];

        seeding
    }

    /// Stop mirroring; the providers keep their values
    pub fn detach(&mut self) {
        self.subscriptions.clear();
    }

    pub fn is_attached(&self) -> bool {
        !self.subscriptions.is_empty()
    }
}

fn seed(sources: &Sources, stored: AppConfig) -> LoadFuture {
    if let Some(scheme) = stored.color_scheme {
        if sources.color.color_scheme().is_none() {
            if let Err(e) = sources.color.set(Some(scheme)) {
                debug!(error = %e, "StorageSync: color scheme not seeded");
            }
        }
    }

    let mut loads: Vec<LoadFuture> = Vec::new();
    if let Some(language) = stored.language {
        if sources.locale.language().is_none() {
            loads.push(sources.locale.set_language(language));
        }
    }
    if let Some(theme) = stored.theme {
        if sources.theme.theme_id().is_none() {
            loads.push(sources.theme.set_theme(theme));
        }
    }

    if loads.is_empty() {
        return Box::pin(future::ready(()));
    }
    Box::pin(async move {
        for load in loads {
            load.await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::FetchError;
    use hearth_i18n::RawDictionary;
    use hearth_storage::{MemoryStore, StorageError};
    use hearth_theme::{ColorScheme, Theme};
    use pollster::block_on;
    use pretty_assertions::assert_eq;

    /// Memory store that counts writes
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        writes: Mutex<usize>,
    }

    impl KeyValueStore for CountingStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            *self.writes.lock().unwrap() += 1;
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    fn locale() -> Arc<LocaleProvider> {
        Arc::new(LocaleProvider::fetched(
            |language: &str| {
                let raw = RawDictionary::new().entry("lang", language.to_string());
                async move { Ok::<_, FetchError>(raw) }
            },
            None,
        ))
    }

    fn theme() -> Arc<ThemeProvider> {
        Arc::new(ThemeProvider::fetched(
            |_: &str| async { Ok::<_, FetchError>(Theme::new()) },
            None,
        ))
    }

    fn stored(store: &CountingStore) -> AppConfig {
        serde_json::from_str(&store.get("config").unwrap().unwrap()).unwrap()
    }

    #[test]
    fn seeds_only_unset_providers() {
        let store = Arc::new(CountingStore::default());
        store
            .inner
            .set("config", r#"{"colorScheme":"dark","language":"eo","theme":"forest"}"#)
            .unwrap();

        let color = Arc::new(ColorSchemeProvider::autonomous(None));
        let locale = locale();
        block_on(locale.set_language("en"));
        let theme = theme();

        let mut sync = StorageSync::new(store.clone(), "config");
        assert_eq!(sync.state(), &LoadState::Unloaded);
        block_on(sync.attach(color.clone(), locale.clone(), theme.clone()));

        assert!(matches!(
            sync.state(),
            LoadState::Loaded(c) if c.language.as_deref() == Some("eo")
        ));
        assert_eq!(color.color_scheme(), Some(ColorScheme::Dark));
        assert_eq!(locale.language().as_deref(), Some("en"));
        assert_eq!(locale.t("lang"), "en");
        assert_eq!(theme.theme_id().as_deref(), Some("forest"));
        assert_eq!(*store.writes.lock().unwrap(), 0);
    }

    #[test]
    fn persists_one_write_per_change() {
        let store = Arc::new(CountingStore::default());
        let color = Arc::new(ColorSchemeProvider::autonomous(Some(ColorScheme::Light)));
        let locale = locale();
        let theme = theme();

        let mut sync = StorageSync::new(store.clone(), "config");
        block_on(sync.attach(color.clone(), locale.clone(), theme.clone()));
        assert_eq!(*store.writes.lock().unwrap(), 0);

        block_on(locale.set_language("eo"));
        assert_eq!(*store.writes.lock().unwrap(), 1);
        assert_eq!(
            stored(&store),
            AppConfig {
                color_scheme: Some(ColorScheme::Light),
                language: Some("eo".into()),
                theme: None,
            }
        );

        color.toggle().unwrap();
        block_on(theme.set_theme("forest"));
        assert_eq!(*store.writes.lock().unwrap(), 3);
        assert_eq!(
            stored(&store),
            AppConfig {
                color_scheme: Some(ColorScheme::Dark),
                language: Some("eo".into()),
                theme: Some("forest".into()),
            }
        );
    }

    #[test]
    fn store_is_read_once() {
        let store = Arc::new(CountingStore::default());
        store.inner.set("config", r#"{"language":"eo"}"#).unwrap();

        let mut sync = StorageSync::new(store.clone(), "config");
        block_on(sync.attach(
            Arc::new(ColorSchemeProvider::autonomous(None)),
            locale(),
            theme(),
        ));

        // A later external write is not picked up by re-attaching.
        store.inner.set("config", r#"{"language":"fr"}"#).unwrap();
        let fresh = locale();
        block_on(sync.attach(
            Arc::new(ColorSchemeProvider::autonomous(None)),
            fresh.clone(),
            theme(),
        ));
        assert_eq!(fresh.language().as_deref(), Some("eo"));
    }

    #[test]
    fn detach_stops_persisting() {
        let store = Arc::new(CountingStore::default());
        let locale = locale();

        let mut sync = StorageSync::new(store.clone(), "config");
        block_on(sync.attach(
            Arc::new(ColorSchemeProvider::autonomous(None)),
            locale.clone(),
            theme(),
        ));
        assert!(sync.is_attached());

        sync.detach();
        block_on(locale.set_language("eo"));
        assert_eq!(*store.writes.lock().unwrap(), 0);
    }
}
