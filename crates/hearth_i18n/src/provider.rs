//! Locale provider
//!
//! Serves translations for the current language. Two flavours:
//!
//! - **Fixed**: one dictionary supplied up front; switching the language
//!   only changes the reported language code.
//! - **Fetched**: every language switch fetches and normalizes a new
//!   dictionary. Until the fetch settles the previous dictionary (or the
//!   initial one) keeps serving, so the UI never flashes raw keys. If the
//!   language changes again before a fetch settles, only the latest
//!   request's dictionary is ever installed. A failed fetch keeps the
//!   previous dictionary and is reported through [`LocaleProvider::error`].

use std::future::{self, Future};
use std::sync::Arc;

use hearth_core::{
    Context, ContextError, ContextScope, FetchError, LoadFuture, Params, Resource, Signal,
    Subscription,
};
use tracing::{debug, trace};

use crate::dictionary::{Dictionary, RawDictionary};
use crate::locale::normalize_locale;

#[derive(Clone)]
enum DictionarySource {
    Fixed(Arc<Dictionary>),
    Fetched(Resource<Arc<Dictionary>>),
}

/// Translation provider for one subtree of the UI
#[derive(Clone)]
pub struct LocaleProvider {
    language: Signal<Option<String>>,
    source: DictionarySource,
}

impl Context for LocaleProvider {
    const NAME: &'static str = "LocaleContext";
}

/// Look up the nearest [`LocaleProvider`]
pub fn use_locale(scope: &ContextScope) -> Result<Arc<LocaleProvider>, ContextError> {
    scope.use_context::<LocaleProvider>()
}

impl LocaleProvider {
    /// Serve a fixed, already-normalized dictionary
    pub fn fixed(dictionary: Dictionary) -> Self {
        Self {
            language: Signal::new(None),
            source: DictionarySource::Fixed(Arc::new(dictionary)),
        }
    }

    /// Serve a fixed dictionary, normalizing it first
    pub fn from_raw(raw: RawDictionary) -> Self {
        Self::fixed(Dictionary::normalize(raw))
    }

    /// Fetch a dictionary per language code
    ///
    /// `initial` serves until the first fetch settles.
    pub fn fetched<F, Fut>(fetch: F, initial: Option<Dictionary>) -> Self
    where
        F: Fn(&str) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<RawDictionary, FetchError>> + Send + 'static,
    {
        let resource = Resource::new(
            move |language: &str| {
                let raw = fetch(language);
                async move { raw.await.map(|raw| Arc::new(Dictionary::normalize(raw))) }
            },
            initial.map(Arc::new),
        );
        Self {
            language: Signal::new(None),
            source: DictionarySource::Fetched(resource),
        }
    }

    /// Current language code
    pub fn language(&self) -> Option<String> {
        self.language.get()
    }

    /// Switch language
    ///
    /// For a fetched provider the returned future performs the fetch; it
    /// must be driven (awaited, spawned or blocked on) for the new dictionary
    /// to arrive. Dropping it unpolled reports the new language with the old
    /// dictionary, and the next switch to that language fetches again.
    /// Switching to the language that is already current and requested is a
    /// no-op, as is an empty code.
    pub fn set_language(&self, language: impl Into<String>) -> LoadFuture {
        let language = normalize_locale(&language.into());
        if language.is_empty() {
            return Box::pin(future::ready(()));
        }

        let unchanged = self.language.with(|cur| cur.as_deref() == Some(language.as_str()));
        if let DictionarySource::Fetched(resource) = &self.source {
            if unchanged && resource.requested().as_deref() == Some(language.as_str()) {
                return Box::pin(future::ready(()));
            }
        } else if unchanged {
            return Box::pin(future::ready(()));
        }

        debug!(language = %language, "LocaleProvider::set_language");
        self.language.set(Some(language.clone()));
        self.load(language)
    }

    /// Fetch the dictionary for the current language again
    pub fn reload(&self) -> LoadFuture {
        match self.language.get() {
            Some(language) => self.load(language),
            None => Box::pin(future::ready(())),
        }
    }

    fn load(&self, language: String) -> LoadFuture {
        match &self.source {
            DictionarySource::Fetched(resource) => resource.load(language),
            DictionarySource::Fixed(_) => Box::pin(future::ready(())),
        }
    }

    /// Dictionary currently serving translations
    pub fn dictionary(&self) -> Option<Arc<Dictionary>> {
        match &self.source {
            DictionarySource::Fixed(d) => Some(Arc::clone(d)),
            DictionarySource::Fetched(resource) => resource.value(),
        }
    }

    /// Whether a dictionary fetch is in flight
    pub fn loading(&self) -> bool {
        match &self.source {
            DictionarySource::Fixed(_) => false,
            DictionarySource::Fetched(resource) => resource.loading(),
        }
    }

    /// Error of the latest settled fetch, if it failed
    pub fn error(&self) -> Option<FetchError> {
        match &self.source {
            DictionarySource::Fixed(_) => None,
            DictionarySource::Fetched(resource) => resource.error(),
        }
    }

    /// Translate `key`, echoing the key when no translation exists
    pub fn translate(&self, key: &str, params: &Params) -> String {
        let found = self
            .dictionary()
            .and_then(|dict| dict.translate(key, params));
        match found {
            Some(text) => text,
            None => {
                trace!(key = %key, "no translation, echoing key");
                key.to_string()
            }
        }
    }

    /// Translate `key` without parameters
    pub fn t(&self, key: &str) -> String {
        self.translate(key, &Params::new())
    }

    /// Observe language changes
    pub fn subscribe_language<F>(&self, callback: F) -> Subscription
    where
        F: Fn(Option<&str>) + Send + Sync + 'static,
    {
        self.language.subscribe(move |lang| callback(lang.as_deref()))
    }

    /// Observe dictionary changes (fetch requested, fetch settled)
    ///
    /// A fixed provider never changes, so its subscription is inert.
    pub fn subscribe_dictionary<F>(&self, callback: F) -> Subscription
    where
        F: Fn(Option<&Arc<Dictionary>>) + Send + Sync + 'static,
    {
        match &self.source {
            DictionarySource::Fixed(_) => Subscription::new(|| {}),
            DictionarySource::Fetched(resource) => {
                resource.subscribe(move |state| callback(state.value()))
            }
        }
    }
}
