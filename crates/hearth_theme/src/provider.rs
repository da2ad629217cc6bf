//! Theme provider
//!
//! Mirrors the locale provider: a theme is either supplied directly, or
//! fetched by identifier with the previous theme serving until the newest
//! request settles.

use std::future::{self, Future};
use std::sync::Arc;

use hearth_core::{
    Context, ContextError, ContextScope, FetchError, LoadFuture, Resource, Signal, Subscription,
};
use tracing::{debug, trace};

use crate::classes::{normalize_classes, Classes};
use crate::styles::{merge_styles, Styles, Theme};

#[derive(Clone)]
enum ThemeSource {
    Fixed(Arc<Theme>),
    Fetched(Resource<Arc<Theme>>),
}

/// Theme provider for one subtree of the UI
#[derive(Clone)]
pub struct ThemeProvider {
    theme_id: Signal<Option<String>>,
    source: ThemeSource,
}

impl Context for ThemeProvider {
    const NAME: &'static str = "ThemeContext";
}

/// Look up the nearest [`ThemeProvider`]
pub fn use_theme(scope: &ContextScope) -> Result<Arc<ThemeProvider>, ContextError> {
    scope.use_context::<ThemeProvider>()
}

/// Style resolver for `namespace` from the nearest [`ThemeProvider`]
pub fn use_styles(
    scope: &ContextScope,
    namespace: &str,
    defaults: Option<Styles>,
) -> Result<StyleResolver, ContextError> {
    Ok(use_theme(scope)?.use_styles(namespace, defaults))
}

impl ThemeProvider {
    /// Serve one theme
    pub fn fixed(theme: Theme) -> Self {
        Self {
            theme_id: Signal::new(None),
            source: ThemeSource::Fixed(Arc::new(theme)),
        }
    }

    /// Fetch a theme per identifier
    ///
    /// `initial` serves until the first fetch settles.
    pub fn fetched<F, Fut>(fetch: F, initial: Option<Theme>) -> Self
    where
        F: Fn(&str) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Theme, FetchError>> + Send + 'static,
    {
        let resource = Resource::new(
            move |id: &str| {
                let theme = fetch(id);
                async move { theme.await.map(Arc::new) }
            },
            initial.map(Arc::new),
        );
        Self {
            theme_id: Signal::new(None),
            source: ThemeSource::Fetched(resource),
        }
    }

    /// Identifier of the selected theme
    pub fn theme_id(&self) -> Option<String> {
        self.theme_id.get()
    }

    /// Select a theme by identifier
    ///
    /// For a fetched provider the returned future performs the fetch; dropping
    /// it unpolled keeps the previous theme in effect until the identifier is
    /// selected again. Selecting the current theme again, or an empty
    /// identifier, is a no-op.
    pub fn set_theme(&self, id: impl Into<String>) -> LoadFuture {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Box::pin(future::ready(()));
        }

        let unchanged = self.theme_id.with(|cur| cur.as_deref() == Some(id.as_str()));
        let requested = match &self.source {
            ThemeSource::Fetched(resource) => {
                resource.requested().as_deref() == Some(id.as_str())
            }
            ThemeSource::Fixed(_) => true,
        };
        if unchanged && requested {
            return Box::pin(future::ready(()));
        }

        debug!(theme = %id, "ThemeProvider::set_theme");
        self.theme_id.set(Some(id.clone()));
        self.load(id)
    }

    /// Fetch the selected theme again
    pub fn reload(&self) -> LoadFuture {
        match self.theme_id.get() {
            Some(id) => self.load(id),
            None => Box::pin(future::ready(())),
        }
    }

    fn load(&self, id: String) -> LoadFuture {
        match &self.source {
            ThemeSource::Fetched(resource) => resource.load(id),
            ThemeSource::Fixed(_) => Box::pin(future::ready(())),
        }
    }

    /// Theme currently in effect
    pub fn theme(&self) -> Option<Arc<Theme>> {
        match &self.source {
            ThemeSource::Fixed(theme) => Some(Arc::clone(theme)),
            ThemeSource::Fetched(resource) => resource.value(),
        }
    }

    pub fn loading(&self) -> bool {
        match &self.source {
            ThemeSource::Fixed(_) => false,
            ThemeSource::Fetched(resource) => resource.loading(),
        }
    }

    /// Error of the latest settled fetch, if it failed
    pub fn error(&self) -> Option<FetchError> {
        match &self.source {
            ThemeSource::Fixed(_) => None,
            ThemeSource::Fetched(resource) => resource.error(),
        }
    }

    pub fn subscribe_theme_id<F>(&self, callback: F) -> Subscription
    where
        F: Fn(Option<&str>) + Send + Sync + 'static,
    {
        self.theme_id.subscribe(move |id| callback(id.as_deref()))
    }

    /// Observe theme changes (fetch requested, fetch settled)
    pub fn subscribe_theme<F>(&self, callback: F) -> Subscription
    where
        F: Fn(Option<&Arc<Theme>>) + Send + Sync + 'static,
    {
        match &self.source {
            ThemeSource::Fixed(_) => Subscription::new(|| {}),
            ThemeSource::Fetched(resource) => {
                resource.subscribe(move |state| callback(state.value()))
            }
        }
    }

    /// Resolver for the classes of `namespace`, layered over `defaults`
    pub fn use_styles(
        &self,
        namespace: impl Into<String>,
        defaults: Option<Styles>,
    ) -> StyleResolver {
        StyleResolver {
            provider: self.clone(),
            namespace: namespace.into(),
            defaults: defaults.unwrap_or_default(),
        }
    }
}

/// Maps logical class names of one namespace to output class names
///
/// The theme is read on every call, so a resolver picks up theme switches
/// without being recreated.
#[derive(Clone)]
pub struct StyleResolver {
    provider: ThemeProvider,
    namespace: String,
    defaults: Styles,
}

impl StyleResolver {
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Default styles merged with the current theme's styles
    pub fn merged(&self) -> Styles {
        match self.provider.theme() {
            Some(theme) => match theme.styles(&self.namespace) {
                Some(themed) => merge_styles([&self.defaults, themed]),
                None => self.defaults.clone(),
            },
            None => self.defaults.clone(),
        }
    }

    /// Output class string for `classes`
    ///
    /// Classes without a mapping contribute nothing.
    pub fn resolve(&self, classes: impl Into<Classes>) -> String {
        let merged = self.merged();
        let mut out: Vec<&str> = Vec::new();
        for class in normalize_classes(&classes.into()) {
            match merged.get(&class) {
                Some(mapped) => out.extend(mapped.split_whitespace()),
                None => trace!(namespace = %self.namespace, class = %class, "unmapped class"),
            }
        }
        out.join(" ")
    }
}
