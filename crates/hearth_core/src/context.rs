//! Explicit provider scopes
//!
//! A [`ContextScope`] is a type-keyed registry of provider handles. The app
//! root creates one, providers register themselves into it, and consumers
//! look them up by type. A lookup for a provider that was never registered
//! is an explicit [`ContextError::Missing`] naming the context, rather than
//! a panic deep inside a render.
//!
//! Child scopes see everything their ancestors provide; a provider
//! registered on a child shadows the same type further up.
//!
//! ```
//! use hearth_core::{Context, ContextScope};
//! use std::sync::Arc;
//!
//! #[derive(Debug)]
//! struct Greeting(&'static str);
//!
//! impl Context for Greeting {
//!     const NAME: &'static str = "GreetingContext";
//! }
//!
//! let root = ContextScope::new();
//! assert_eq!(
//!     root.use_context::<Greeting>().unwrap_err().to_string(),
//!     "GreetingContext not found"
//! );
//!
//! root.provide(Arc::new(Greeting("saluton")));
//! let child = root.child();
//! assert_eq!(child.use_context::<Greeting>().unwrap().0, "saluton");
//! ```

use std::any::{Any, TypeId};
use std::sync::{Arc, RwLock};

use rustc_hash::FxHashMap;

use crate::error::ContextError;

/// A value that can be provided through a [`ContextScope`]
pub trait Context: Send + Sync + 'static {
    /// Name reported when the context is missing (e.g. `"LocaleContext"`)
    const NAME: &'static str;
}

type Entry = Arc<dyn Any + Send + Sync>;

struct ScopeInner {
    parent: Option<Arc<ScopeInner>>,
    entries: RwLock<FxHashMap<TypeId, Entry>>,
}

impl ScopeInner {
    fn lookup(&self, type_id: TypeId) -> Option<Entry> {
        if let Some(entry) = self.entries.read().unwrap().get(&type_id) {
            return Some(Arc::clone(entry));
        }
        self.parent.as_ref().and_then(|p| p.lookup(type_id))
    }
}

/// Registry of provider handles, optionally nested
#[derive(Clone)]
pub struct ContextScope {
    inner: Arc<ScopeInner>,
}

impl Default for ContextScope {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextScope {
    /// Create an empty root scope
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ScopeInner {
                parent: None,
                entries: RwLock::new(FxHashMap::default()),
            }),
        }
    }

    /// Create a nested scope that falls back to this one
    pub fn child(&self) -> Self {
        Self {
            inner: Arc::new(ScopeInner {
                parent: Some(Arc::clone(&self.inner)),
                entries: RwLock::new(FxHashMap::default()),
            }),
        }
    }

    /// Register `value` in this scope, replacing any previous value of the same type
    pub fn provide<T: Context>(&self, value: Arc<T>) {
        tracing::trace!(context = T::NAME, "ContextScope::provide");
        self.inner
            .entries
            .write()
            .unwrap()
            .insert(TypeId::of::<T>(), value);
    }

    /// Look up the nearest provider of `T`
    pub fn use_context<T: Context>(&self) -> Result<Arc<T>, ContextError> {
        self.inner
            .lookup(TypeId::of::<T>())
            .and_then(|entry| entry.downcast::<T>().ok())
            .ok_or(ContextError::Missing { name: T::NAME })
    }

    /// Check whether `T` is visible from this scope
    pub fn has<T: Context>(&self) -> bool {
        self.inner.lookup(TypeId::of::<T>()).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Locale(&'static str);

    impl Context for Locale {
        const NAME: &'static str = "LocaleContext";
    }

    struct Theme;

    impl Context for Theme {
        const NAME: &'static str = "ThemeContext";
    }

    #[test]
    fn test_missing_context_names_the_context() {
        let scope = ContextScope::new();
        let err = scope.use_context::<Locale>().unwrap_err();
        assert_eq!(err, ContextError::Missing { name: "LocaleContext" });
        assert_eq!(err.to_string(), "LocaleContext not found");
    }

    #[test]
    fn test_provide_and_lookup() {
        let scope = ContextScope::new();
        scope.provide(Arc::new(Locale("eo")));

        assert_eq!(*scope.use_context::<Locale>().unwrap(), Locale("eo"));
        assert!(scope.has::<Locale>());
        assert!(!scope.has::<Theme>());
    }

    #[test]
    fn test_child_inherits_and_shadows() {
        let root = ContextScope::new();
        root.provide(Arc::new(Locale("en")));

        let child = root.child();
        assert_eq!(*child.use_context::<Locale>().unwrap(), Locale("en"));

        child.provide(Arc::new(Locale("eo")));
        assert_eq!(*child.use_context::<Locale>().unwrap(), Locale("eo"));
        assert_eq!(*root.use_context::<Locale>().unwrap(), Locale("en"));
    }

    #[test]
    fn test_child_registration_not_visible_to_parent() {
        let root = ContextScope::new();
        let child = root.child();
        child.provide(Arc::new(Theme));

        assert!(child.has::<Theme>());
        assert!(root.use_context::<Theme>().is_err());
    }
}
