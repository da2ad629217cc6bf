//! Color scheme provider
//!
//! Three modes, fixed at construction:
//!
//! - **Controlled**: the owner supplies a `Signal<Option<ColorScheme>>`;
//!   the provider only mirrors it and refuses direct writes.
//! - **Autonomous**: starts from an initial value, user-mutable.
//! - **Auto-detecting**: once mounted, follows the system "prefers light" /
//!   "prefers dark" notifications (the last one to fire wins). An explicit
//!   override beats the detected value, which beats the static default.

use std::sync::{Arc, Mutex};

use hearth_core::{Context, ContextError, ContextScope, Signal, Subscription};
use tracing::debug;

use crate::error::ThemeError;
use crate::media::{MediaQuery, SchemeMediaSource};
use crate::scheme::ColorScheme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Controlled,
    Autonomous,
    AutoDetect,
}

struct Inner {
    mode: Mode,
    /// Owner's value (controlled), user value (autonomous) or override (auto)
    explicit: Signal<Option<ColorScheme>>,
    detected: Signal<Option<ColorScheme>>,
    resolved: Signal<Option<ColorScheme>>,
    source: Option<Arc<dyn SchemeMediaSource>>,
    watchers: Mutex<Vec<Subscription>>,
    /// Keeps `resolved` in sync with `explicit` and `detected`
    _inputs: Vec<Subscription>,
}

/// Reactive light/dark preference
#[derive(Clone)]
pub struct ColorSchemeProvider {
    inner: Arc<Inner>,
}

impl Context for ColorSchemeProvider {
    const NAME: &'static str = "ColorSchemeContext";
}

/// Look up the nearest [`ColorSchemeProvider`]
pub fn use_color_scheme(scope: &ContextScope) -> Result<Arc<ColorSchemeProvider>, ContextError> {
    scope.use_context::<ColorSchemeProvider>()
}

fn resolve(
    explicit: &Option<ColorScheme>,
    detected: &Option<ColorScheme>,
    default: &Option<ColorScheme>,
) -> Option<ColorScheme> {
    explicit
        .clone()
        .or_else(|| detected.clone())
        .or_else(|| default.clone())
}

impl ColorSchemeProvider {
    /// Mirror the owner's signal; direct writes are rejected
    pub fn controlled(value: Signal<Option<ColorScheme>>) -> Self {
        Self::build(Mode::Controlled, value, None, None)
    }

    /// User-mutable scheme starting at `initial`
    pub fn autonomous(initial: Option<ColorScheme>) -> Self {
        Self::build(Mode::Autonomous, Signal::new(initial), None, None)
    }

    /// Follow the system preference reported by `source` once mounted
    ///
    /// `override_scheme` beats the detected value; `default` applies when
    /// neither is known.
    pub fn auto_detect(
        source: Arc<dyn SchemeMediaSource>,
        override_scheme: Option<ColorScheme>,
        default: Option<ColorScheme>,
    ) -> Self {
        Self::build(
            Mode::AutoDetect,
            Signal::new(override_scheme),
            Some(source),
            default,
        )
    }

    fn build(
        mode: Mode,
        explicit: Signal<Option<ColorScheme>>,
        source: Option<Arc<dyn SchemeMediaSource>>,
        default: Option<ColorScheme>,
    ) -> Self {
        let detected: Signal<Option<ColorScheme>> = Signal::new(None);
        let resolved = Signal::new(resolve(&explicit.get(), &None, &default));

        let recompute = {
            let explicit = explicit.clone();
            let detected = detected.clone();
            let resolved = resolved.clone();
            Arc::new(move || {
                let next = resolve(&explicit.get(), &detected.get(), &default);
                resolved.update_if(|current| {
                    if *current == next {
                        return false;
                    }
                    debug!(from = ?current, to = ?next, "ColorSchemeProvider: scheme changed");
                    *current = next;
                    true
                });
            })
        };

        let on_explicit = Arc::clone(&recompute);
        let on_detected = recompute;
        let inputs = vec![
            explicit.subscribe(move |_| on_explicit()),
            detected.subscribe(move |_| on_detected()),
        ];

        Self {
            inner: Arc::new(Inner {
                mode,
                explicit,
                detected,
                resolved,
                source,
                watchers: Mutex::new(Vec::new()),
                _inputs: inputs,
            }),
        }
    }

    /// Start following the system preference (auto-detecting mode only)
    ///
    /// Reads the current system state, then watches both queries until
    /// [`unmount`](Self::unmount) or drop. Mounting again restarts the watch.
    pub fn mount(&self) {
        let Some(source) = self.inner.source.as_ref() else {
            return;
        };

        let initial = if source.matches(MediaQuery::PrefersDark) {
            Some(ColorScheme::Dark)
        } else if source.matches(MediaQuery::PrefersLight) {
            Some(ColorScheme::Light)
        } else {
            None
        };
        if initial.is_some() {
            self.inner.detected.set(initial);
        }

        let mut watchers = Vec::with_capacity(2);
        for query in [MediaQuery::PrefersLight, MediaQuery::PrefersDark] {
            let detected = self.inner.detected.clone();
            watchers.push(source.watch(
                query,
                Box::new(move |matches| {
                    if matches {
                        detected.set(Some(query.scheme()));
                    }
                }),
            ));
        }
        *self.inner.watchers.lock().unwrap() = watchers;
        debug!("ColorSchemeProvider::mount: watching system preference");
    }

    /// Stop following the system preference; the last detected value stays
    pub fn unmount(&self) {
        self.inner.watchers.lock().unwrap().clear();
    }

    pub fn is_mounted(&self) -> bool {
        !self.inner.watchers.lock().unwrap().is_empty()
    }

    /// Effective scheme
    pub fn color_scheme(&self) -> Option<ColorScheme> {
        self.inner.resolved.get()
    }

    /// Scheme reported by the system, if any was detected
    pub fn detected(&self) -> Option<ColorScheme> {
        self.inner.detected.get()
    }

    pub fn is_controlled(&self) -> bool {
        self.inner.mode == Mode::Controlled
    }

    /// Set the user value (autonomous) or override (auto-detecting)
    ///
    /// `None` clears an override, letting detection or the default apply.
    pub fn set(&self, scheme: Option<ColorScheme>) -> Result<(), ThemeError> {
        if self.inner.mode == Mode::Controlled {
            return Err(ThemeError::Controlled);
        }
        self.inner.explicit.set(scheme);
        Ok(())
    }

    /// Switch between light and dark (dark when nothing is resolved yet)
    pub fn toggle(&self) -> Result<(), ThemeError> {
        let next = self
            .color_scheme()
            .map(|s| s.toggle())
            .unwrap_or(ColorScheme::Dark);
        self.set(Some(next))
    }

    /// Observe changes of the effective scheme
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(Option<&ColorScheme>) + Send + Sync + 'static,
    {
        self.inner
            .resolved
            .subscribe(move |scheme| callback(scheme.as_ref()))
    }
}
