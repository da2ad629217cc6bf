//! System color-scheme signals
//!
//! The auto-detecting [`ColorSchemeProvider`](crate::ColorSchemeProvider)
//! listens to two notifications, "prefers light" and "prefers dark", through
//! a [`SchemeMediaSource`]. Hosts implement the trait on top of whatever the
//! platform offers (a browser media query, a desktop settings portal);
//! [`ManualMediaSource`] is a ready-made source driven by the host itself.

use hearth_core::{Signal, Subscription};

use crate::scheme::ColorScheme;

/// The two system preferences a color-scheme provider listens to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaQuery {
    PrefersLight,
    PrefersDark,
}

impl MediaQuery {
    /// CSS media query text
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaQuery::PrefersLight => "(prefers-color-scheme: light)",
            MediaQuery::PrefersDark => "(prefers-color-scheme: dark)",
        }
    }

    /// Scheme selected when this query matches
    pub fn scheme(&self) -> ColorScheme {
        match self {
            MediaQuery::PrefersLight => ColorScheme::Light,
            MediaQuery::PrefersDark => ColorScheme::Dark,
        }
    }
}

/// Source of system color-scheme change notifications
pub trait SchemeMediaSource: Send + Sync {
    /// Whether `query` currently matches
    fn matches(&self, query: MediaQuery) -> bool;

    /// Call `callback` with the new match state whenever `query` changes
    fn watch(&self, query: MediaQuery, callback: Box<dyn Fn(bool) + Send + Sync>)
        -> Subscription;
}

/// Media source whose state is pushed by the host
#[derive(Clone, Default)]
pub struct ManualMediaSource {
    light: Signal<bool>,
    dark: Signal<bool>,
}

impl ManualMediaSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a change of `query`
    pub fn emit(&self, query: MediaQuery, matches: bool) {
        self.signal(query).set(matches);
    }

    /// Report that the system switched to `scheme`
    pub fn prefer(&self, scheme: &ColorScheme) {
        match scheme {
            ColorScheme::Light => {
                self.emit(MediaQuery::PrefersDark, false);
                self.emit(MediaQuery::PrefersLight, true);
            }
            ColorScheme::Dark => {
                self.emit(MediaQuery::PrefersLight, false);
                self.emit(MediaQuery::PrefersDark, true);
            }
            ColorScheme::Custom(_) => {}
        }
    }

    /// Number of live watchers on both queries
    pub fn watcher_count(&self) -> usize {
        self.light.subscriber_count() + self.dark.subscriber_count()
    }

    fn signal(&self, query: MediaQuery) -> &Signal<bool> {
        match query {
            MediaQuery::PrefersLight => &self.light,
            MediaQuery::PrefersDark => &self.dark,
        }
    }
}

impl SchemeMediaSource for ManualMediaSource {
    fn matches(&self, query: MediaQuery) -> bool {
        self.signal(query).get()
    }

    fn watch(
        &self,
        query: MediaQuery,
        callback: Box<dyn Fn(bool) + Send + Sync>,
    ) -> Subscription {
        self.signal(query).subscribe(move |matches| callback(*matches))
    }
}

/// One-shot system hint taken from the environment
///
/// `HEARTH_COLOR_SCHEME` wins when set; otherwise the terminal's
/// `COLORFGBG` background color is used.
pub fn detect_from_env() -> Option<ColorScheme> {
    if let Ok(value) = std::env::var("HEARTH_COLOR_SCHEME") {
        if !value.trim().is_empty() {
            return Some(ColorScheme::from(value.as_str()));
        }
    }
    scheme_from_colorfgbg(&std::env::var("COLORFGBG").ok()?)
}

/// `COLORFGBG` is `fg;bg` (sometimes `fg;default;bg`); ANSI backgrounds
/// 0-6 and 8 are dark.
fn scheme_from_colorfgbg(value: &str) -> Option<ColorScheme> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    Some(if matches!(bg, 0..=6 | 8) {
        ColorScheme::Dark
    } else {
        ColorScheme::Light
    })
}
