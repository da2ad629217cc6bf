//! Dictionaries and translations
//!
//! A [`RawDictionary`] is the nested form authors write:
//!
//! ```yaml
//! hello: Saluton
//! menu:
//!   file:
//!     open: Malfermi
//! ```
//!
//! [`Dictionary::normalize`] flattens it into `hello`, `menu.file.open`.
//! Text leaves become constant translations; function leaves are kept as-is.

use std::fmt;
use std::sync::Arc;

use hearth_core::Params;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::template::Template;

/// Separator used by [`Dictionary::normalize`]
pub const DEFAULT_SEPARATOR: &str = ".";

/// A function from a parameter bag to display text
#[derive(Clone)]
pub struct Translation(Arc<dyn Fn(&Params) -> String + Send + Sync>);

impl Translation {
    pub fn new(f: impl Fn(&Params) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// A translation that ignores its parameters
    pub fn constant(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(move |_| text.clone())
    }

    /// A translation that substitutes `{name}` placeholders from its parameters
    pub fn template(text: impl Into<String>) -> Self {
        let template = Template::parse(&text.into());
        Self::new(move |params| template.render(params))
    }

    pub fn call(&self, params: &Params) -> String {
        (self.0)(params)
    }
}

impl fmt::Debug for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Translation(..)")
    }
}

/// A node of a nested source dictionary
#[derive(Clone, Debug)]
pub enum RawEntry {
    Text(String),
    Func(Translation),
    Tree(RawDictionary),
}

impl From<&str> for RawEntry {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RawEntry {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Translation> for RawEntry {
    fn from(t: Translation) -> Self {
        Self::Func(t)
    }
}

impl From<RawDictionary> for RawEntry {
    fn from(d: RawDictionary) -> Self {
        Self::Tree(d)
    }
}

/// Nested source dictionary, in authoring order
#[derive(Clone, Debug, Default)]
pub struct RawDictionary {
    entries: IndexMap<String, RawEntry>,
}

impl RawDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry (builder style)
    pub fn entry(mut self, key: impl Into<String>, value: impl Into<RawEntry>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add a translation function (builder style)
    pub fn func(
        self,
        key: impl Into<String>,
        f: impl Fn(&Params) -> String + Send + Sync + 'static,
    ) -> Self {
        self.entry(key, Translation::new(f))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RawEntry>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&RawEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Turn every text leaf into a [`Translation::template`]
    ///
    /// Dictionaries loaded from files carry only text; this lets their
    /// `{name}` placeholders take parameters.
    pub fn templated(self) -> Self {
        let entries = self
            .entries
            .into_iter()
            .map(|(key, entry)| {
                let entry = match entry {
                    RawEntry::Text(text) => RawEntry::Func(Translation::template(text)),
                    RawEntry::Tree(sub) => RawEntry::Tree(sub.templated()),
                    func @ RawEntry::Func(_) => func,
                };
                (key, entry)
            })
            .collect();
        Self { entries }
    }
}

impl IntoIterator for RawDictionary {
    type Item = (String, RawEntry);
    type IntoIter = indexmap::map::IntoIter<String, RawEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Flat mapping from translation key to [`Translation`]
#[derive(Clone, Debug, Default)]
pub struct Dictionary {
    entries: FxHashMap<String, Translation>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten `raw`, joining nested keys with `.`
    pub fn normalize(raw: RawDictionary) -> Self {
        Self::normalize_with(raw, DEFAULT_SEPARATOR)
    }

    /// Flatten `raw`, joining nested keys with `separator`
    ///
    /// If two paths flatten to the same key (a literal `"a.b"` next to a
    /// nested `a: { b }`), the one that comes later in authoring order wins.
    pub fn normalize_with(raw: RawDictionary, separator: &str) -> Self {
        let mut entries = FxHashMap::default();
        flatten_into(&mut entries, None, raw, separator);
        Self { entries }
    }

    pub fn insert(&mut self, key: impl Into<String>, translation: Translation) {
        self.entries.insert(key.into(), translation);
    }

    pub fn get(&self, key: &str) -> Option<&Translation> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Apply the translation for `key`, if present
    pub fn translate(&self, key: &str, params: &Params) -> Option<String> {
        self.entries.get(key).map(|t| t.call(params))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<RawDictionary> for Dictionary {
    fn from(raw: RawDictionary) -> Self {
        Self::normalize(raw)
    }
}

fn flatten_into(
    out: &mut FxHashMap<String, Translation>,
    prefix: Option<&str>,
    raw: RawDictionary,
    separator: &str,
) {
    for (key, entry) in raw {
        let full = match prefix {
            Some(p) => format!("{p}{separator}{key}"),
            None => key,
        };
        let translation = match entry {
            RawEntry::Tree(sub) => {
                flatten_into(out, Some(&full), sub, separator);
                continue;
            }
            RawEntry::Text(text) => Translation::constant(text),
            RawEntry::Func(f) => f,
        };
        if out.insert(full.clone(), translation).is_some() {
            debug!(key = %full, "duplicate dictionary key after flattening; later entry wins");
        }
    }
}
