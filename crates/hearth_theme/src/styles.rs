//! Styles and themes
//!
//! [`Styles`] maps a logical class name (`"content"`) to the scoped output
//! class names it stands for (`"Hello_content_x1"`). A [`Theme`] holds one
//! `Styles` per UI namespace and is usually loaded from a TOML or JSON file:
//!
//! ```toml
//! [Hello]
//! content = "hello-content"
//! title = "hello-title bold"
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ThemeError;

/// Logical class name to output class names
pub type Styles = IndexMap<String, String>;

/// Combine several style maps, space-joining values of shared keys
///
/// Key order follows first appearance. Empty values contribute nothing, so
/// the output never contains stray separators.
pub fn merge_styles<'a, I>(styles: I) -> Styles
where
    I: IntoIterator<Item = &'a Styles>,
{
    let mut merged = Styles::new();
    for map in styles {
        for (key, value) in map {
            let value = value.trim();
            let entry = merged.entry(key.clone()).or_default();
            if value.is_empty() {
                continue;
            }
            if !entry.is_empty() {
                entry.push(' ');
            }
            entry.push_str(value);
        }
    }
    merged
}

/// Namespace to styles mapping
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Theme {
    namespaces: IndexMap<String, Styles>,
}

impl Theme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with_namespace(mut self, namespace: impl Into<String>, styles: Styles) -> Self {
        self.insert(namespace, styles);
        self
    }

    /// Set the styles of `namespace`, replacing any previous entry
    pub fn insert(&mut self, namespace: impl Into<String>, styles: Styles) {
        self.namespaces.insert(namespace.into(), styles);
    }

    pub fn styles(&self, namespace: &str) -> Option<&Styles> {
        self.namespaces.get(namespace)
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.namespaces.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ThemeError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ThemeError> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn styles(entries: &[(&str, &str)]) -> Styles {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn merge_joins_shared_keys() {
        let a = styles(&[("a", "x")]);
        let b = styles(&[("a", "y"), ("b", "z")]);
        assert_eq!(merge_styles([&a, &b]), styles(&[("a", "x y"), ("b", "z")]));
    }

    #[test]
    fn merge_skips_empty_values() {
        let a = styles(&[("a", "")]);
        let b = styles(&[("a", "y")]);
        let c = styles(&[("a", "  ")]);
        assert_eq!(merge_styles([&a, &b, &c]), styles(&[("a", "y")]));
    }

    #[test]
    fn merge_of_nothing_is_empty() {
        assert!(merge_styles(std::iter::empty()).is_empty());
    }

    #[test]
    fn theme_from_toml() {
        let theme = Theme::from_toml_str(
            r#"
            [Hello]
            content = "hello-content"
            title = "hello-title bold"

            [Button]
            root = "btn"
            "#,
        )
        .unwrap();

        assert_eq!(theme.len(), 2);
        assert_eq!(theme.styles("Button").unwrap()["root"], "btn");
        assert_eq!(
            theme.styles("Hello").unwrap()["title"],
            "hello-title bold"
        );
        assert!(theme.styles("Missing").is_none());
    }

    #[test]
    fn theme_from_json() {
        let theme = Theme::from_json_str(r#"{"Hello": {"content": "x1"}}"#).unwrap();
        assert_eq!(theme, Theme::new().with_namespace("Hello", styles(&[("content", "x1")])));
    }

    #[test]
    fn theme_rejects_non_string_values() {
        assert!(matches!(
            Theme::from_json_str(r#"{"Hello": {"content": 1}}"#),
            Err(ThemeError::Json(_))
        ));
        assert!(matches!(
            Theme::from_toml_str("Hello = 3"),
            Err(ThemeError::Toml(_))
        ));
    }
}
