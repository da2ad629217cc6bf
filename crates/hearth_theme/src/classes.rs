//! Class name values
//!
//! A [`Classes`] value is whatever a caller hands to a style resolver:
//! a whitespace-delimited string, a nested list, or a map from class name to
//! an "active" flag. [`normalize_classes`] turns any of them into a flat list.

use indexmap::{IndexMap, IndexSet};

/// Class name input, possibly nested
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Classes {
    #[default]
    None,
    /// One or more names separated by whitespace
    Str(String),
    List(Vec<Classes>),
    /// Names whose flag is `true` are included
    Map(IndexMap<String, bool>),
}

impl From<&str> for Classes {
    fn from(s: &str) -> Self {
        Classes::Str(s.to_string())
    }
}

impl From<String> for Classes {
    fn from(s: String) -> Self {
        Classes::Str(s)
    }
}

impl From<&String> for Classes {
    fn from(s: &String) -> Self {
        Classes::Str(s.clone())
    }
}

impl<T: Into<Classes>> From<Vec<T>> for Classes {
    fn from(items: Vec<T>) -> Self {
        Classes::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Classes>, const N: usize> From<[T; N]> for Classes {
    fn from(items: [T; N]) -> Self {
        Classes::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Classes>> From<Option<T>> for Classes {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

impl From<(&str, bool)> for Classes {
    fn from((name, active): (&str, bool)) -> Self {
        let mut map = IndexMap::with_capacity(1);
        map.insert(name.to_string(), active);
        Classes::Map(map)
    }
}

impl From<IndexMap<String, bool>> for Classes {
    fn from(map: IndexMap<String, bool>) -> Self {
        Classes::Map(map)
    }
}

/// Build a [`Classes::List`] from heterogeneous items
///
/// ```rust
/// use hearth_theme::{classes, normalize_classes};
///
/// let active = false;
/// let c = classes!["button primary", ("active", active), vec!["icon"]];
/// assert_eq!(normalize_classes(&c), vec!["button", "primary", "icon"]);
/// ```
#[macro_export]
macro_rules! classes {
    () => {
        $crate::Classes::List(::std::vec::Vec::new())
    };
    ($($item:expr),+ $(,)?) => {
        $crate::Classes::List(::std::vec![$($crate::Classes::from($item)),+])
    };
}

/// Flatten `classes` into unique class names, in first-seen order
///
/// Whitespace inside strings (and map keys) separates names; empty names
/// and inactive map entries are dropped. Normalizing the joined output again
/// yields the same list.
pub fn normalize_classes(classes: &Classes) -> Vec<String> {
    let mut out = IndexSet::new();
    collect(classes, &mut out);
    out.into_iter().collect()
}

fn collect(classes: &Classes, out: &mut IndexSet<String>) {
    match classes {
        Classes::None => {}
        Classes::Str(s) => push_words(s, out),
        Classes::List(items) => {
            for item in items {
                collect(item, out);
            }
        }
        Classes::Map(map) => {
            for (name, active) in map {
                if *active {
                    push_words(name, out);
                }
            }
        }
    }
}

fn push_words(s: &str, out: &mut IndexSet<String>) {
    for word in s.split_whitespace() {
        if !out.contains(word) {
            out.insert(word.to_string());
        }
    }
}
