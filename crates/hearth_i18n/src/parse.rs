use crate::dictionary::{RawDictionary, RawEntry};
use crate::error::I18nError;

const MAX_DEPTH: usize = 32;
const MAX_ENTRIES: usize = 10_000;
const MAX_VALUE_BYTES: usize = 16 * 1024;

impl RawDictionary {
    /// Parse a nested YAML mapping.
    ///
    /// Strings become text leaves, numbers and booleans are rendered as text,
    /// mappings become subtrees. Sequences, nulls and non-string keys are
    /// rejected.
    pub fn from_yaml_str(src: &str) -> Result<Self, I18nError> {
        let value: serde_yaml::Value = serde_yaml::from_str(src)?;
        let mut budget = MAX_ENTRIES;
        match value {
            serde_yaml::Value::Mapping(map) => yaml_tree(map, "", 0, &mut budget),
            serde_yaml::Value::Null => Ok(Self::new()),
            _ => Err(invalid("", "top level must be a mapping")),
        }
    }

    /// Parse a nested JSON object, with the same rules as YAML.
    pub fn from_json_str(src: &str) -> Result<Self, I18nError> {
        let value: serde_json::Value = serde_json::from_str(src)?;
        let mut budget = MAX_ENTRIES;
        match value {
            serde_json::Value::Object(map) => json_tree(map, "", 0, &mut budget),
            _ => Err(invalid("", "top level must be an object")),
        }
    }
}

fn invalid(key: &str, msg: impl Into<String>) -> I18nError {
    I18nError::InvalidEntry {
        key: key.to_string(),
        msg: msg.into(),
    }
}

fn path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn check_text(key: &str, text: String, budget: &mut usize) -> Result<RawEntry, I18nError> {
    if text.len() > MAX_VALUE_BYTES {
        return Err(invalid(
            key,
            format!("value is too long (max {MAX_VALUE_BYTES} bytes)"),
        ));
    }
    take_budget(key, budget)?;
    Ok(RawEntry::Text(text))
}

fn take_budget(key: &str, budget: &mut usize) -> Result<(), I18nError> {
    if *budget == 0 {
        return Err(invalid(key, format!("too many entries (max {MAX_ENTRIES})")));
    }
    *budget -= 1;
    Ok(())
}

fn yaml_tree(
    map: serde_yaml::Mapping,
    parent: &str,
    depth: usize,
    budget: &mut usize,
) -> Result<RawDictionary, I18nError> {
    if depth >= MAX_DEPTH {
        return Err(invalid(parent, format!("nesting too deep (max {MAX_DEPTH})")));
    }
    let mut out = RawDictionary::new();
    for (k, v) in map {
        let key = match k {
            serde_yaml::Value::String(s) => s,
            _ => return Err(invalid(parent, "keys must be strings")),
        };
        let full = path(parent, &key);
        let entry = match v {
            serde_yaml::Value::String(s) => check_text(&full, s, budget)?,
            serde_yaml::Value::Number(n) => check_text(&full, n.to_string(), budget)?,
            serde_yaml::Value::Bool(b) => check_text(&full, b.to_string(), budget)?,
            serde_yaml::Value::Mapping(sub) => {
                RawEntry::Tree(yaml_tree(sub, &full, depth + 1, budget)?)
            }
            serde_yaml::Value::Null => return Err(invalid(&full, "value is null")),
            serde_yaml::Value::Sequence(_) => {
                return Err(invalid(&full, "sequences are not supported"))
            }
            serde_yaml::Value::Tagged(_) => {
                return Err(invalid(&full, "tagged values are not supported"))
            }
        };
        out.insert(key, entry);
    }
    Ok(out)
}

fn json_tree(
    map: serde_json::Map<String, serde_json::Value>,
    parent: &str,
    depth: usize,
    budget: &mut usize,
) -> Result<RawDictionary, I18nError> {
    if depth >= MAX_DEPTH {
        return Err(invalid(parent, format!("nesting too deep (max {MAX_DEPTH})")));
    }
    let mut out = RawDictionary::new();
    for (key, v) in map {
        let full = path(parent, &key);
        let entry = match v {
            serde_json::Value::String(s) => check_text(&full, s, budget)?,
            serde_json::Value::Number(n) => check_text(&full, n.to_string(), budget)?,
            serde_json::Value::Bool(b) => check_text(&full, b.to_string(), budget)?,
            serde_json::Value::Object(sub) => {
                RawEntry::Tree(json_tree(sub, &full, depth + 1, budget)?)
            }
            serde_json::Value::Null => return Err(invalid(&full, "value is null")),
            serde_json::Value::Array(_) => {
                return Err(invalid(&full, "arrays are not supported"))
            }
        };
        out.insert(key, entry);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Dictionary;
    use hearth_core::params;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_yaml_and_flatten() {
        let src = r#"
hello: Saluton
menu:
  file:
    open: Malfermi
  count: 3
"#;
        let dict = Dictionary::normalize(RawDictionary::from_yaml_str(src).unwrap());
        assert_eq!(dict.translate("hello", &params!()).as_deref(), Some("Saluton"));
        assert_eq!(
            dict.translate("menu.file.open", &params!()).as_deref(),
            Some("Malfermi")
        );
        assert_eq!(dict.translate("menu.count", &params!()).as_deref(), Some("3"));
    }

    #[test]
    fn parse_json_and_flatten() {
        let src = r#"{ "hello": "Hello", "nav": { "home": "Home" } }"#;
        let dict = Dictionary::normalize(RawDictionary::from_json_str(src).unwrap());
        assert_eq!(dict.translate("nav.home", &params!()).as_deref(), Some("Home"));
    }

    #[test]
    fn empty_yaml_is_empty_dictionary() {
        assert!(RawDictionary::from_yaml_str("").unwrap().is_empty());
    }

    #[test]
    fn sequences_are_rejected_with_path() {
        let err = RawDictionary::from_yaml_str("menu:\n  items: [a, b]\n").unwrap_err();
        match err {
            I18nError::InvalidEntry { key, .. } => assert_eq!(key, "menu.items"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_mapping_top_level_is_rejected() {
        assert!(matches!(
            RawDictionary::from_json_str("[1, 2]"),
            Err(I18nError::InvalidEntry { .. })
        ));
        assert!(matches!(
            RawDictionary::from_json_str("{broken"),
            Err(I18nError::Json(_))
        ));
    }
}
