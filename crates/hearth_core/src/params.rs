use std::borrow::Cow;
use std::fmt;

/// A translation parameter value.
#[derive(Clone, Debug, PartialEq)]
pub enum ArgValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Str(s) => f.write_str(s),
            ArgValue::Int(i) => write!(f, "{i}"),
            ArgValue::Float(v) => {
                // Trim trailing zeros: 2.50 -> 2.5, 3.0 -> 3
                let mut s = v.to_string();
                if s.contains('.') {
                    while s.ends_with('0') {
                        s.pop();
                    }
                    if s.ends_with('.') {
                        s.pop();
                    }
                }
                f.write_str(&s)
            }
            ArgValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<String> for ArgValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl<'a> From<&'a str> for ArgValue {
    fn from(v: &'a str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl<'a> From<Cow<'a, str>> for ArgValue {
    fn from(v: Cow<'a, str>) -> Self {
        Self::Str(v.into_owned())
    }
}

impl From<bool> for ArgValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// Lossless integer and float conversions
macro_rules! arg_from {
    ($variant:ident($target:ty): $($source:ty),+) => {$(
        impl From<$source> for ArgValue {
            fn from(v: $source) -> Self {
                Self::$variant(<$target>::from(v))
            }
        }
    )+};
}

arg_from!(Int(i64): i8, i16, i32, i64, u8, u16, u32);
arg_from!(Float(f64): f32, f64);

/// Wide unsigned values beyond `i64::MAX` degrade to floats
macro_rules! arg_from_wide {
    ($($source:ty),+) => {$(
        impl From<$source> for ArgValue {
            fn from(v: $source) -> Self {
                i64::try_from(v).map_or(Self::Float(v as f64), Self::Int)
            }
        }
    )+};
}

arg_from_wide!(u64, usize);

/// An ordered bag of named parameters passed to a translation function.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Params {
    args: Vec<(Cow<'static, str>, ArgValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter; a later value for the same name wins on lookup.
    pub fn arg(mut self, name: impl Into<Cow<'static, str>>, value: impl Into<ArgValue>) -> Self {
        self.args.push((name.into(), value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.args
            .iter()
            .rev()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.args.iter().map(|(k, v)| (k.as_ref(), v))
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;

    #[test]
    fn test_float_display_trims_zeros() {
        assert_eq!(ArgValue::from(2.5f64).to_string(), "2.5");
        assert_eq!(ArgValue::from(3.0f64).to_string(), "3");
        assert_eq!(ArgValue::from(-7i32).to_string(), "-7");
        assert_eq!(ArgValue::from(true).to_string(), "true");
    }

    #[test]
    fn test_integer_widths() {
        assert_eq!(ArgValue::from(200u8), ArgValue::Int(200));
        assert_eq!(ArgValue::from(4usize), ArgValue::Int(4));
        assert_eq!(ArgValue::from(u64::MAX), ArgValue::Float(u64::MAX as f64));
        assert_eq!(ArgValue::from(Cow::Borrowed("x")), ArgValue::Str("x".into()));
    }

    #[test]
    fn test_later_arg_wins() {
        let p = Params::new().arg("name", "Ada").arg("name", "Grace");
        assert_eq!(p.get("name"), Some(&ArgValue::from("Grace")));
        assert_eq!(p.get("missing"), None);
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn test_params_macro() {
        let p = params!(name: "Ada", count: 3);
        assert_eq!(p.get("name"), Some(&ArgValue::Str("Ada".into())));
        assert_eq!(p.get("count"), Some(&ArgValue::Int(3)));
        assert!(params!().is_empty());
    }
}
