use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Color scheme preference
///
/// Serialized as a plain string: `"light"`, `"dark"`, or any custom value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColorScheme {
    Light,
    Dark,
    Custom(String),
}

impl ColorScheme {
    pub fn as_str(&self) -> &str {
        match self {
            ColorScheme::Light => "light",
            ColorScheme::Dark => "dark",
            ColorScheme::Custom(s) => s,
        }
    }

    /// Swap light and dark; custom schemes are left unchanged
    pub fn toggle(&self) -> Self {
        match self {
            ColorScheme::Light => ColorScheme::Dark,
            ColorScheme::Dark => ColorScheme::Light,
            ColorScheme::Custom(s) => ColorScheme::Custom(s.clone()),
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, ColorScheme::Dark)
    }
}

impl From<&str> for ColorScheme {
    fn from(s: &str) -> Self {
        let s = s.trim();
        if s.eq_ignore_ascii_case("light") {
            ColorScheme::Light
        } else if s.eq_ignore_ascii_case("dark") {
            ColorScheme::Dark
        } else {
            ColorScheme::Custom(s.to_string())
        }
    }
}

impl From<String> for ColorScheme {
    fn from(s: String) -> Self {
        ColorScheme::from(s.as_str())
    }
}

impl From<ColorScheme> for String {
    fn from(scheme: ColorScheme) -> Self {
        match scheme {
            ColorScheme::Custom(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl FromStr for ColorScheme {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ColorScheme::from(s))
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
