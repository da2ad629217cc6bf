//! Hearth Theme System
//!
//! Two providers live here:
//!
//! - [`ColorSchemeProvider`]: the light/dark preference, either controlled
//!   by its owner, mutable by the user, or detected from the system
//! - [`ThemeProvider`]: a [`Theme`] mapping UI namespaces (component names)
//!   to [`Styles`], i.e. logical class names to scoped output class names
//!
//! # Quick Start
//!
//! ```rust
//! use hearth_theme::{classes, Styles, Theme, ThemeProvider};
//!
//! let theme = Theme::new().with_namespace(
//!     "Hello",
//!     Styles::from([("content".to_string(), "x1".to_string())]),
//! );
//! let provider = ThemeProvider::fixed(theme);
//!
//! let defaults = Styles::from([("content".to_string(), "d1".to_string())]);
//! let styles = provider.use_styles("Hello", Some(defaults));
//! assert_eq!(styles.resolve("content"), "d1 x1");
//! assert_eq!(styles.resolve(classes!["content", ("hidden", false)]), "d1 x1");
//! ```
//!
//! # Class names
//!
//! [`Classes`] accepts whitespace-delimited strings, nested lists, and
//! `name -> active` maps. [`normalize_classes`] flattens any of them into a
//! deduplicated, order-preserving list of class names.

pub mod classes;
pub mod color_scheme;
pub mod error;
pub mod media;
pub mod provider;
pub mod scheme;
pub mod styles;

pub use classes::{normalize_classes, Classes};
pub use color_scheme::{use_color_scheme, ColorSchemeProvider};
pub use error::ThemeError;
pub use media::{detect_from_env, ManualMediaSource, MediaQuery, SchemeMediaSource};
pub use provider::{use_styles, use_theme, StyleResolver, ThemeProvider};
pub use scheme::ColorScheme;
pub use styles::{merge_styles, Styles, Theme};
