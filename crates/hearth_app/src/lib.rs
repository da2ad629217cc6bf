//! Hearth application layer
//!
//! Ties the storage bridge to the UI providers:
//!
//! - [`AppConfig`]: the persisted `{ colorScheme, language, theme }` blob
//! - [`ConfigProvider`]: owns the config and derives a controlled color
//!   scheme, a fetched locale and a fetched theme from it
//! - [`StorageSync`]: seeds independently owned providers from storage once,
//!   then mirrors their state back
//! - [`AppSettings`]: static settings read from `hearth.toml`
//! - [`files`]: fetchers reading dictionaries and themes from disk
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use hearth_app::{ConfigOptions, ConfigProvider};
//! use hearth_core::{ContextScope, FetchError};
//! use hearth_i18n::{use_locale, RawDictionary};
//! use hearth_storage::MemoryStore;
//!
//! let options = ConfigOptions::new().dictionaries(|language: &str| {
//!     let raw = RawDictionary::new().entry("hello", format!("hello ({language})"));
//!     async move { Ok::<_, FetchError>(raw) }
//! });
//! let config = Arc::new(ConfigProvider::new(Arc::new(MemoryStore::new()), options));
//!
//! let scope = ContextScope::new();
//! config.provide(&scope);
//!
//! pollster::block_on(config.set_language("eo").unwrap());
//! assert_eq!(use_locale(&scope).unwrap().t("hello"), "hello (eo)");
//! ```

pub mod config;
pub mod error;
pub mod files;
pub mod provider;
pub mod settings;
pub mod sync;

pub use config::{AppConfig, ConfigPatch};
pub use error::AppError;
pub use files::{dictionary_fetcher, theme_fetcher};
pub use provider::{use_config, ConfigOptions, ConfigProvider, DEFAULT_STORAGE_KEY};
pub use settings::AppSettings;
pub use sync::{LoadState, StorageSync};
