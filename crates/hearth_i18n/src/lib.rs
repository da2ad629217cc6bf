//! Hearth internationalization (i18n)
//!
//! - Nested source dictionaries ([`RawDictionary`]) flatten into a
//!   [`Dictionary`] keyed by dot-joined paths (`menu.file.open`)
//! - Every entry is a [`Translation`]: a function of a [`Params`] bag
//! - [`LocaleProvider`] serves translations, either from a fixed dictionary
//!   or from one fetched per language code
//! - Lookups never fail: a missing key or a missing dictionary echoes the key
//!
//! [`Params`]: hearth_core::Params

mod dictionary;
mod error;
mod locale;
mod parse;
mod provider;
mod template;

pub use dictionary::{Dictionary, RawDictionary, RawEntry, Translation, DEFAULT_SEPARATOR};
pub use error::I18nError;
pub use locale::normalize_locale;
pub use provider::{use_locale, LocaleProvider};

pub use hearth_core::{params, ArgValue, Params};
