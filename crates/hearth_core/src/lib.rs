//! Hearth Core Runtime
//!
//! Foundational primitives shared by the Hearth provider crates:
//!
//! - **Signals**: Shared cells that notify subscribers on every write
//! - **Resources**: Asynchronously populated values where the most recently
//!   requested key always wins
//! - **Context scopes**: Explicit provider registries replacing ambient context
//! - **Params**: The parameter bag handed to translation functions
//!
//! # Example
//!
//! ```rust
//! use hearth_core::Signal;
//! use std::sync::{Arc, Mutex};
//!
//! let language = Signal::new(String::from("en"));
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let seen_clone = Arc::clone(&seen);
//! let _sub = language.subscribe(move |lang| {
//!     seen_clone.lock().unwrap().push(lang.clone());
//! });
//!
//! language.set(String::from("eo"));
//! assert_eq!(*seen.lock().unwrap(), vec![String::from("eo")]);
//! ```

pub mod context;
pub mod error;
pub mod params;
pub mod resource;
pub mod signal;

pub use context::{Context, ContextScope};
pub use error::{ContextError, FetchError};
pub use params::{ArgValue, Params};
pub use resource::{FetchFuture, LoadFuture, Resource, ResourceState};
pub use signal::{Signal, Subscription};

/// Build a [`Params`] bag from `name: value` pairs.
///
/// Examples:
/// - `params!()`
/// - `params!(name: "Ada", count: 3)`
#[macro_export]
macro_rules! params {
    () => {
        $crate::Params::new()
    };
    ($($name:ident : $value:expr),* $(,)?) => {{
        let p = $crate::Params::new();
        $(
            let p = p.arg(stringify!($name), $value);
        )*
        p
    }};
}
