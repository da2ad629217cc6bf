//! Hearth storage bridge
//!
//! Keeps an in-memory reactive value in sync with a persistent key-value
//! store (the native stand-in for browser local/session storage).
//!
//! - [`KeyValueStore`]: the store interface (`get` / `set` / `remove`)
//! - [`MemoryStore`]: process-lifetime store, the session-storage equivalent
//! - [`FileStore`]: JSON file on disk, the local-storage equivalent
//! - [`Codec`]: pluggable serialization, [`JsonCodec`] by default
//! - [`PersistentValue`]: the reactive value itself
//!
//! # Error policy
//!
//! Reads never fail: a missing key, an unreadable store or an undecodable
//! payload all fall back to the default value (logged at `warn`). Writes are
//! write-through: the payload is stored first and the in-memory value only
//! changes once the store accepted it, so a failed write is returned to the
//! caller and leaves both sides untouched.

mod codec;
mod error;
mod persistent;
mod store;

pub use codec::{Codec, JsonCodec};
#[cfg(feature = "toml")]
pub use codec::TomlCodec;
pub use error::{CodecError, StorageError};
pub use persistent::PersistentValue;
pub use store::{FileStore, KeyValueStore, MemoryStore};
