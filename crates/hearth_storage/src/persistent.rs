use std::sync::Arc;

use hearth_core::{Signal, Subscription};
use tracing::{debug, warn};

use crate::codec::{Codec, JsonCodec};
use crate::error::StorageError;
use crate::store::KeyValueStore;

/// A reactive value mirrored into a [`KeyValueStore`] under one key.
///
/// The store is read exactly once, when the value is opened. Every
/// subsequent `set`/`update` re-encodes the whole value and writes it,
/// without comparing against what is already stored.
pub struct PersistentValue<T, C = JsonCodec> {
    store: Arc<dyn KeyValueStore>,
    key: String,
    codec: Arc<C>,
    value: Signal<T>,
}

impl<T, C> Clone for PersistentValue<T, C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            key: self.key.clone(),
            codec: Arc::clone(&self.codec),
            value: self.value.clone(),
        }
    }
}

impl<T> PersistentValue<T, JsonCodec>
where
    T: Clone + Send + Sync + 'static,
    JsonCodec: Codec<T>,
{
    /// Open `key` in `store` with JSON encoding, falling back to `default`.
    pub fn open(store: Arc<dyn KeyValueStore>, key: impl Into<String>, default: T) -> Self {
        Self::open_with(store, key, default, JsonCodec)
    }
}

impl<T, C> PersistentValue<T, C>
where
    T: Clone + Send + Sync + 'static,
    C: Codec<T>,
{
    /// Open `key` in `store` with a custom codec, falling back to `default`.
    ///
    /// A missing key, a store read error or a payload the codec rejects all
    /// yield `default`; none of them is reported to the caller.
    pub fn open_with(
        store: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        default: T,
        codec: C,
    ) -> Self {
        let key = key.into();
        let initial = match store.get(&key) {
            Ok(Some(payload)) => match codec.decode(&payload) {
                Ok(value) => {
                    debug!(key = %key, "PersistentValue::open: restored stored value");
                    value
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "stored value is unreadable, using default");
                    default
                }
            },
            Ok(None) => default,
            Err(e) => {
                warn!(key = %key, error = %e, "store read failed, using default");
                default
            }
        };

        Self {
            store,
            key,
            codec: Arc::new(codec),
            value: Signal::new(initial),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self) -> T {
        self.value.get()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.value.with(f)
    }

    /// Persist `value`, then publish it.
    ///
    /// On error neither the store nor the in-memory value changes.
    pub fn set(&self, value: T) -> Result<(), StorageError> {
        self.write(&value)?;
        self.value.set(value);
        Ok(())
    }

    /// Apply `f` to a copy of the current value, then [`set`](Self::set) it.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> Result<(), StorageError> {
        let mut next = self.value.get();
        f(&mut next);
        self.set(next)
    }

    /// Delete the stored entry; the in-memory value is left as is.
    pub fn remove(&self) -> Result<(), StorageError> {
        debug!(key = %self.key, "PersistentValue::remove");
        self.store.remove(&self.key)
    }

    /// Observe every published value
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.value.subscribe(callback)
    }

    fn write(&self, value: &T) -> Result<(), StorageError> {
        let payload = self.codec.encode(value)?;
        self.store.set(&self.key, &payload).map_err(|e| {
            warn!(key = %self.key, error = %e, "store write failed");
            e
        })
    }
}
