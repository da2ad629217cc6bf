//! Reactive signals
//!
//! A [`Signal`] is a shared cell owned by exactly one provider. Handles are
//! cheap to clone; every clone observes the same value. Each write notifies
//! all live subscribers, whether or not the value actually changed.
//!
//! Subscribers run after the value lock is released, against a snapshot of
//! the written value, so they are free to read (or write) the signal again.

use slotmap::{new_key_type, SlotMap};
use std::sync::{Arc, Mutex, RwLock, Weak};

new_key_type! {
    /// Identifier for a registered subscriber
    pub struct SubscriberId;
}

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;
type SubscriberMap<T> = Mutex<SlotMap<SubscriberId, Callback<T>>>;

/// Shared reactive cell
pub struct Signal<T> {
    value: Arc<RwLock<T>>,
    subscribers: Arc<SubscriberMap<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl<T: Default + Clone + Send + Sync + 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Signal").field(&*self.value.read().unwrap()).finish()
    }
}

impl<T: Clone + Send + Sync + 'static> Signal<T> {
    /// Create a signal holding `value`
    pub fn new(value: T) -> Self {
        Self {
            value: Arc::new(RwLock::new(value)),
            subscribers: Arc::new(Mutex::new(SlotMap::with_key())),
        }
    }

    /// Get a clone of the current value
    pub fn get(&self) -> T {
        self.value.read().unwrap().clone()
    }

    /// Borrow the current value without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.read().unwrap())
    }

    /// Replace the value and notify subscribers
    pub fn set(&self, value: T) {
        let snapshot = {
            let mut current = self.value.write().unwrap();
            *current = value;
            current.clone()
        };
        self.notify(&snapshot);
    }

    /// Mutate the value in place and notify subscribers
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let snapshot = {
            let mut current = self.value.write().unwrap();
            f(&mut current);
            current.clone()
        };
        self.notify(&snapshot);
    }

    /// Mutate the value in place, notifying subscribers only when `f` returns true
    ///
    /// The closure runs under the write lock, which makes check-and-set
    /// sequences atomic with respect to other writers.
    pub fn update_if(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        let snapshot = {
            let mut current = self.value.write().unwrap();
            if !f(&mut current) {
                return false;
            }
            current.clone()
        };
        self.notify(&snapshot);
        true
    }

    /// Register a callback invoked after every write
    ///
    /// The callback stays registered until the returned [`Subscription`] is dropped.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self
            .subscribers
            .lock()
            .unwrap()
            .insert(Arc::new(callback));
        let weak: Weak<SubscriberMap<T>> = Arc::downgrade(&self.subscribers);
        Subscription::new(move || {
            if let Some(subscribers) = weak.upgrade() {
                subscribers.lock().unwrap().remove(id);
            }
        })
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().unwrap().len()
    }

    fn notify(&self, snapshot: &T) {
        let callbacks: Vec<Callback<T>> = self
            .subscribers
            .lock()
            .unwrap()
            .values()
            .cloned()
            .collect();
        for callback in callbacks {
            callback(snapshot);
        }
    }
}

/// Handle that keeps a subscriber registered
///
/// Dropping the handle unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Unsubscribe now
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Keep the subscriber registered for as long as the signal lives
    pub fn detach(mut self) {
        self.cancel = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
