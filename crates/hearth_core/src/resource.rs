//! Async resources
//!
//! A [`Resource`] holds a value that is fetched by key. Every call to
//! [`Resource::load`] bumps a generation counter before the fetch starts;
//! when a fetch settles, its result is applied only if no newer load was
//! requested in the meantime. The visible value therefore always belongs to
//! the most recently requested key, never to a slower, overtaken fetch.
//!
//! While a load is pending the previous value (or the initial value) stays
//! visible. A failed fetch keeps the previous value and records the error.
//! Dropping the latest load before it settles abandons it: `loading` is
//! cleared and the key no longer counts as requested.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::FetchError;
use crate::signal::{Signal, Subscription};

/// Future returned by a fetcher
pub type FetchFuture<T> = Pin<Box<dyn Future<Output = Result<T, FetchError>> + Send + 'static>>;

/// Future that settles a pending load when driven to completion
///
/// Hosts either await it, spawn it on their executor, or block on it.
pub type LoadFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

type Fetcher<T> = Arc<dyn Fn(&str) -> FetchFuture<T> + Send + Sync>;

/// Snapshot of a resource
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceState<T> {
    value: Option<T>,
    requested: Option<String>,
    loading: bool,
    error: Option<FetchError>,
    generation: u64,
}

impl<T> ResourceState<T> {
    /// Latest successfully fetched value, or the initial value
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Key of the most recent load request
    pub fn requested(&self) -> Option<&str> {
        self.requested.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Error of the most recent settled fetch, if it failed
    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }
}

/// Asynchronously populated value keyed by identifier
pub struct Resource<T> {
    state: Signal<ResourceState<T>>,
    fetcher: Fetcher<T>,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            fetcher: Arc::clone(&self.fetcher),
        }
    }
}

/// Settles `loading` when a load future goes away without applying a result
struct PendingLoad<T: Clone + Send + Sync + 'static> {
    state: Signal<ResourceState<T>>,
    generation: u64,
}

impl<T: Clone + Send + Sync + 'static> Drop for PendingLoad<T> {
    fn drop(&mut self) {
        let abandoned = self.state.update_if(|s| {
            if s.generation != self.generation || !s.loading {
                return false;
            }
            s.loading = false;
            s.requested = None;
            true
        });
        if abandoned {
            debug!(generation = self.generation, "load dropped before settling");
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Resource<T> {
    /// Create a resource backed by `fetch`
    ///
    /// `initial` is visible until the first successful fetch.
    pub fn new<F, Fut>(fetch: F, initial: Option<T>) -> Self
    where
        F: Fn(&str) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
    {
        let fetcher: Fetcher<T> =
            Arc::new(move |key: &str| -> FetchFuture<T> { Box::pin(fetch(key)) });
        Self {
            state: Signal::new(ResourceState {
                value: initial,
                requested: None,
                loading: false,
                error: None,
                generation: 0,
            }),
            fetcher,
        }
    }

    /// Request the value for `key`
    ///
    /// The request is registered immediately; the returned future performs
    /// the fetch and applies the result if this is still the latest request.
    /// Dropping the future unpolled abandons the request.
    pub fn load(&self, key: impl Into<String>) -> LoadFuture {
        let key = key.into();
        let mut generation = 0;
        self.state.update(|s| {
            s.generation += 1;
            generation = s.generation;
            s.loading = true;
            s.requested = Some(key.clone());
        });
        debug!(key = %key, generation, "Resource::load");

        let fetch = (self.fetcher)(&key);
        let pending = PendingLoad {
            state: self.state.clone(),
            generation,
        };
        Box::pin(async move {
            let result = fetch.await;
            let applied = pending.state.update_if(|s| {
                if s.generation != generation {
                    return false;
                }
                s.loading = false;
                match result {
                    Ok(value) => {
                        s.value = Some(value);
                        s.error = None;
                    }
                    Err(err) => {
                        warn!(key = %key, error = %err, "fetch failed, keeping previous value");
                        s.error = Some(err);
                    }
                }
                true
            });
            if !applied {
                debug!(key = %key, generation, "discarding result of overtaken fetch");
            }
        })
    }

    /// Current value (previous value while a load is pending)
    pub fn value(&self) -> Option<T> {
        self.state.with(|s| s.value.clone())
    }

    /// Borrow the current value
    pub fn with_value<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        self.state.with(|s| f(s.value.as_ref()))
    }

    pub fn loading(&self) -> bool {
        self.state.with(|s| s.loading)
    }

    pub fn error(&self) -> Option<FetchError> {
        self.state.with(|s| s.error.clone())
    }

    pub fn requested(&self) -> Option<String> {
        self.state.with(|s| s.requested.clone())
    }

    /// Full snapshot of the resource
    pub fn state(&self) -> ResourceState<T> {
        self.state.get()
    }

    /// Observe every state change (request registered, fetch settled)
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&ResourceState<T>) + Send + Sync + 'static,
    {
        self.state.subscribe(callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    type Pending = Arc<Mutex<HashMap<String, oneshot::Sender<Result<String, FetchError>>>>>;

    /// Resource whose fetches only complete when the test resolves them.
    fn gated_resource(initial: Option<String>) -> (Resource<String>, Pending) {
        let pending: Pending = Arc::new(Mutex::new(HashMap::new()));
        let pending_clone = pending.clone();
        let resource = Resource::new(
            move |key: &str| {
                let (tx, rx) = oneshot::channel();
                pending_clone.lock().unwrap().insert(key.to_string(), tx);
                async move {
                    rx.await
                        .unwrap_or_else(|_| Err(FetchError::Failed("dropped".into())))
                }
            },
            initial,
        );
        (resource, pending)
    }

    fn resolve(pending: &Pending, key: &str, value: Result<String, FetchError>) {
        let tx = pending.lock().unwrap().remove(key).unwrap();
        tx.send(value).unwrap();
    }

    #[test]
    fn test_load_sets_value() {
        let resource = Resource::new(
            |key: &str| {
                let value = format!("dict:{key}");
                async move { Ok::<_, FetchError>(value) }
            },
            None,
        );

        assert_eq!(resource.value(), None);
        block_on(resource.load("eo"));
        assert_eq!(resource.value().as_deref(), Some("dict:eo"));
        assert_eq!(resource.requested().as_deref(), Some("eo"));
        assert!(!resource.loading());
    }

    #[test]
    fn test_pending_keeps_previous_value() {
        let (resource, pending) = gated_resource(Some("initial".into()));

        let fut = resource.load("en");
        assert!(resource.loading());
        assert_eq!(resource.value().as_deref(), Some("initial"));

        resolve(&pending, "en", Ok("english".into()));
        block_on(fut);
        assert!(!resource.loading());
        assert_eq!(resource.value().as_deref(), Some("english"));
    }

    #[test]
    fn test_last_requested_wins() {
        let (resource, pending) = gated_resource(None);

        let first = resource.load("en");
        let second = resource.load("eo");

        // The newer request settles first, the overtaken one afterwards.
        resolve(&pending, "eo", Ok("esperanto".into()));
        block_on(second);
        resolve(&pending, "en", Ok("english".into()));
        block_on(first);

        assert_eq!(resource.value().as_deref(), Some("esperanto"));
        assert_eq!(resource.requested().as_deref(), Some("eo"));
        assert!(!resource.loading());
    }

    #[test]
    fn test_overtaken_fetch_does_not_clear_loading() {
        let (resource, pending) = gated_resource(None);

        let first = resource.load("en");
        let second = resource.load("eo");

        resolve(&pending, "en", Ok("english".into()));
        block_on(first);
        assert!(resource.loading());
        assert_eq!(resource.value(), None);

        resolve(&pending, "eo", Ok("esperanto".into()));
        block_on(second);
        assert_eq!(resource.value().as_deref(), Some("esperanto"));
    }

    #[test]
    fn test_failed_fetch_keeps_previous_value() {
        let (resource, pending) = gated_resource(None);

        let fut = resource.load("en");
        resolve(&pending, "en", Ok("english".into()));
        block_on(fut);

        let fut = resource.load("xx");
        resolve(&pending, "xx", Err(FetchError::NotFound("xx".into())));
        block_on(fut);

        assert_eq!(resource.value().as_deref(), Some("english"));
        assert_eq!(resource.error(), Some(FetchError::NotFound("xx".into())));
        assert!(!resource.loading());

        // A later success clears the error.
        let fut = resource.load("en");
        resolve(&pending, "en", Ok("english".into()));
        block_on(fut);
        assert_eq!(resource.error(), None);
    }

    #[test]
    fn test_dropped_load_is_abandoned() {
        let (resource, pending) = gated_resource(Some("initial".into()));

        let fut = resource.load("en");
        assert!(resource.loading());
        drop(fut);

        assert!(!resource.loading());
        assert_eq!(resource.requested(), None);
        assert_eq!(resource.value().as_deref(), Some("initial"));

        // An overtaken load going away leaves the newer one pending.
        let first = resource.load("en");
        let second = resource.load("eo");
        drop(first);
        assert!(resource.loading());
        assert_eq!(resource.requested().as_deref(), Some("eo"));

        resolve(&pending, "eo", Ok("esperanto".into()));
        block_on(second);
        assert!(!resource.loading());
        assert_eq!(resource.requested().as_deref(), Some("eo"));
        assert_eq!(resource.value().as_deref(), Some("esperanto"));
    }

    #[test]
    fn test_subscribers_see_request_and_settle() {
        let resource = Resource::new(|_: &str| async { Ok::<_, FetchError>(1u32) }, None);
        let events = Arc::new(Mutex::new(Vec::new()));

        let events_clone = events.clone();
        let _sub = resource.subscribe(move |s| {
            events_clone
                .lock()
                .unwrap()
                .push((s.is_loading(), s.value().copied()));
        });

        block_on(resource.load("k"));
        assert_eq!(
            *events.lock().unwrap(),
            vec![(true, None), (false, Some(1))]
        );
    }
}
