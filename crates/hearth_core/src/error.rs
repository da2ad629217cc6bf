use thiserror::Error;

/// A provider was looked up in a scope that never received it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("{name} not found")]
    Missing { name: &'static str },
}

/// Failure reported by a dictionary or theme fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("no entry for `{0}`")]
    NotFound(String),

    #[error("fetch failed: {0}")]
    Failed(String),
}
