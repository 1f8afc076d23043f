//! The contract a remote key-value source has to fulfill to back a refreshed store.

use std::error::Error;

use async_trait::async_trait;

/// A remote key-value source. Each service's whole configuration lives under a single key (the
/// namespace) as one encoded payload.
#[async_trait]
pub trait RemoteStore: Send + Sync + 'static {
    /// Point lookup of the raw payload stored under `key`.
    async fn get(&self, key: &str) -> Result<String, RemoteError>;

    /// Liveness check.
    async fn ping(&self) -> Result<(), RemoteError>;

    /// Release the connection. Later calls fail with [`RemoteError::Closed`].
    async fn close(&self) -> Result<(), RemoteError>;
}

#[derive(thiserror::Error, Debug)]
pub enum RemoteError {
    #[error("key `{0}` does not exist")]
    KeyMissing(String),
    #[error("connection is closed")]
    Closed,
    #[error(transparent)]
    Backend(Box<dyn Error + Send + Sync>),
}

impl RemoteError {
    /// Wrap a backend specific error.
    pub fn backend(error: impl Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(error))
    }
}
