//! Shared utilities for the integration tests.

use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use hearsay::remote::{RemoteError, RemoteStore};
use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

#[allow(dead_code)]
pub const SERVICE_CONFIG: &str = r#"{"int_key":42,"float_key":2.75,"string_key":"test_value","bool_key":true,"duration_key":"5s"}"#;

/// Install a subscriber writing through the test harness. Set `RUST_LOG` to see refresh logs.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// An in-process [`RemoteStore`] whose payload, availability and latency can be changed while a
/// store is using it. Clones share state.
#[derive(Clone, Default)]
pub struct FakeRemote {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    payload: Mutex<Option<String>>,
    latency: Mutex<Duration>,
    unreachable: AtomicBool,
    gets: AtomicUsize,
    closes: AtomicUsize,
}

#[allow(dead_code)]
impl FakeRemote {
    pub fn with_payload(payload: &str) -> Self {
        let remote = Self::default();
        remote.set_payload(payload);
        remote
    }

    pub fn unreachable() -> Self {
        let remote = Self::default();
        remote.set_reachable(false);
        remote
    }

    pub fn set_payload(&self, payload: &str) {
        *self.inner.payload.lock() = Some(payload.to_string());
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.inner.unreachable.store(!reachable, Ordering::SeqCst);
    }

    pub fn set_latency(&self, latency: Duration) {
        *self.inner.latency.lock() = latency;
    }

    pub fn gets(&self) -> usize {
        self.inner.gets.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.inner.closes.load(Ordering::SeqCst)
    }

    fn check_reachable(&self) -> Result<(), RemoteError> {
        if self.inner.unreachable.load(Ordering::SeqCst) {
            Err(RemoteError::backend(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RemoteStore for FakeRemote {
    async fn get(&self, key: &str) -> Result<String, RemoteError> {
        self.inner.gets.fetch_add(1, Ordering::SeqCst);

        let latency = *self.inner.latency.lock();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        self.check_reachable()?;
        self.inner
            .payload
            .lock()
            .clone()
            .ok_or_else(|| RemoteError::KeyMissing(key.to_string()))
    }

    async fn ping(&self) -> Result<(), RemoteError> {
        self.check_reachable()
    }

    async fn close(&self) -> Result<(), RemoteError> {
        self.inner.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
