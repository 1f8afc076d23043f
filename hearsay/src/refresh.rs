//! A store that serves typed values from the last snapshot pulled from a [`RemoteStore`], and
//! optionally keeps that snapshot fresh from a background task.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ──start_loading──▶ Running ──stop_loading──▶ Stopped
//!   └──────────────────stop_loading──────────────────▲
//! ```
//!
//! `Stopped` is terminal: the remote connection is closed on the way there and a new store has to
//! be constructed to load again.

use std::{
    sync::Arc,
    time::{Duration, SystemTime},
};

use arc_swap::ArcSwap;
use async_trait::async_trait;
use hearsay_theories::{
    config::{ConfigFetcher, ConfigGetter, ConfigLoader},
    error::{GetError, LoadError, StartError},
    remote::RemoteStore,
};
use parking_lot::Mutex;
use tokio::{
    runtime::Handle,
    sync::OnceCell,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    config::{shared_fetcher_from_fn, SharedConfigFetcher},
    error::ConstructionError,
    remote::{RedisOptions, RedisRemote},
    snapshot::Snapshot,
};

/// Serves configuration for one namespace of a remote key-value source.
///
/// Reads never wait on the network: every getter parses a value out of the current [`Snapshot`],
/// and a refresh swaps in a whole new snapshot only once it has been fetched and decoded. A
/// reader racing a refresh sees either the old or the new snapshot in full. A failed refresh
/// leaves the current snapshot in place.
///
/// ```rust,no_run
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// use std::time::Duration;
/// use hearsay::config::{ConfigGetter, ConfigGetterWithDefault, ConfigLoader};
/// use hearsay::refresh::RefreshingConfigManager;
/// use hearsay::remote::RedisOptions;
///
/// let config = RefreshingConfigManager::connect("svc", &RedisOptions::default()).await?;
/// config.load_config().await?;
/// config.start_loading(Duration::from_secs(30))?;
///
/// let workers = config.get_int_with_default("workers", 4);
/// let timeout = config.get_duration("timeout")?;
///
/// config.stop_loading().await;
/// # Ok(())
/// # }
/// ```
pub struct RefreshingConfigManager<R = RedisRemote> {
    shared: Arc<Shared<R>>,
    state: Mutex<LoaderState>,
    cancel: CancellationToken,
    stopped: OnceCell<()>,
}

/// State shared with the background task.
struct Shared<R> {
    namespace: String,
    remote: R,
    snapshot: ArcSwap<Snapshot>,
}

enum LoaderState {
    Idle,
    Running(JoinHandle<()>),
    Stopped,
}

/// Where a [`RefreshingConfigManager`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderStatus {
    Idle,
    Running,
    Stopped,
}

impl RefreshingConfigManager<RedisRemote> {
    /// Connect to Redis and bind to the configuration stored under `namespace`.
    pub async fn connect(
        namespace: impl Into<String>,
        options: &RedisOptions,
    ) -> Result<Self, ConstructionError> {
        let remote = RedisRemote::connect(options).await?;
        Self::new(namespace, remote).await
    }
}

impl<R: RemoteStore> RefreshingConfigManager<R> {
    /// Bind to the configuration stored under `namespace` in `remote`. The remote is pinged first
    /// and an unreachable remote is an error. The store starts out empty, call
    /// [`load_config`][ConfigLoader::load_config] or [`start_loading`][ConfigLoader::start_loading]
    /// to populate it.
    pub async fn new(namespace: impl Into<String>, remote: R) -> Result<Self, ConstructionError> {
        let namespace = namespace.into();
        if let Err(source) = remote.ping().await {
            return Err(ConstructionError::Unreachable { namespace, source });
        }

        info!(namespace = %namespace, "Bound config manager to remote source");
        Ok(Self {
            shared: Arc::new(Shared {
                namespace,
                remote,
                snapshot: ArcSwap::from_pointee(Snapshot::default()),
            }),
            state: Mutex::new(LoaderState::Idle),
            cancel: CancellationToken::new(),
            stopped: OnceCell::new(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.shared.namespace
    }

    /// Completion time of the last successful refresh, `None` if there hasn't been one.
    pub fn updated_at(&self) -> Option<SystemTime> {
        self.shared.snapshot.load().updated_at()
    }

    pub fn status(&self) -> LoaderStatus {
        match *self.state.lock() {
            LoaderState::Idle => LoaderStatus::Idle,
            LoaderState::Running(_) => LoaderStatus::Running,
            LoaderState::Stopped => LoaderStatus::Stopped,
        }
    }

    async fn shut_down(&self) {
        let previous = std::mem::replace(&mut *self.state.lock(), LoaderState::Stopped);

        self.cancel.cancel();
        if let LoaderState::Running(task) = previous {
            if let Err(error) = task.await {
                warn!(namespace = %self.shared.namespace, %error, "Config refresh task panicked");
            }
        }

        // Only after the task has exited, so no refresh can race the close.
        if let Err(error) = self.shared.remote.close().await {
            warn!(namespace = %self.shared.namespace, %error, "Failed to close remote source");
        }

        info!(namespace = %self.shared.namespace, "Stopped background config refresh");
    }

    /// A fetcher that outlives borrows of this store, for handing to code that only needs to read
    /// snapshots.
    pub fn fetcher(&self) -> SharedConfigFetcher<Snapshot> {
        let shared = self.shared.clone();
        shared_fetcher_from_fn(move || shared.snapshot.load_full())
    }
}

impl<R: RemoteStore> Shared<R> {
    async fn load(&self) -> Result<(), LoadError> {
        let payload = self
            .remote
            .get(&self.namespace)
            .await
            .map_err(|source| LoadError::Retrieval {
                namespace: self.namespace.clone(),
                source,
            })?;
        let snapshot =
            Snapshot::decode(&payload, SystemTime::now()).map_err(|e| LoadError::Decode {
                namespace: self.namespace.clone(),
                source: Box::new(e),
            })?;

        let keys = snapshot.len();
        self.snapshot.store(Arc::new(snapshot));
        debug!(namespace = %self.namespace, keys, "Replaced config snapshot");

        Ok(())
    }
}

async fn refresh_loop<R: RemoteStore>(
    shared: Arc<Shared<R>>,
    period: Duration,
    cancel: CancellationToken,
) {
    // First tick after one full period rather than immediately.
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                // An in-flight refresh always runs to completion, cancellation is only observed
                // between ticks.
                if let Err(error) = shared.load().await {
                    warn!(
                        namespace = %shared.namespace,
                        %error,
                        "Config refresh failed, keeping previous snapshot"
                    );
                }
            }
        }
    }

    debug!(namespace = %shared.namespace, "Config refresh loop exited");
}

#[async_trait]
impl<R: RemoteStore> ConfigLoader for RefreshingConfigManager<R> {
    fn start_loading(&self, interval: Duration) -> Result<(), StartError> {
        if interval.is_zero() {
            return Err(StartError::ZeroInterval);
        }
        let runtime = Handle::try_current().map_err(|_| StartError::NoRuntime)?;

        let mut state = self.state.lock();
        match *state {
            LoaderState::Idle => {}
            LoaderState::Running(_) => return Err(StartError::AlreadyRunning),
            LoaderState::Stopped => return Err(StartError::Stopped),
        }

        let task = refresh_loop(self.shared.clone(), interval, self.cancel.clone());
        *state = LoaderState::Running(runtime.spawn(task));

        info!(namespace = %self.shared.namespace, ?interval, "Started background config refresh");
        Ok(())
    }

    async fn stop_loading(&self) {
        // Every caller, concurrent or later, waits on the one shutdown.
        self.stopped.get_or_init(|| self.shut_down()).await;
    }

    async fn load_config(&self) -> Result<(), LoadError> {
        self.shared.load().await
    }
}

impl<R> ConfigGetter for RefreshingConfigManager<R> {
    fn get_int(&self, key: &str) -> Result<i64, GetError> {
        self.shared.snapshot.load().get_int(key)
    }

    fn get_float(&self, key: &str) -> Result<f64, GetError> {
        self.shared.snapshot.load().get_float(key)
    }

    fn get_string(&self, key: &str) -> Result<String, GetError> {
        self.shared.snapshot.load().get_string(key)
    }

    fn get_bool(&self, key: &str) -> Result<bool, GetError> {
        self.shared.snapshot.load().get_bool(key)
    }

    fn get_duration(&self, key: &str) -> Result<Duration, GetError> {
        self.shared.snapshot.load().get_duration(key)
    }
}

impl<R> ConfigFetcher<Snapshot> for RefreshingConfigManager<R> {
    fn latest_snapshot(&self) -> Arc<Snapshot> {
        self.shared.snapshot.load_full()
    }
}

impl<R> Drop for RefreshingConfigManager<R> {
    // Lets a still running task wind down if the store is dropped without being stopped.
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
