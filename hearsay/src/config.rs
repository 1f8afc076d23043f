//! # Config
//!
//! The traits every store implements, and helpers for sharing snapshot access.
//!
//! ## Reading Values
//!
//! Stores implement [`ConfigGetter`] for typed lookups that report why a value is unavailable, and
//! get [`ConfigGetterWithDefault`] for free for the common case where a fallback is acceptable.
//! Code that reads configuration should depend on these traits (or on [`ConfigManager`] when it
//! also drives loading) rather than on a concrete store, so tests can swap in an
//! [`InMemoryConfigManager`][crate::memory::InMemoryConfigManager].
//!
//! ## Snapshots
//!
//! The refreshed store never edits configuration in place. Each refresh builds a complete
//! [`Snapshot`][crate::snapshot::Snapshot] and swaps the store's pointer to it, so the critical
//! section is a single pointer update. Getters called on the store always read the latest
//! snapshot. When several values must agree with each other, e.g. for the duration of one
//! request, take a snapshot through [`ConfigFetcher::latest_snapshot`] and read all of them from
//! it: a snapshot also implements [`ConfigGetter`] and never changes.
//!
//! ```rust
//! # use std::{collections::HashMap, time::SystemTime};
//! # use hearsay::snapshot::Snapshot;
//! use hearsay::config::{shared_fetcher_from_fn, ConfigGetter, SharedConfigFetcher};
//!
//! fn handle_request(fetcher: &SharedConfigFetcher<Snapshot>) -> i64 {
//!     let config = fetcher.latest_snapshot();
//!     let base = config.get_int("base").unwrap_or(0);
//!     let bonus = config.get_int("bonus").unwrap_or(0);
//!     base + bonus
//! }
//!
//! let snapshot = std::sync::Arc::new(Snapshot::new(
//!     HashMap::from([("base".to_string(), "40".to_string()), ("bonus".to_string(), "2".to_string())]),
//!     SystemTime::now(),
//! ));
//! let fetcher = shared_fetcher_from_fn(move || snapshot.clone());
//! assert_eq!(42, handle_request(&fetcher));
//! ```

use std::{marker::PhantomData, sync::Arc};

pub use hearsay_theories::config::{
    ConfigFetcher, ConfigGetter, ConfigGetterWithDefault, ConfigLoader, ConfigManager,
};

/// A shared instance of a `ConfigFetcher` that can be handed across threads.
pub type SharedConfigFetcher<T> = Arc<dyn ConfigFetcher<T> + Send + Sync>;

/// Constructs a [`SharedConfigFetcher`] from a closure that returns the latest snapshot.
pub fn shared_fetcher_from_fn<
    T: Send + Sync + 'static,
    F: Fn() -> Arc<T> + Send + Sync + 'static,
>(
    fetcher: F,
) -> SharedConfigFetcher<T> {
    Arc::new(BoxedFetcher {
        inner: fetcher,
        phantom: PhantomData {},
    })
}

struct BoxedFetcher<T, F: Fn() -> Arc<T>> {
    inner: F,
    phantom: PhantomData<T>,
}

impl<T, F: Fn() -> Arc<T>> ConfigFetcher<T> for BoxedFetcher<T, F> {
    fn latest_snapshot(&self) -> Arc<T> {
        (self.inner)()
    }
}
