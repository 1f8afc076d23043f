use std::{sync::Arc, time::Duration};

use async_trait::async_trait;

use crate::error::{GetError, LoadError, StartError};

/// Fetches the current state of configuration as a shared atomic snapshot. Implementors swap the
/// snapshot as a whole, so a caller holding the returned [`Arc`] keeps a consistent view no matter
/// how many refreshes happen in the meantime.
///
/// Callers should take a new snapshot when they reach a transactional boundary, e.g. at the
/// beginning of handling a request, and read every value they need for that unit of work from it.
pub trait ConfigFetcher<T> {
    /// Get a shared copy of the currently active configuration state.
    fn latest_snapshot(&self) -> Arc<T>;
}

/// Typed point lookups against the current configuration.
///
/// Values are parsed on demand. No coercion happens across types beyond parsing text, so a value
/// of `1` is not a valid bool.
pub trait ConfigGetter {
    fn get_int(&self, key: &str) -> Result<i64, GetError>;

    fn get_float(&self, key: &str) -> Result<f64, GetError>;

    fn get_string(&self, key: &str) -> Result<String, GetError>;

    fn get_bool(&self, key: &str) -> Result<bool, GetError>;

    /// Durations use the short-unit text form, e.g. `5s`, `100ms` or `1h30m`.
    fn get_duration(&self, key: &str) -> Result<Duration, GetError>;
}

/// Infallible variants of [`ConfigGetter`]. Any error, whether the key is missing or the value
/// can't be parsed, yields the provided default.
///
/// Implemented for every [`ConfigGetter`].
pub trait ConfigGetterWithDefault: ConfigGetter {
    fn get_int_with_default(&self, key: &str, default: i64) -> i64 {
        self.get_int(key).unwrap_or(default)
    }

    fn get_float_with_default(&self, key: &str, default: f64) -> f64 {
        self.get_float(key).unwrap_or(default)
    }

    fn get_string_with_default(&self, key: &str, default: &str) -> String {
        self.get_string(key).unwrap_or_else(|_| default.to_string())
    }

    fn get_bool_with_default(&self, key: &str, default: bool) -> bool {
        self.get_bool(key).unwrap_or(default)
    }

    fn get_duration_with_default(&self, key: &str, default: Duration) -> Duration {
        self.get_duration(key).unwrap_or(default)
    }
}

impl<T: ConfigGetter + ?Sized> ConfigGetterWithDefault for T {}

/// Controls how configuration is (re)loaded from its source.
#[async_trait]
pub trait ConfigLoader {
    /// Begin refreshing in the background every `interval`. The first refresh happens after one
    /// full interval has elapsed, not immediately.
    fn start_loading(&self, interval: Duration) -> Result<(), StartError>;

    /// Stop background refreshing and release the source. Returns once no refresh is in flight.
    async fn stop_loading(&self);

    /// Replace the current configuration with a fresh copy from the source. On error the current
    /// configuration is left untouched.
    async fn load_config(&self) -> Result<(), LoadError>;
}

/// A complete configuration store: loadable and readable.
pub trait ConfigManager: ConfigLoader + ConfigGetter + Send + Sync {}

impl<T: ConfigLoader + ConfigGetter + Send + Sync + ?Sized> ConfigManager for T {}
