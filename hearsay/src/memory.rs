//! A fixed, in-memory store for tests and local development.

use std::{collections::HashMap, fmt, time::Duration};

use async_trait::async_trait;
use hearsay_theories::{
    config::{ConfigGetter, ConfigLoader},
    error::{GetError, LoadError, StartError},
};

use crate::duration::format_duration;

/// A typed configuration value held by [`InMemoryConfigManager`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Duration(Duration),
}

impl Value {
    fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
            Value::Duration(_) => "duration",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value}"),
            Value::String(value) => f.write_str(value),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Duration(value) => f.write_str(&format_duration(*value)),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<Duration> for Value {
    fn from(value: Duration) -> Self {
        Value::Duration(value)
    }
}

/// Serves a fixed set of typed values. Values are returned only when requested as the type they
/// were stored as, and loading is a no-op.
///
/// ```rust
/// # use std::time::Duration;
/// use hearsay::config::{ConfigGetter, ConfigGetterWithDefault};
/// use hearsay::memory::InMemoryConfigManager;
///
/// let config = InMemoryConfigManager::from_iter([
///     ("workers", 4.into()),
///     ("timeout", Duration::from_secs(5).into()),
/// ]);
///
/// assert_eq!(Ok(4), config.get_int("workers"));
/// assert_eq!(Duration::from_secs(5), config.get_duration_with_default("timeout", Duration::ZERO));
/// assert!(config.get_string("workers").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryConfigManager {
    data: HashMap<String, Value>,
}

impl InMemoryConfigManager {
    pub fn new(data: HashMap<String, Value>) -> Self {
        Self { data }
    }

    fn typed<T>(
        &self,
        key: &str,
        expected: &'static str,
        extract: impl FnOnce(&Value) -> Option<T>,
    ) -> Result<T, GetError> {
        let value = self
            .data
            .get(key)
            .ok_or_else(|| GetError::NotFound(key.to_string()))?;

        extract(value).ok_or_else(|| GetError::TypeMismatch {
            key: key.to_string(),
            expected,
            found: value.kind(),
        })
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for InMemoryConfigManager {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl ConfigGetter for InMemoryConfigManager {
    fn get_int(&self, key: &str) -> Result<i64, GetError> {
        self.typed(key, "int", |value| match value {
            Value::Int(value) => Some(*value),
            _ => None,
        })
    }

    fn get_float(&self, key: &str) -> Result<f64, GetError> {
        self.typed(key, "float", |value| match value {
            Value::Float(value) => Some(*value),
            _ => None,
        })
    }

    fn get_string(&self, key: &str) -> Result<String, GetError> {
        self.typed(key, "string", |value| match value {
            Value::String(value) => Some(value.clone()),
            _ => None,
        })
    }

    fn get_bool(&self, key: &str) -> Result<bool, GetError> {
        self.typed(key, "bool", |value| match value {
            Value::Bool(value) => Some(*value),
            _ => None,
        })
    }

    fn get_duration(&self, key: &str) -> Result<Duration, GetError> {
        self.typed(key, "duration", |value| match value {
            Value::Duration(value) => Some(*value),
            _ => None,
        })
    }
}

#[async_trait]
impl ConfigLoader for InMemoryConfigManager {
    fn start_loading(&self, _interval: Duration) -> Result<(), StartError> {
        Ok(())
    }

    async fn stop_loading(&self) {}

    async fn load_config(&self) -> Result<(), LoadError> {
        Ok(())
    }
}
