//! Errors shared by every store implementation.

use std::error::Error;

use crate::remote::RemoteError;

/// Error returned by the typed getters of [`ConfigGetter`][crate::config::ConfigGetter].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GetError {
    #[error("key `{0}` not found")]
    NotFound(String),
    #[error("value `{value}` of key `{key}` is not a valid {expected}")]
    Parse {
        key: String,
        value: String,
        expected: &'static str,
    },
    #[error("key `{key}` holds a {found}, expected a {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Error returned when a refresh fails. The previous configuration stays active.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("failed to retrieve config `{namespace}`: {source}")]
    Retrieval {
        namespace: String,
        #[source]
        source: RemoteError,
    },
    #[error("failed to decode config `{namespace}`: {source}")]
    Decode {
        namespace: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

/// Error returned when background loading can't be started.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StartError {
    #[error("background loading is already running")]
    AlreadyRunning,
    #[error("background loading was stopped and can't be restarted")]
    Stopped,
    #[error("refresh interval must be greater than zero")]
    ZeroInterval,
    #[error("background loading must be started from within a tokio runtime")]
    NoRuntime,
}
