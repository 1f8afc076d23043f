pub use hearsay_theories::{
    error::{GetError, LoadError, StartError},
    remote::RemoteError,
};

/// Error returned when a store can't be bound to its remote source. Configuration is usually
/// needed to start up, so callers typically treat this as fatal.
#[derive(thiserror::Error, Debug)]
pub enum ConstructionError {
    #[error("invalid connection options for `{addr}`: {source}")]
    InvalidOptions {
        addr: String,
        #[source]
        source: redis::RedisError,
    },
    #[error("failed to connect to `{addr}`: {source}")]
    Connect {
        addr: String,
        #[source]
        source: RemoteError,
    },
    #[error("remote source for `{namespace}` is unreachable: {source}")]
    Unreachable {
        namespace: String,
        #[source]
        source: RemoteError,
    },
}
