//! Redis as the remote source of configuration.

use std::time::Duration;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use redis::{
    aio::{ConnectionManager, ConnectionManagerConfig},
    AsyncCommands, Client, IntoConnectionInfo,
};
use serde::Deserialize;
use serde_with::{serde_as, DurationMilliSeconds};

use crate::error::ConstructionError;

pub use hearsay_theories::remote::{RemoteError, RemoteStore};

/// Connection parameters for [`RedisRemote`]. Deserializable so it can be embedded in an
/// application's own config file; missing fields take the values of [`RedisOptions::default`].
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RedisOptions {
    /// `host:port` of the server.
    pub addr: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub db: i64,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub connection_timeout: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub response_timeout: Duration,
}

impl Default for RedisOptions {
    fn default() -> Self {
        Self {
            addr: "localhost:6379".to_string(),
            username: None,
            password: None,
            db: 0,
            connection_timeout: Duration::from_secs(5),
            response_timeout: Duration::from_secs(3),
        }
    }
}

/// A [`RemoteStore`] backed by a multiplexed, auto-reconnecting Redis connection.
pub struct RedisRemote {
    connection: ArcSwapOption<ConnectionManager>,
}

impl RedisRemote {
    /// Open a connection described by `options`. This does not check liveness, use
    /// [`RemoteStore::ping`] for that.
    pub async fn connect(options: &RedisOptions) -> Result<Self, ConstructionError> {
        let mut info = format!("redis://{}", options.addr)
            .into_connection_info()
            .map_err(|source| ConstructionError::InvalidOptions {
                addr: options.addr.clone(),
                source,
            })?;
        info.redis.db = options.db;
        info.redis.username = options.username.clone();
        info.redis.password = options.password.clone();

        let client = Client::open(info).map_err(|source| ConstructionError::InvalidOptions {
            addr: options.addr.clone(),
            source,
        })?;
        let config = ConnectionManagerConfig::new()
            .set_connection_timeout(options.connection_timeout)
            .set_response_timeout(options.response_timeout);
        let connection = ConnectionManager::new_with_config(client, config)
            .await
            .map_err(|source| ConstructionError::Connect {
                addr: options.addr.clone(),
                source: RemoteError::backend(source),
            })?;

        tracing::debug!(addr = %options.addr, db = options.db, "Connected to redis");
        Ok(Self {
            connection: ArcSwapOption::from_pointee(connection),
        })
    }

    // Handles are cheap clones sharing one multiplexed connection.
    fn connection(&self) -> Result<ConnectionManager, RemoteError> {
        self.connection
            .load_full()
            .map(|connection| ConnectionManager::clone(&connection))
            .ok_or(RemoteError::Closed)
    }
}

#[async_trait]
impl RemoteStore for RedisRemote {
    async fn get(&self, key: &str) -> Result<String, RemoteError> {
        let mut connection = self.connection()?;
        let value: Option<String> = connection.get(key).await.map_err(RemoteError::backend)?;

        value.ok_or_else(|| RemoteError::KeyMissing(key.to_string()))
    }

    async fn ping(&self) -> Result<(), RemoteError> {
        let mut connection = self.connection()?;
        let _: String = redis::cmd("PING")
            .query_async(&mut connection)
            .await
            .map_err(RemoteError::backend)?;

        Ok(())
    }

    async fn close(&self) -> Result<(), RemoteError> {
        // Dropping the last handle closes the underlying connection.
        match self.connection.swap(None) {
            Some(_connection) => Ok(()),
            None => Err(RemoteError::Closed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_default_to_local_server() {
        let options: RedisOptions = serde_json::from_str("{}").unwrap();

        assert_eq!(RedisOptions::default(), options);
        assert_eq!("localhost:6379", options.addr);
    }

    #[test]
    fn options_read_timeouts_as_milliseconds() {
        let options: RedisOptions = serde_json::from_str(
            r#"{"addr":"cache:6380","db":2,"password":"secret","connection_timeout":250}"#,
        )
        .unwrap();

        assert_eq!("cache:6380", options.addr);
        assert_eq!(2, options.db);
        assert_eq!(Some("secret".to_string()), options.password);
        assert_eq!(Duration::from_millis(250), options.connection_timeout);
        assert_eq!(Duration::from_secs(3), options.response_timeout);
    }

    #[test]
    fn options_reject_unknown_fields() {
        assert!(serde_json::from_str::<RedisOptions>(r#"{"host":"cache"}"#).is_err());
    }

    #[tokio::test]
    async fn invalid_address_is_rejected_before_connecting() {
        let options = RedisOptions {
            addr: "localhost:not-a-port".to_string(),
            ..Default::default()
        };

        assert!(matches!(
            RedisRemote::connect(&options).await,
            Err(ConstructionError::InvalidOptions { .. })
        ));
    }
}
