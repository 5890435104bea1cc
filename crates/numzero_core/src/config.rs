//! Backend connection settings.
//!
//! # Responsibility
//! - Describe how to reach each key-value backend.
//! - Provide defaults matching a local development setup.

use redis::{ConnectionInfo, IntoConnectionInfo, RedisResult};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_REDIS_ADDR: &str = "127.0.0.1:6379";
pub const DEFAULT_POOL_SIZE: u32 = 10;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings for the Redis backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisConfig {
    /// `host:port` of the Redis server.
    pub addr: String,
    /// Optional `AUTH` password; empty means none.
    pub password: Option<String>,
    /// Logical database index selected on connect.
    pub db: i64,
    /// Fixed number of pooled connections.
    pub pool_size: u32,
    /// How long connect (and the initial ping) may wait for the server.
    pub connect_timeout: Duration,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_REDIS_ADDR.to_string(),
            password: None,
            db: 0,
            pool_size: DEFAULT_POOL_SIZE,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl RedisConfig {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            ..Self::default()
        }
    }

    /// Connection settings understood by the `redis` client.
    ///
    /// The password is set on the parsed settings, not spliced into a URL.
    pub fn connection_info(&self) -> RedisResult<ConnectionInfo> {
        let mut info = format!("redis://{}", self.addr)
            .as_str()
            .into_connection_info()?;
        info.redis.db = self.db;
        info.redis.password = self
            .password
            .clone()
            .filter(|password| !password.is_empty());
        Ok(info)
    }
}

/// Settings for the embedded SQLite backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqliteConfig {
    /// Database file; `None` keeps everything in memory for the lifetime of
    /// the open connection.
    pub path: Option<PathBuf>,
}

impl SqliteConfig {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn in_memory() -> Self {
        Self::default()
    }
}
