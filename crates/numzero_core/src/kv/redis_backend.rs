//! Redis implementation of the key-value primitives.
//!
//! # Invariants
//! - One `r2d2` pool of `RedisConfig::pool_size` connections per open
//!   connection handle; pooled connections are shared by all callers.
//! - Redis `nil` replies for hash reads become `None`.

use super::{KvBackend, KvConnection, KvError, KvResult};
use crate::config::RedisConfig;
use log::{error, info};
use r2d2::{Pool, PooledConnection};
use redis::{Client, Commands};
use std::collections::BTreeMap;
use std::time::Instant;

/// Connects to a Redis server described by `RedisConfig`.
pub struct RedisBackend {
    config: RedisConfig,
    client: Client,
}

impl RedisBackend {
    /// Validates the connection settings. Does not contact the server.
    pub fn new(config: RedisConfig) -> KvResult<Self> {
        let client = Client::open(config.connection_info()?)?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &RedisConfig {
        &self.config
    }
}

impl KvBackend for RedisBackend {
    type Connection = RedisConnection;

    fn name(&self) -> &'static str {
        "redis"
    }

    fn connect(&self) -> KvResult<RedisConnection> {
        let started_at = Instant::now();
        let addr = self.config.addr.as_str();
        info!("event=kv_connect module=kv backend=redis status=start addr={addr}");

        let connected = Pool::builder()
            .max_size(self.config.pool_size)
            .connection_timeout(self.config.connect_timeout)
            .build(self.client.clone())
            .map_err(KvError::from)
            .map(|pool| RedisConnection { pool })
            .and_then(|connection| connection.ping().map(|()| connection));

        match connected {
            Ok(connection) => {
                info!(
                    "event=kv_connect module=kv backend=redis status=ok addr={addr} pool_size={} duration_ms={}",
                    self.config.pool_size,
                    started_at.elapsed().as_millis()
                );
                Ok(connection)
            }
            Err(err) => {
                error!(
                    "event=kv_connect module=kv backend=redis status=error addr={addr} duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }
}

/// Pooled connection handle to a Redis server.
pub struct RedisConnection {
    pool: Pool<Client>,
}

impl RedisConnection {
    fn conn(&self) -> KvResult<PooledConnection<Client>> {
        Ok(self.pool.get()?)
    }
}

impl KvConnection for RedisConnection {
    fn ping(&self) -> KvResult<()> {
        let mut conn = self.conn()?;
        let reply: String = redis::cmd("PING").query(&mut *conn)?;
        if reply != "PONG" {
            return Err(KvError::UnexpectedPing(reply));
        }
        Ok(())
    }

    fn hash_set(&self, collection: &str, field: &str, value: &str) -> KvResult<()> {
        let mut conn = self.conn()?;
        let _: () = conn.hset(collection, field, value)?;
        Ok(())
    }

    fn hash_get(&self, collection: &str, field: &str) -> KvResult<Option<String>> {
        let mut conn = self.conn()?;
        Ok(conn.hget(collection, field)?)
    }

    fn hash_entries(&self, collection: &str) -> KvResult<BTreeMap<String, String>> {
        let mut conn = self.conn()?;
        Ok(conn.hgetall(collection)?)
    }

    fn list_push_front(&self, key: &str, value: &str) -> KvResult<()> {
        let mut conn = self.conn()?;
        let _: () = conn.lpush(key, value)?;
        Ok(())
    }

    fn list_range(&self, key: &str, offset: usize, limit: usize) -> KvResult<Vec<String>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        // LRANGE bounds are inclusive; a negative stop would mean "from the end".
        let start = isize::try_from(offset).unwrap_or(isize::MAX);
        let stop = start.saturating_add(isize::try_from(limit - 1).unwrap_or(isize::MAX));
        let mut conn = self.conn()?;
        Ok(conn.lrange(key, start, stop)?)
    }

    fn delete(&self, key: &str) -> KvResult<()> {
        let mut conn = self.conn()?;
        let _: () = conn.del(key)?;
        Ok(())
    }

    fn flush(&self) -> KvResult<()> {
        let mut conn = self.conn()?;
        redis::cmd("FLUSHDB").query::<()>(&mut *conn)?;
        Ok(())
    }
}
