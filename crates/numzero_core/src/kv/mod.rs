//! Key-value primitives the store is built on.
//!
//! # Responsibility
//! - Define the small hash/list command set the store needs from a backend.
//! - Provide Redis and embedded SQLite implementations of that set.
//!
//! # Invariants
//! - A missing hash field is reported as `Ok(None)`, never as an error.
//! - `KvBackend::connect` only returns connections that answered a ping.
//! - Lists are read newest-first: `list_push_front` prepends and
//!   `list_range(key, 0, n)` returns the `n` most recent values.

use crate::db::DbError;
use std::collections::BTreeMap;
use thiserror::Error;

pub mod keys;
mod redis_backend;
mod sqlite_backend;

pub use redis_backend::{RedisBackend, RedisConnection};
pub use sqlite_backend::{SqliteBackend, SqliteConnection};

pub type KvResult<T> = Result<T, KvError>;

/// Failure reported by a key-value backend.
#[derive(Debug, Error)]
pub enum KvError {
    #[error("redis: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("connection pool: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("sqlite: {0}")]
    Db(#[from] DbError),
    #[error("unexpected ping reply `{0}`")]
    UnexpectedPing(String),
    #[error("connection lock poisoned")]
    Poisoned,
}

impl From<rusqlite::Error> for KvError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Factory for live connections to one key-value service.
pub trait KvBackend: Send + Sync {
    type Connection: KvConnection;

    /// Short name used in log events.
    fn name(&self) -> &'static str;

    /// Opens a connection and pings it before returning.
    fn connect(&self) -> KvResult<Self::Connection>;
}

/// Hash and list commands over one open connection.
///
/// Implementations must be usable from many threads at once.
pub trait KvConnection: Send + Sync {
    fn ping(&self) -> KvResult<()>;

    /// Sets `field` in the hash `collection`, replacing any previous value.
    fn hash_set(&self, collection: &str, field: &str, value: &str) -> KvResult<()>;

    fn hash_get(&self, collection: &str, field: &str) -> KvResult<Option<String>>;

    /// Returns every field of `collection`, ordered by field.
    fn hash_entries(&self, collection: &str) -> KvResult<BTreeMap<String, String>>;

    fn list_push_front(&self, key: &str, value: &str) -> KvResult<()>;

    /// Returns at most `limit` values starting `offset` positions from the front.
    fn list_range(&self, key: &str, offset: usize, limit: usize) -> KvResult<Vec<String>>;

    /// Removes `key` whatever it holds. Missing keys are not an error.
    fn delete(&self, key: &str) -> KvResult<()>;

    /// Removes every hash and list.
    fn flush(&self) -> KvResult<()>;
}
