//! Embedded SQLite implementation of the key-value primitives.
//!
//! Hashes live in `kv_hashes (collection, field, value)`; lists live in
//! `kv_lists (seq, key, value)` where a higher `seq` is nearer the front.
//!
//! # Invariants
//! - One SQLite connection per open handle, serialized behind a mutex.
//! - In-memory databases are private to the handle and vanish when it drops.

use super::{KvBackend, KvConnection, KvError, KvResult};
use crate::config::SqliteConfig;
use crate::db::{open_db, open_db_in_memory};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Opens SQLite databases described by `SqliteConfig`.
#[derive(Debug, Clone, Default)]
pub struct SqliteBackend {
    config: SqliteConfig,
}

impl SqliteBackend {
    pub fn new(config: SqliteConfig) -> Self {
        Self { config }
    }

    pub fn in_memory() -> Self {
        Self::new(SqliteConfig::in_memory())
    }
}

impl KvBackend for SqliteBackend {
    type Connection = SqliteConnection;

    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn connect(&self) -> KvResult<SqliteConnection> {
        let conn = match &self.config.path {
            Some(path) => open_db(path)?,
            None => open_db_in_memory()?,
        };
        let connection = SqliteConnection {
            conn: Mutex::new(conn),
        };
        connection.ping()?;
        Ok(connection)
    }
}

/// Open SQLite database handle.
pub struct SqliteConnection {
    conn: Mutex<Connection>,
}

impl SqliteConnection {
    fn with_conn<T>(&self, f: impl FnOnce(&mut Connection) -> rusqlite::Result<T>) -> KvResult<T> {
        let mut conn = self.conn.lock().map_err(|_| KvError::Poisoned)?;
        Ok(f(&mut conn)?)
    }
}

impl KvConnection for SqliteConnection {
    fn ping(&self) -> KvResult<()> {
        self.with_conn(|conn| conn.query_row("SELECT 1;", [], |row| row.get::<_, i64>(0)))?;
        Ok(())
    }

    fn hash_set(&self, collection: &str, field: &str, value: &str) -> KvResult<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv_hashes (collection, field, value) VALUES (?1, ?2, ?3)
                 ON CONFLICT (collection, field) DO UPDATE SET value = excluded.value;",
                params![collection, field, value],
            )
        })?;
        Ok(())
    }

    fn hash_get(&self, collection: &str, field: &str) -> KvResult<Option<String>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT value FROM kv_hashes WHERE collection = ?1 AND field = ?2;",
                params![collection, field],
                |row| row.get::<_, String>(0),
            )
            .optional()
        })
    }

    fn hash_entries(&self, collection: &str) -> KvResult<BTreeMap<String, String>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT field, value FROM kv_hashes WHERE collection = ?1;")?;
            let rows = stmt.query_map([collection], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;
            rows.collect()
        })
    }

    fn list_push_front(&self, key: &str, value: &str) -> KvResult<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv_lists (key, value) VALUES (?1, ?2);",
                params![key, value],
            )
        })?;
        Ok(())
    }

    fn list_range(&self, key: &str, offset: usize, limit: usize) -> KvResult<Vec<String>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT value FROM kv_lists WHERE key = ?1
                 ORDER BY seq DESC LIMIT ?2 OFFSET ?3;",
            )?;
            let rows =
                stmt.query_map(params![key, limit, offset], |row| row.get::<_, String>(0))?;
            rows.collect()
        })
    }

    fn delete(&self, key: &str) -> KvResult<()> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM kv_hashes WHERE collection = ?1;", [key])?;
            tx.execute("DELETE FROM kv_lists WHERE key = ?1;", [key])?;
            tx.commit()
        })
    }

    fn flush(&self) -> KvResult<()> {
        self.with_conn(|conn| {
            conn.execute_batch(
                "BEGIN;
                 DELETE FROM kv_hashes;
                 DELETE FROM kv_lists;
                 COMMIT;",
            )
        })
    }
}
