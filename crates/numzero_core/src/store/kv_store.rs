//! Store implementation over key-value primitives.
//!
//! # Responsibility
//! - Map entities onto the `events`, `players` and `rules` hash collections.
//! - Maintain the `players:<name>:events` index next to event records.
//! - Own the single shared backend connection and its open/closed state.
//!
//! # Invariants
//! - Keys are canonicalized through `kv::keys` before every backend call.
//! - The connection slot is only replaced while holding its mutex, so callers
//!   never observe a half-opened connection.
//! - No operation retries; every backend error reaches the caller.

use super::{
    EventRepository, PlayerEventIndex, PlayerRepository, RuleRepository, Store, StoreError,
    StoreResult,
};
use crate::config::{RedisConfig, SqliteConfig};
use crate::kv::keys::{self, EVENTS, PLAYERS, RULES};
use crate::kv::{KvBackend, KvConnection, RedisBackend, SqliteBackend};
use crate::model::{Event, EventId, Player, Rule};
use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use uuid::Uuid;

/// Store backed by any `KvBackend`.
pub struct KvStore<B: KvBackend> {
    backend: B,
    conn: Mutex<Option<Arc<B::Connection>>>,
}

impl<B: KvBackend> KvStore<B> {
    /// Creates a store after checking that the backend answers.
    ///
    /// The probe connection is closed again; the first operation (or `open`)
    /// establishes the connection the store keeps.
    ///
    /// # Errors
    /// - Returns `StoreError::Backend` when the backend cannot be reached.
    pub fn new(backend: B) -> StoreResult<Self> {
        let store = Self {
            backend,
            conn: Mutex::new(None),
        };

        store.open()?;
        store.close();

        Ok(store)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_open(&self) -> bool {
        self.slot().is_some()
    }

    // Option<Arc<_>> carries no invariant a panicking holder could break.
    fn slot(&self) -> MutexGuard<'_, Option<Arc<B::Connection>>> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the open connection, opening one if the store is closed.
    fn connection(&self) -> StoreResult<Arc<B::Connection>> {
        let mut slot = self.slot();
        if let Some(conn) = slot.as_ref() {
            return Ok(Arc::clone(conn));
        }

        let started_at = Instant::now();
        let conn = match self.backend.connect() {
            Ok(conn) => Arc::new(conn),
            Err(err) => {
                error!(
                    "event=store_open module=store status=error backend={} duration_ms={} error={err}",
                    self.backend.name(),
                    started_at.elapsed().as_millis()
                );
                return Err(err.into());
            }
        };
        info!(
            "event=store_open module=store status=ok backend={} duration_ms={}",
            self.backend.name(),
            started_at.elapsed().as_millis()
        );

        *slot = Some(Arc::clone(&conn));
        Ok(conn)
    }

    fn save<T: Serialize>(&self, collection: &str, key: &str, value: &T) -> StoreResult<()> {
        let json = serde_json::to_string(value)?;
        self.connection()?.hash_set(collection, key, &json)?;
        Ok(())
    }

    fn get<T: DeserializeOwned>(&self, collection: &str, key: &str) -> StoreResult<T> {
        let json = self
            .connection()?
            .hash_get(collection, key)?
            .ok_or(StoreError::NotFound)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn list<T: DeserializeOwned>(&self, collection: &str) -> StoreResult<Vec<T>> {
        self.connection()?
            .hash_entries(collection)?
            .values()
            .map(|json| serde_json::from_str(json).map_err(StoreError::from))
            .collect()
    }
}

impl KvStore<RedisBackend> {
    /// Connects to Redis; fails when the server does not answer a ping.
    pub fn redis(config: RedisConfig) -> StoreResult<Self> {
        Self::new(RedisBackend::new(config)?)
    }
}

impl KvStore<SqliteBackend> {
    pub fn sqlite(config: SqliteConfig) -> StoreResult<Self> {
        Self::new(SqliteBackend::new(config))
    }
}

impl<B: KvBackend> RuleRepository for KvStore<B> {
    fn save_rule(&self, rule: &Rule) -> StoreResult<()> {
        self.save(RULES, &keys::rule_key(&rule.code), rule)
    }

    fn get_rule(&self, code: &str) -> StoreResult<Rule> {
        self.get(RULES, &keys::rule_key(code))
    }

    fn list_rules(&self) -> StoreResult<Vec<Rule>> {
        self.list(RULES)
    }
}

impl<B: KvBackend> PlayerRepository for KvStore<B> {
    fn save_player(&self, player: &Player) -> StoreResult<()> {
        self.save(PLAYERS, &keys::player_key(&player.name), player)
    }

    fn get_player(&self, name: &str) -> StoreResult<Player> {
        self.get(PLAYERS, &keys::player_key(name))
    }

    fn list_players(&self) -> StoreResult<Vec<Player>> {
        self.list(PLAYERS)
    }
}

impl<B: KvBackend> EventRepository for KvStore<B> {
    fn save_event(&self, event: &mut Event) -> StoreResult<()> {
        event.id = Uuid::new_v4().to_string();
        let conn = self.connection()?;

        let json = serde_json::to_string(event)?;
        conn.hash_set(EVENTS, &keys::event_key(&event.id), &json)?;

        // The record is durable from here on; only the index entry is pending.
        let index = PlayerEventIndex::for_player(&*conn, &event.player);
        if let Err(source) = index.prepend(&event.id) {
            warn!(
                "event=save_event module=store status=index_pending event_id={} index_key={} error={source}",
                event.id,
                index.key()
            );
            return Err(StoreError::IndexPending {
                event_id: event.id.clone(),
                source,
            });
        }

        debug!(
            "event=save_event module=store status=ok event_id={} index_key={}",
            event.id,
            index.key()
        );
        Ok(())
    }

    fn get_event(&self, id: &str) -> StoreResult<Event> {
        self.get(EVENTS, &keys::event_key(id))
    }

    fn get_player_events(&self, name: &str, count: usize) -> StoreResult<Vec<Event>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let conn = self.connection()?;
        let ids = PlayerEventIndex::for_player(&*conn, name).recent(count)?;
        ids.iter().map(|id| self.get_event(id)).collect()
    }
}

impl<B: KvBackend> Store for KvStore<B> {
    fn open(&self) -> StoreResult<()> {
        self.connection().map(|_| ())
    }

    fn close(&self) {
        if self.slot().take().is_some() {
            info!(
                "event=store_close module=store status=ok backend={}",
                self.backend.name()
            );
        }
    }

    fn flush_db(&self) -> StoreResult<()> {
        warn!(
            "event=flush_db module=store status=start backend={}",
            self.backend.name()
        );
        self.connection()?.flush()?;
        Ok(())
    }

    fn reindex_player_events(&self, name: &str) -> StoreResult<usize> {
        let player = keys::player_key(name);
        let mut events: Vec<Event> = self
            .list::<Event>(EVENTS)?
            .into_iter()
            .filter(|event| keys::player_key(&event.player) == player)
            .collect();
        events.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        let ids: Vec<EventId> = events.into_iter().map(|event| event.id).collect();

        let conn = self.connection()?;
        let index = PlayerEventIndex::for_player(&*conn, name);
        index.rebuild(&ids)?;

        info!(
            "event=reindex_player_events module=store status=ok index_key={} events={}",
            index.key(),
            ids.len()
        );
        Ok(ids.len())
    }
}
