//! Persistence core for the numzero scoring game.
//! Players, rules and scored events live behind a key-value backend.

pub mod config;
pub mod db;
pub mod kv;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use config::{RedisConfig, SqliteConfig};
pub use kv::{KvBackend, KvConnection, KvError, KvResult, RedisBackend, SqliteBackend};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::{Event, EventId, Player, Rule, Score};
pub use service::score_service::ScoreService;
pub use store::{
    EventRepository, KvStore, PlayerEventIndex, PlayerRepository, RuleRepository, Store,
    StoreError, StoreResult,
};

/// Store over a Redis server.
pub type RedisStore = KvStore<RedisBackend>;

/// Store over an embedded SQLite database.
pub type SqliteStore = KvStore<SqliteBackend>;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
