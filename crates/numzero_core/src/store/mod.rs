//! Store contract for players, rules and scored events.
//!
//! # Responsibility
//! - Define typed repository contracts per entity, independent of the backend.
//! - Classify failures into one `NotFound` sentinel plus pass-through errors.
//!
//! # Invariants
//! - Player names, rule codes and event ids are case-insensitive.
//! - `get_*` never returns an empty success for a missing key.
//! - Saving an event is two writes (record, then player index); a failure of
//!   the second is reported as `StoreError::IndexPending`.

use crate::kv::KvError;
use crate::model::{Event, EventId, Player, Rule};
use thiserror::Error;

mod index;
mod kv_store;

pub use index::PlayerEventIndex;
pub use kv_store::KvStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested id, name or code does not exist.
    #[error("not found")]
    NotFound,
    /// Transport, pool or database failure, passed through unchanged.
    #[error(transparent)]
    Backend(#[from] KvError),
    /// A payload could not be encoded, or a stored payload could not be decoded.
    #[error("invalid stored payload: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The event record was written but its id was not added to the player's
    /// index. The event is readable by id and missing from player history
    /// until `Store::reindex_player_events` runs.
    #[error("event `{event_id}` was stored but its player index was not updated: {source}")]
    IndexPending {
        event_id: EventId,
        #[source]
        source: KvError,
    },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// Upsert and lookup of scoring rules.
pub trait RuleRepository {
    /// Creates the rule or overwrites the one with the same code.
    fn save_rule(&self, rule: &Rule) -> StoreResult<()>;
    fn get_rule(&self, code: &str) -> StoreResult<Rule>;
    fn list_rules(&self) -> StoreResult<Vec<Rule>>;
}

/// Upsert and lookup of players.
pub trait PlayerRepository {
    /// Creates the player or overwrites the one with the same name.
    fn save_player(&self, player: &Player) -> StoreResult<()>;
    fn get_player(&self, name: &str) -> StoreResult<Player>;
    fn list_players(&self) -> StoreResult<Vec<Player>>;
}

/// Append-only event log with per-player history.
pub trait EventRepository {
    /// Assigns `event.id`, stores the event, then prepends the id to the
    /// player's index.
    fn save_event(&self, event: &mut Event) -> StoreResult<()>;
    fn get_event(&self, id: &str) -> StoreResult<Event>;
    /// Returns up to `count` of the player's events, most recent first.
    ///
    /// Fails with `NotFound` when the index names an event that is missing.
    fn get_player_events(&self, name: &str, count: usize) -> StoreResult<Vec<Event>>;
}

/// Full store: all repositories plus connection lifecycle and maintenance.
pub trait Store: RuleRepository + PlayerRepository + EventRepository + Send + Sync {
    /// Opens the backend connection. No-op when already open.
    fn open(&self) -> StoreResult<()>;
    /// Releases the backend connection. No-op when already closed.
    fn close(&self);
    /// Deletes every collection and index. Test and admin use only.
    fn flush_db(&self) -> StoreResult<()>;
    /// Rebuilds the player's event index from the stored events, oldest to
    /// newest by date. Returns the number of indexed events.
    fn reindex_player_events(&self, name: &str) -> StoreResult<usize>;
}
