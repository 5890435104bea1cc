//! Gamification domain model.
//!
//! # Responsibility
//! - Define the records persisted by the store: events, players and rules.
//! - Fix the JSON field names used for stored payloads.
//!
//! # Invariants
//! - Players and rules are identified by a case-insensitive name/code.
//! - Events reference players and rules by name/code only; nothing is embedded.
//! - Events are append-only; the store assigns their ids.

pub mod event;
pub mod player;
pub mod rule;

pub use event::{Event, EventId, Score};
pub use player::Player;
pub use rule::Rule;
