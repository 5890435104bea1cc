//! Scoring use-cases.
//!
//! # Invariants
//! - An event is totalled against the rules stored at the time it is recorded.
//! - A score naming an unknown rule fails the whole call before any write.

use crate::model::{Event, Player};
use crate::store::{Store, StoreResult};
use std::cmp::Reverse;

/// Game operations over any store implementation.
pub struct ScoreService<'s, S: Store + ?Sized> {
    store: &'s S,
}

impl<'s, S: Store + ?Sized> ScoreService<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Computes `event.total` from the stored rules and saves the event.
    ///
    /// On success `event.id` holds the store-assigned id.
    ///
    /// # Errors
    /// - `StoreError::NotFound` when a score references an unknown rule.
    /// - Any error of `EventRepository::save_event`.
    pub fn record_event(&self, event: &mut Event) -> StoreResult<()> {
        let mut total: i32 = 0;
        for score in &event.scores {
            let rule = self.store.get_rule(&score.rule)?;
            total = rule.points.saturating_mul(score.times).saturating_add(total);
        }
        event.total = total;
        self.store.save_event(event)
    }

    /// Most recent events of a player, newest first.
    pub fn player_history(&self, name: &str, count: usize) -> StoreResult<Vec<Event>> {
        self.store.get_player_events(name, count)
    }

    /// All players by descending score, ties broken by name.
    pub fn leaderboard(&self) -> StoreResult<Vec<Player>> {
        let mut players = self.store.list_players()?;
        players.sort_by_key(|player| (Reverse(player.score), player.name.to_lowercase()));
        Ok(players)
    }
}
