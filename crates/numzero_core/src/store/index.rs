use crate::kv::keys::player_events_key;
use crate::kv::{KvConnection, KvResult};
use crate::model::EventId;

/// Ordered event ids for one player, newest first.
pub struct PlayerEventIndex<'c, C: KvConnection + ?Sized> {
    conn: &'c C,
    key: String,
}

impl<'c, C: KvConnection + ?Sized> PlayerEventIndex<'c, C> {
    pub fn for_player(conn: &'c C, player: &str) -> Self {
        Self {
            conn,
            key: player_events_key(player),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Makes `event_id` the most recent entry.
    pub fn prepend(&self, event_id: &str) -> KvResult<()> {
        self.conn.list_push_front(&self.key, event_id)
    }

    pub fn recent(&self, count: usize) -> KvResult<Vec<EventId>> {
        self.conn.list_range(&self.key, 0, count)
    }

    /// Replaces the whole index with `ids`, given oldest first.
    ///
    /// Not atomic: readers may observe a partially rebuilt index.
    pub fn rebuild(&self, ids: &[EventId]) -> KvResult<()> {
        self.conn.delete(&self.key)?;
        for id in ids {
            self.prepend(id)?;
        }
        Ok(())
    }
}
