//! Player record.

use serde::{Deserialize, Serialize};

/// A participant in the game, identified case-insensitively by `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    /// Avatar URL.
    #[serde(default)]
    pub image: String,
    /// Running score. The store never recomputes it.
    #[serde(default)]
    pub score: i32,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
