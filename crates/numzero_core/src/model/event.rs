//! Event and score records.
//!
//! # Invariants
//! - `id` is assigned by the store at save time and never reused.
//! - `total` is computed by the caller (see `Event::computed_total`) and is
//!   stored as-is.

use crate::kv::keys::rule_key;
use crate::model::rule::Rule;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned event identifier (lowercase UUID v4 text).
pub type EventId = String;

/// Something that happened to a player, resulting in scores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Assigned by the store on save; any caller value is overwritten.
    #[serde(default)]
    pub id: EventId,
    /// Name of the player this event is for.
    pub player: String,
    /// Short description, e.g. "static analysis on commit 34fe6a".
    #[serde(rename = "desc", default)]
    pub description: String,
    /// Optional link to a resource with more detail.
    #[serde(default)]
    pub url: String,
    /// Rules matched as part of this event.
    #[serde(default)]
    pub scores: Vec<Score>,
    /// Net points awarded for this event.
    #[serde(default)]
    pub total: i32,
    /// When the event happened.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// A rule matched one or more times within an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    /// Code of the matched rule.
    pub rule: String,
    /// Number of times the rule was triggered.
    pub times: i32,
}

impl Score {
    pub fn new(rule: impl Into<String>, times: i32) -> Self {
        Self {
            rule: rule.into(),
            times,
        }
    }
}

impl Event {
    /// Creates an unsaved event for `player`, dated now.
    pub fn new(player: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            player: player.into(),
            description: description.into(),
            date: Some(Utc::now()),
            ..Self::default()
        }
    }

    /// Appends a score entry.
    pub fn with_score(mut self, rule: impl Into<String>, times: i32) -> Self {
        self.scores.push(Score::new(rule, times));
        self
    }

    /// Sums `points * times` over all scores, looking rules up by code.
    ///
    /// Returns the first score code with no matching rule as `Err`.
    /// Rule codes are compared by their canonical storage key.
    pub fn computed_total(&self, rules: &[Rule]) -> Result<i32, String> {
        let mut total = 0;
        for score in &self.scores {
            let code = rule_key(&score.rule);
            let rule = rules
                .iter()
                .find(|rule| rule_key(&rule.code) == code)
                .ok_or_else(|| score.rule.clone())?;
            total = rule
                .points
                .saturating_mul(score.times)
                .saturating_add(total);
        }
        Ok(total)
    }
}
