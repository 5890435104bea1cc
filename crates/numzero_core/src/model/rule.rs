//! Scoring rule record.

use serde::{Deserialize, Serialize};

/// A scoring rule, identified case-insensitively by `code`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub code: String,
    #[serde(rename = "desc", default)]
    pub description: String,
    /// Points awarded each time the rule is triggered. May be negative.
    #[serde(default)]
    pub points: i32,
}

impl Rule {
    pub fn new(code: impl Into<String>, description: impl Into<String>, points: i32) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            points,
        }
    }
}
