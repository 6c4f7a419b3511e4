use serde::{Deserialize, Serialize};
use std::fmt;

use super::content::ContentType;

/// Newtype wrapper for usernames.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A per-user, per-content-type estimate of reading behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingPattern {
    pub content_type: ContentType,
    pub avg_wpm: f64,
    /// 0.0..=1.0, saturating dwell time.
    pub preference_score: f64,
    /// 0.0..=1.0, higher when the reader slows down relative to baseline.
    pub attention_level: f64,
}

impl ReadingPattern {
    /// Blend an observation into this pattern with weight `w` on the
    /// observation, field by field.
    pub fn smoothed(&self, observed: &ReadingPattern, w: f64) -> ReadingPattern {
        ReadingPattern {
            content_type: self.content_type,
            avg_wpm: self.avg_wpm * (1.0 - w) + observed.avg_wpm * w,
            preference_score: self.preference_score * (1.0 - w) + observed.preference_score * w,
            attention_level: self.attention_level * (1.0 - w) + observed.attention_level * w,
        }
    }

    /// Field-wise bit equality. Unlike `==`, a NaN field equals itself.
    pub fn same_bits(&self, other: &ReadingPattern) -> bool {
        self.content_type == other.content_type
            && self.avg_wpm.to_bits() == other.avg_wpm.to_bits()
            && self.preference_score.to_bits() == other.preference_score.to_bits()
            && self.attention_level.to_bits() == other.attention_level.to_bits()
    }
}

/// One observed reading of a content type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingEvent {
    pub content_type: ContentType,
    pub observed_wpm: f64,
    pub dwell_time_seconds: f64,
}

/// What the core needs from the user-profile store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: UserId,
    #[serde(default)]
    pub normal_reading_speed: Option<u32>,
}
