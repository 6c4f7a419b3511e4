/// Tunable constants for analysis, learning, and selection.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Upper bound on key sentences per segment.
pub const MAX_KEY_SENTENCES: usize = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Reader configuration. Every field has a default, so a RON file only
/// needs to name the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Weight on the new observation in the moving average.
    pub smoothing_weight: f64,
    /// Baseline speed for users who never declared one.
    pub default_normal_wpm: u32,
    /// Observed speeds below this are treated as this.
    pub wpm_floor: f64,
    /// Dwell time that saturates the preference score.
    pub dwell_saturation_seconds: f64,
    /// `auto` picks condensed below this attention level.
    pub low_attention_threshold: f64,
    /// `auto` picks full above this preference score.
    pub high_preference_threshold: f64,
    /// At most `MAX_KEY_SENTENCES`.
    pub max_key_sentences: usize,
    /// Sentences shorter than this survive condensation.
    pub short_sentence_words: usize,
    /// Words per unit of reading difficulty.
    pub difficulty_words: f64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            smoothing_weight: 0.3,
            default_normal_wpm: 200,
            wpm_floor: 50.0,
            dwell_saturation_seconds: 10.0,
            low_attention_threshold: 0.3,
            high_preference_threshold: 0.7,
            max_key_sentences: 3,
            short_sentence_words: 8,
            difficulty_words: 50.0,
        }
    }
}

impl ReaderConfig {
    /// Load a config from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<ReaderConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a config from a RON string and validate it.
    pub fn parse_ron(input: &str) -> Result<ReaderConfig, ConfigError> {
        let config: ReaderConfig = ron::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.smoothing_weight > 0.0 && self.smoothing_weight <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "smoothing_weight",
                reason: format!("{} is outside (0, 1]", self.smoothing_weight),
            });
        }
        if !(self.wpm_floor > 0.0) {
            return Err(ConfigError::Invalid {
                field: "wpm_floor",
                reason: "must be positive".to_string(),
            });
        }
        if !(self.dwell_saturation_seconds > 0.0) {
            return Err(ConfigError::Invalid {
                field: "dwell_saturation_seconds",
                reason: "must be positive".to_string(),
            });
        }
        if self.max_key_sentences > MAX_KEY_SENTENCES {
            return Err(ConfigError::Invalid {
                field: "max_key_sentences",
                reason: format!("{} exceeds {}", self.max_key_sentences, MAX_KEY_SENTENCES),
            });
        }
        if !(self.difficulty_words > 0.0) {
            return Err(ConfigError::Invalid {
                field: "difficulty_words",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}
