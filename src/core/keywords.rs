/// Keyword tables: the static trigger-word data behind classification,
/// condensation, and importance scoring.

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::config::ConfigError;
use crate::schema::content::ContentType;

const ACTION_WORDS: &[&str] = &[
    "ran", "jumped", "moved", "rushed", "fell", "struck", "threw", "caught", "grabbed", "shouted",
    "cried",
];

const DESCRIPTION_WORDS: &[&str] = &[
    "was", "were", "had", "looked", "seemed", "appeared", "beautiful", "tall", "small", "old",
    "young",
];

const PLOT_WORDS: &[&str] = &[
    "suddenly", "then", "but", "however", "because", "therefore", "decided", "realized",
    "discovered",
];

const CONDENSE_WORDS: &[&str] = &["but", "however", "then", "suddenly", "decided", "realized"];

const KEY_INDICATOR_WORDS: &[&str] = &[
    "decided", "realized", "discovered", "suddenly", "then", "but", "however", "never", "always",
    "must", "should", "would", "could", "might",
];

static QUOTED_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""[^"]*"|“[^”]*”"#).expect("valid quoted span regex"));

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").expect("valid word regex"));

/// Trigger words, keyed by the signal they feed.
///
/// `signals` maps a content type to the words that vote for it. Only
/// `Action`, `Description` and `PlotCritical` are consulted; dialogue is
/// detected structurally from quotes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordTable {
    pub signals: FxHashMap<ContentType, FxHashSet<String>>,
    /// Words that keep a sentence in a condensed rendering.
    pub condense_triggers: FxHashSet<String>,
    /// Words that mark a sentence as a key sentence.
    pub key_indicators: FxHashSet<String>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        let mut signals = FxHashMap::default();
        signals.insert(ContentType::Action, to_set(ACTION_WORDS));
        signals.insert(ContentType::Description, to_set(DESCRIPTION_WORDS));
        signals.insert(ContentType::PlotCritical, to_set(PLOT_WORDS));
        Self {
            signals,
            condense_triggers: to_set(CONDENSE_WORDS),
            key_indicators: to_set(KEY_INDICATOR_WORDS),
        }
    }
}

fn to_set(words: &[&str]) -> FxHashSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl KeywordTable {
    /// Load a keyword table from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<KeywordTable, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a keyword table from a RON string. Words are lowercased.
    pub fn parse_ron(input: &str) -> Result<KeywordTable, ConfigError> {
        let raw: KeywordTable = ron::from_str(input)?;
        Ok(raw.normalized())
    }

    fn normalized(self) -> KeywordTable {
        let lower = |set: FxHashSet<String>| -> FxHashSet<String> {
            set.into_iter()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect()
        };
        KeywordTable {
            signals: self
                .signals
                .into_iter()
                .map(|(ct, words)| (ct, lower(words)))
                .collect(),
            condense_triggers: lower(self.condense_triggers),
            key_indicators: lower(self.key_indicators),
        }
    }

    /// Number of distinct trigger words for `content_type` that occur in
    /// `words`.
    pub fn signal_hits(&self, content_type: ContentType, words: &WordSet<'_>) -> usize {
        self.signals
            .get(&content_type)
            .map(|set| words.distinct_hits(set))
            .unwrap_or(0)
    }
}

/// The distinct lowercase words of a piece of text.
#[derive(Debug, Default)]
pub struct WordSet<'a> {
    words: FxHashSet<std::borrow::Cow<'a, str>>,
}

impl<'a> WordSet<'a> {
    pub fn new(text: &'a str) -> WordSet<'a> {
        let words = WORD
            .find_iter(text)
            .map(|m| {
                let w = m.as_str();
                if w.chars().any(char::is_uppercase) {
                    std::borrow::Cow::Owned(w.to_lowercase())
                } else {
                    std::borrow::Cow::Borrowed(w)
                }
            })
            .collect();
        WordSet { words }
    }

    /// How many words of `keywords` appear at least once.
    pub fn distinct_hits(&self, keywords: &FxHashSet<String>) -> usize {
        keywords
            .iter()
            .filter(|k| self.words.contains(k.as_str()))
            .count()
    }

    pub fn contains_any(&self, keywords: &FxHashSet<String>) -> bool {
        keywords.iter().any(|k| self.words.contains(k.as_str()))
    }
}

/// Count paired-quote spans (`"…"` or `“…”`).
pub fn quoted_span_count(text: &str) -> usize {
    QUOTED_SPAN.find_iter(text).count()
}

pub fn has_quoted_span(text: &str) -> bool {
    QUOTED_SPAN.is_match(text)
}

/// Whitespace-delimited word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
