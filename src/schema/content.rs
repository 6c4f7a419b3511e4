use serde::{Deserialize, Serialize};
use std::fmt;

/// The narrative function of a sentence.
///
/// The set is closed: every non-empty sentence classifies to exactly one
/// of these, with `Description` as the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Dialogue,
    Action,
    Description,
    PlotCritical,
}

impl Default for ContentType {
    fn default() -> Self {
        Self::Description
    }
}

impl ContentType {
    /// All variants, in declaration order.
    pub const ALL: [ContentType; 4] = [
        ContentType::Dialogue,
        ContentType::Action,
        ContentType::Description,
        ContentType::PlotCritical,
    ];

    /// Wire name: "dialogue", "action", "description", "plot_critical".
    pub fn name(&self) -> &'static str {
        match self {
            Self::Dialogue => "dialogue",
            Self::Action => "action",
            Self::Description => "description",
            Self::PlotCritical => "plot_critical",
        }
    }

    /// Parse a wire name. Returns `None` for anything unrecognized.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "dialogue" => Some(Self::Dialogue),
            "action" => Some(Self::Action),
            "description" => Some(Self::Description),
            "plot_critical" => Some(Self::PlotCritical),
            _ => None,
        }
    }

    /// Dialogue and plot-critical segments carry key sentences and
    /// survive the summary rendering.
    pub fn is_salient(&self) -> bool {
        matches!(self, Self::Dialogue | Self::PlotCritical)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified sentence-level unit of a paragraph.
///
/// `start_pos`/`end_pos` are byte offsets into the owning paragraph's
/// original text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub text: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub condensed_text: Option<String>,
    pub key_sentences: Vec<String>,
    pub start_pos: usize,
    pub end_pos: usize,
}

/// The structured analysis of one paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedParagraph {
    pub index: usize,
    pub original_text: String,
    pub segments: Vec<Segment>,
    /// Words per 50. Not clamped.
    pub reading_difficulty: f64,
    /// Weighted signal density, clamped to at most 1.0.
    pub importance_score: f64,
    pub primary_type: ContentType,
}

/// A rendering that can actually be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Version {
    Full,
    Condensed,
    Summary,
}

impl Version {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Condensed => "condensed",
            Self::Summary => "summary",
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A version tag as requested by a caller. `Auto` defers the choice to
/// the reader's stored pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestedVersion {
    Full,
    Condensed,
    Summary,
    Auto,
}

impl Default for RequestedVersion {
    fn default() -> Self {
        Self::Auto
    }
}

impl RequestedVersion {
    /// Parse a tag. Only the exact lowercase tags are recognized; case
    /// and surrounding whitespace are not normalized.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "full" => Some(Self::Full),
            "condensed" => Some(Self::Condensed),
            "summary" => Some(Self::Summary),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }

    /// Parse a tag, mapping anything unknown to `Full`.
    ///
    /// The second element is `false` when the fallback was taken, so the
    /// caller can report it without changing the rendering.
    pub fn parse_lenient(tag: &str) -> (Self, bool) {
        match Self::parse(tag) {
            Some(v) => (v, true),
            None => (Self::Full, false),
        }
    }
}

/// A paragraph rendered for a specific reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptiveContent {
    pub version: Version,
    pub text: String,
    pub highlighted_sentences: Vec<String>,
    pub emphasis_type: Option<ContentType>,
}
