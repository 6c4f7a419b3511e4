/// Paragraph analysis: segmentation, classification, condensation, and
/// paragraph-level scoring.

use std::sync::Arc;
use tracing::debug;

use crate::core::classifier::Classifier;
use crate::core::condenser::Condenser;
use crate::core::config::ReaderConfig;
use crate::core::keywords::{quoted_span_count, word_count, KeywordTable, WordSet};
use crate::core::segmenter::segment;
use crate::schema::content::{AnalyzedParagraph, ContentType, Segment};

const DIALOGUE_WEIGHT: f64 = 0.3;
const ACTION_WEIGHT: f64 = 0.4;
const PLOT_WEIGHT: f64 = 0.5;
const IMPORTANCE_SCALE: f64 = 5.0;

/// Turns paragraph text into an `AnalyzedParagraph`.
#[derive(Debug, Clone)]
pub struct ParagraphAnalyzer {
    classifier: Classifier,
    condenser: Condenser,
    difficulty_words: f64,
}

impl Default for ParagraphAnalyzer {
    fn default() -> Self {
        Self::new(Arc::default(), &ReaderConfig::default())
    }
}

impl ParagraphAnalyzer {
    pub fn new(keywords: Arc<KeywordTable>, config: &ReaderConfig) -> Self {
        Self {
            classifier: Classifier::new(Arc::clone(&keywords)),
            condenser: Condenser::new(keywords, config),
            difficulty_words: config.difficulty_words,
        }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Analyze one paragraph. Never fails; empty text yields no segments
    /// and a `Description` primary type.
    pub fn analyze(&self, text: &str, index: usize) -> AnalyzedParagraph {
        let mut segments = Vec::new();
        let mut current_pos = 0usize;

        for sentence in segment(text) {
            let content_type = self.classifier.classify(sentence);
            let full = format!("{}.", sentence);

            let condensed_text = match content_type {
                ContentType::Description => Some(self.condenser.condense(&full)),
                _ => None,
            };
            let key_sentences = if content_type.is_salient() {
                self.condenser.extract_key_sentences(&full)
            } else {
                Vec::new()
            };

            let start_pos = current_pos;
            let end_pos = current_pos + sentence.len();
            current_pos = end_pos + 1;

            segments.push(Segment {
                text: full,
                content_type,
                condensed_text,
                key_sentences,
                start_pos,
                end_pos,
            });
        }

        let primary_type = primary_type(&segments);
        let reading_difficulty = word_count(text) as f64 / self.difficulty_words;
        let importance_score = self.importance(text);

        debug!(
            index,
            segments = segments.len(),
            primary = %primary_type,
            reading_difficulty,
            importance_score,
            "analyzed paragraph"
        );

        AnalyzedParagraph {
            index,
            original_text: text.to_string(),
            segments,
            reading_difficulty,
            importance_score,
            primary_type,
        }
    }

    /// Paragraph-level importance from quote, action, and plot density,
    /// clamped to 1.0. Independent of per-sentence classification.
    pub fn importance(&self, text: &str) -> f64 {
        let words = WordSet::new(text);
        let keywords = self.classifier.keywords();
        let dialogue = quoted_span_count(text) as f64;
        let action = keywords.signal_hits(ContentType::Action, &words) as f64;
        let plot = keywords.signal_hits(ContentType::PlotCritical, &words) as f64;

        let raw = (dialogue * DIALOGUE_WEIGHT + action * ACTION_WEIGHT + plot * PLOT_WEIGHT)
            / IMPORTANCE_SCALE;
        raw.min(1.0)
    }
}

/// The modal segment type, ties going to whichever type appeared first.
fn primary_type(segments: &[Segment]) -> ContentType {
    let mut counts: Vec<(ContentType, usize)> = Vec::with_capacity(ContentType::ALL.len());
    for seg in segments {
        match counts.iter_mut().find(|(ct, _)| *ct == seg.content_type) {
            Some(entry) => entry.1 += 1,
            None => counts.push((seg.content_type, 1)),
        }
    }

    let mut best: Option<(ContentType, usize)> = None;
    for (ct, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((ct, count));
        }
    }
    best.map(|(ct, _)| ct).unwrap_or_default()
}
