/// Condensed renderings and key-sentence extraction.

use std::sync::Arc;

use crate::core::config::{ReaderConfig, MAX_KEY_SENTENCES};
use crate::core::keywords::{has_quoted_span, word_count, KeywordTable, WordSet};
use crate::core::segmenter::segment;

/// Shortens descriptive text and pulls out salient sentences.
#[derive(Debug, Clone)]
pub struct Condenser {
    keywords: Arc<KeywordTable>,
    short_sentence_words: usize,
    max_key_sentences: usize,
}

impl Default for Condenser {
    fn default() -> Self {
        Self::new(Arc::default(), &ReaderConfig::default())
    }
}

impl Condenser {
    pub fn new(keywords: Arc<KeywordTable>, config: &ReaderConfig) -> Self {
        Self {
            keywords,
            short_sentence_words: config.short_sentence_words,
            max_key_sentences: config.max_key_sentences.min(MAX_KEY_SENTENCES),
        }
    }

    /// Keep the first and last sentences, any sentence carrying a
    /// condense trigger, and any short sentence.
    ///
    /// Text with fewer than two sentences comes back unchanged.
    pub fn condense(&self, text: &str) -> String {
        let sentences = segment(text);
        if sentences.len() <= 1 {
            return text.to_string();
        }

        let last = sentences.len() - 1;
        let kept: Vec<&str> = sentences
            .iter()
            .enumerate()
            .filter(|(i, sentence)| {
                *i == 0
                    || *i == last
                    || WordSet::new(sentence).contains_any(&self.keywords.condense_triggers)
                    || word_count(sentence) < self.short_sentence_words
            })
            .map(|(_, sentence)| *sentence)
            .collect();

        format!("{}.", kept.join(". "))
    }

    /// Sentences with a key-indicator word or a quoted span, each with a
    /// trailing period, in original order, capped at the configured limit.
    pub fn extract_key_sentences(&self, text: &str) -> Vec<String> {
        segment(text)
            .into_iter()
            .filter(|sentence| {
                has_quoted_span(sentence)
                    || WordSet::new(sentence).contains_any(&self.keywords.key_indicators)
            })
            .take(self.max_key_sentences)
            .map(|sentence| format!("{}.", sentence))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_A: &str = "The garden stretched far beyond the crumbling stone wall of the estate";
    const LONG_B: &str = "Roses climbed every trellis in thick tangled ropes of red and white";
    const LONG_C: &str = "Ivy covered the windows of the old greenhouse near the pond";

    #[test]
    fn condense_keeps_boundaries_and_drops_long_middle() {
        let text = format!("{}. {}. {}. {}.", LONG_A, LONG_B, LONG_C, "It ended there");
        let condensed = Condenser::default().condense(&text);
        assert_eq!(condensed, format!("{}. It ended there.", LONG_A));
    }

    #[test]
    fn condense_keeps_plot_and_short_sentences() {
        let text = format!(
            "{}. {}. Birds sang. {} but nobody came to tend them anymore. {}.",
            LONG_A, LONG_B, LONG_C, LONG_A
        );
        let condensed = Condenser::default().condense(&text);
        assert_eq!(
            condensed,
            format!(
                "{}. Birds sang. {} but nobody came to tend them anymore. {}.",
                LONG_A, LONG_C, LONG_A
            )
        );
    }

    #[test]
    fn condense_single_sentence_is_unchanged() {
        let c = Condenser::default();
        assert_eq!(c.condense("Just one sentence here"), "Just one sentence here");
        assert_eq!(c.condense("Just one."), "Just one.");
        assert_eq!(c.condense(""), "");
    }

    #[test]
    fn condense_preserves_order() {
        let text = "Short one. Another short. Third short.";
        assert_eq!(
            Condenser::default().condense(text),
            "Short one. Another short. Third short."
        );
    }

    #[test]
    fn key_sentences_by_indicator_or_quote() {
        let text = r#"The sky was grey. She decided to stay. He said "fine" quietly. Nothing moved."#;
        assert_eq!(
            Condenser::default().extract_key_sentences(text),
            vec!["She decided to stay.".to_string(), r#"He said "fine" quietly."#.to_string()]
        );
    }

    #[test]
    fn key_sentences_capped_at_three() {
        let text = "Then one. Then two. Then three. Then four.";
        assert_eq!(
            Condenser::default().extract_key_sentences(text),
            vec!["Then one.", "Then two.", "Then three."]
        );
    }

    #[test]
    fn key_sentences_empty_when_nothing_matches() {
        assert!(Condenser::default()
            .extract_key_sentences("A quiet room. A cold cup.")
            .is_empty());
    }

    #[test]
    fn key_sentence_limit_follows_config() {
        let config = ReaderConfig {
            max_key_sentences: 1,
            ..ReaderConfig::default()
        };
        let c = Condenser::new(Arc::default(), &config);
        assert_eq!(c.extract_key_sentences("Then one. Then two."), vec!["Then one."]);
    }

    #[test]
    fn key_sentence_limit_never_exceeds_three() {
        let config = ReaderConfig {
            max_key_sentences: 10,
            ..ReaderConfig::default()
        };
        let c = Condenser::new(Arc::default(), &config);
        let keys = c.extract_key_sentences("Then a. Then b. Then c. Then d. Then e.");
        assert_eq!(keys, vec!["Then a.", "Then b.", "Then c."]);
    }
}
