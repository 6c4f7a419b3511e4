/// Narrative-function classification of single sentences.

use std::sync::Arc;

use crate::core::keywords::{quoted_span_count, KeywordTable, WordSet};
use crate::schema::content::ContentType;

/// Dialogue wins outright above this quote density.
const DIALOGUE_RATIO_THRESHOLD: f64 = 0.3;
/// Action and plot need strictly more than this many distinct hits.
const MIN_KEYWORD_HITS: usize = 2;

/// The raw signals a classification decision is made from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierSignals {
    pub dialogue_ratio: f64,
    pub action_count: usize,
    pub description_count: usize,
    pub plot_count: usize,
}

impl ClassifierSignals {
    /// Apply the fixed precedence: dialogue, then action, then plot,
    /// then description.
    pub fn decide(&self) -> ContentType {
        if self.dialogue_ratio > DIALOGUE_RATIO_THRESHOLD {
            ContentType::Dialogue
        } else if self.action_count > self.description_count
            && self.action_count > MIN_KEYWORD_HITS
        {
            ContentType::Action
        } else if self.plot_count > MIN_KEYWORD_HITS {
            ContentType::PlotCritical
        } else {
            ContentType::Description
        }
    }
}

/// Classifies sentences against a keyword table.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    keywords: Arc<KeywordTable>,
}

impl Classifier {
    pub fn new(keywords: Arc<KeywordTable>) -> Self {
        Self { keywords }
    }

    pub fn keywords(&self) -> &KeywordTable {
        &self.keywords
    }

    pub fn classify(&self, sentence: &str) -> ContentType {
        self.signals(sentence).decide()
    }

    /// Compute the four classification signals for a sentence.
    pub fn signals(&self, sentence: &str) -> ClassifierSignals {
        let clauses = sentence
            .split('.')
            .filter(|clause| !clause.trim().is_empty())
            .count()
            .max(1);
        let words = WordSet::new(sentence);

        ClassifierSignals {
            dialogue_ratio: quoted_span_count(sentence) as f64 / clauses as f64,
            action_count: self.keywords.signal_hits(ContentType::Action, &words),
            description_count: self.keywords.signal_hits(ContentType::Description, &words),
            plot_count: self.keywords.signal_hits(ContentType::PlotCritical, &words),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(s: &str) -> ContentType {
        Classifier::default().classify(s)
    }

    #[test]
    fn two_action_hits_is_not_action() {
        let signals = Classifier::default().signals("He shouted and ran.");
        assert_eq!(signals.action_count, 2);
        assert_eq!(signals.description_count, 0);
        assert_eq!(signals.plot_count, 0);
        assert_eq!(classify("He shouted and ran."), ContentType::Description);
    }

    #[test]
    fn quoted_exclamation_is_dialogue() {
        let signals = Classifier::default().signals(r#""Stop!" she cried."#);
        assert!((signals.dialogue_ratio - 1.0).abs() < f64::EPSILON);
        assert_eq!(classify(r#""Stop!" she cried."#), ContentType::Dialogue);
    }

    #[test]
    fn dialogue_beats_action() {
        let s = r#""Run," he shouted, "now" as he jumped, rushed, struck and threw"#;
        assert!(Classifier::default().signals(s).action_count >= 5);
        assert_eq!(classify(s), ContentType::Dialogue);
    }

    #[test]
    fn three_action_hits_is_action() {
        assert_eq!(classify("He jumped, rushed and grabbed the rope"), ContentType::Action);
    }

    #[test]
    fn action_needs_to_outnumber_description() {
        // 3 action, 3 description
        let s = "The old man was tall and ran, jumped and fell";
        let signals = Classifier::default().signals(s);
        assert_eq!(signals.action_count, 3);
        assert_eq!(signals.description_count, 3);
        assert_eq!(classify(s), ContentType::Description);
    }

    #[test]
    fn plot_needs_three_hits() {
        assert_eq!(
            classify("Suddenly she realized the truth but said nothing"),
            ContentType::PlotCritical
        );
        assert_eq!(classify("Then she realized it"), ContentType::Description);
    }

    #[test]
    fn action_is_checked_before_plot() {
        let s = "Suddenly he ran, then jumped, but fell because he grabbed nothing";
        assert_eq!(classify(s), ContentType::Action);
    }

    #[test]
    fn low_quote_density_is_not_dialogue() {
        // one quote over four clauses = 0.25
        let s = r#"A. B. C. He whispered "fine""#;
        assert!(Classifier::default().signals(s).dialogue_ratio < DIALOGUE_RATIO_THRESHOLD);
        assert_ne!(classify(s), ContentType::Dialogue);
    }

    #[test]
    fn custom_table_changes_classification() {
        let mut table = KeywordTable::default();
        table.signals.insert(
            ContentType::Action,
            ["leapt", "dodged", "parried"].iter().map(|w| w.to_string()).collect(),
        );
        let classifier = Classifier::new(Arc::new(table));
        assert_eq!(classifier.classify("She leapt, dodged and parried"), ContentType::Action);
        assert_eq!(classifier.classify("He jumped, rushed and grabbed"), ContentType::Description);
    }

    #[test]
    fn classification_is_deterministic() {
        let s = "Then, because of it, she decided and discovered something";
        let first = classify(s);
        for _ in 0..10 {
            assert_eq!(classify(s), first);
        }
    }
}
