/// Version selection and rendering of analyzed paragraphs.

use tracing::debug;

use crate::core::config::ReaderConfig;
use crate::schema::content::{
    AdaptiveContent, AnalyzedParagraph, ContentType, RequestedVersion, Version,
};
use crate::schema::pattern::ReadingPattern;

/// Picks and renders a version of a paragraph for a reader.
#[derive(Debug, Clone, Copy)]
pub struct AdaptiveSelector {
    low_attention_threshold: f64,
    high_preference_threshold: f64,
}

impl Default for AdaptiveSelector {
    fn default() -> Self {
        Self::new(&ReaderConfig::default())
    }
}

impl AdaptiveSelector {
    pub fn new(config: &ReaderConfig) -> Self {
        Self {
            low_attention_threshold: config.low_attention_threshold,
            high_preference_threshold: config.high_preference_threshold,
        }
    }

    /// Resolve `requested` to a concrete version.
    ///
    /// `Auto` consults the pattern for the paragraph's primary type: low
    /// attention gets the condensed text, high preference the full text,
    /// anything else the summary. Without a pattern it resolves to full.
    pub fn resolve<F>(
        &self,
        analyzed: &AnalyzedParagraph,
        requested: RequestedVersion,
        pattern_lookup: F,
    ) -> Version
    where
        F: FnOnce(ContentType) -> Option<ReadingPattern>,
    {
        match requested {
            RequestedVersion::Full => Version::Full,
            RequestedVersion::Condensed => Version::Condensed,
            RequestedVersion::Summary => Version::Summary,
            RequestedVersion::Auto => match pattern_lookup(analyzed.primary_type) {
                Some(p) if p.attention_level < self.low_attention_threshold => Version::Condensed,
                Some(p) if p.preference_score > self.high_preference_threshold => Version::Full,
                Some(_) => Version::Summary,
                None => Version::Full,
            },
        }
    }

    pub fn select<F>(
        &self,
        analyzed: &AnalyzedParagraph,
        requested: RequestedVersion,
        pattern_lookup: F,
    ) -> AdaptiveContent
    where
        F: FnOnce(ContentType) -> Option<ReadingPattern>,
    {
        let version = self.resolve(analyzed, requested, pattern_lookup);
        debug!(
            index = analyzed.index,
            ?requested,
            resolved = %version,
            primary = %analyzed.primary_type,
            "selected version"
        );
        render(analyzed, version)
    }
}

/// Render a concrete version. Highlights are always the key sentences of
/// dialogue and plot-critical segments, in segment order.
pub fn render(analyzed: &AnalyzedParagraph, version: Version) -> AdaptiveContent {
    let highlighted_sentences: Vec<String> = analyzed
        .segments
        .iter()
        .filter(|seg| seg.content_type.is_salient())
        .flat_map(|seg| seg.key_sentences.iter().cloned())
        .collect();

    let text = match version {
        Version::Full => analyzed.original_text.clone(),
        Version::Condensed => analyzed
            .segments
            .iter()
            .map(|seg| {
                if seg.content_type.is_salient() {
                    seg.text.as_str()
                } else {
                    seg.condensed_text.as_deref().unwrap_or(&seg.text)
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
        Version::Summary => analyzed
            .segments
            .iter()
            .filter(|seg| seg.content_type.is_salient())
            .map(|seg| seg.text.as_str())
            .collect::<Vec<_>>()
            .join(" "),
    };

    AdaptiveContent {
        version,
        text,
        highlighted_sentences,
        emphasis_type: Some(analyzed.primary_type),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::content::Segment;

    fn seg(text: &str, ct: ContentType, condensed: Option<&str>, keys: &[&str]) -> Segment {
        Segment {
            text: text.to_string(),
            content_type: ct,
            condensed_text: condensed.map(str::to_string),
            key_sentences: keys.iter().map(|k| k.to_string()).collect(),
            start_pos: 0,
            end_pos: 1,
        }
    }

    fn paragraph(primary: ContentType) -> AnalyzedParagraph {
        AnalyzedParagraph {
            index: 0,
            original_text: "ORIGINAL".to_string(),
            segments: vec![
                seg("Desc long.", ContentType::Description, Some("Desc."), &[]),
                seg("Said it.", ContentType::Dialogue, None, &["Said it."]),
                seg("Ran off.", ContentType::Action, None, &[]),
                seg("Then twist.", ContentType::PlotCritical, None, &["Then twist."]),
            ],
            reading_difficulty: 0.2,
            importance_score: 0.5,
            primary_type: primary,
        }
    }

    fn pattern(pref: f64, att: f64) -> ReadingPattern {
        ReadingPattern {
            content_type: ContentType::Description,
            avg_wpm: 200.0,
            preference_score: pref,
            attention_level: att,
        }
    }

    #[test]
    fn full_keeps_original_and_highlights() {
        let out = render(&paragraph(ContentType::Description), Version::Full);
        assert_eq!(out.text, "ORIGINAL");
        assert_eq!(out.highlighted_sentences, vec!["Said it.", "Then twist."]);
        assert_eq!(out.emphasis_type, Some(ContentType::Description));
    }

    #[test]
    fn condensed_swaps_description_for_condensed_text() {
        let out = render(&paragraph(ContentType::Description), Version::Condensed);
        assert_eq!(out.text, "Desc. Said it. Ran off. Then twist.");
        assert_eq!(out.highlighted_sentences, vec!["Said it.", "Then twist."]);
    }

    #[test]
    fn summary_keeps_only_salient_segments() {
        let out = render(&paragraph(ContentType::Action), Version::Summary);
        assert_eq!(out.text, "Said it. Then twist.");
        assert_eq!(out.emphasis_type, Some(ContentType::Action));
    }

    #[test]
    fn auto_without_pattern_is_full() {
        let out = AdaptiveSelector::default().select(
            &paragraph(ContentType::Description),
            RequestedVersion::Auto,
            |_| None,
        );
        assert_eq!(out.version, Version::Full);
        assert_eq!(out.text, "ORIGINAL");
    }

    #[test]
    fn auto_state_machine() {
        let sel = AdaptiveSelector::default();
        let p = paragraph(ContentType::Description);
        let resolve = |pat: ReadingPattern| sel.resolve(&p, RequestedVersion::Auto, |_| Some(pat));

        assert_eq!(resolve(pattern(0.9, 0.1)), Version::Condensed);
        assert_eq!(resolve(pattern(0.9, 0.3)), Version::Full);
        assert_eq!(resolve(pattern(0.7, 0.5)), Version::Summary);
        assert_eq!(resolve(pattern(0.2, 0.8)), Version::Summary);
    }

    #[test]
    fn auto_looks_up_primary_type() {
        let sel = AdaptiveSelector::default();
        let p = paragraph(ContentType::PlotCritical);
        let mut asked = None;
        sel.resolve(&p, RequestedVersion::Auto, |ct| {
            asked = Some(ct);
            None
        });
        assert_eq!(asked, Some(ContentType::PlotCritical));
    }

    #[test]
    fn explicit_versions_ignore_patterns() {
        let sel = AdaptiveSelector::default();
        let p = paragraph(ContentType::Description);
        assert_eq!(
            sel.resolve(&p, RequestedVersion::Summary, |_| Some(pattern(1.0, 1.0))),
            Version::Summary
        );
    }

    #[test]
    fn every_type_and_version_renders() {
        let sel = AdaptiveSelector::default();
        let requested = [
            RequestedVersion::Full,
            RequestedVersion::Condensed,
            RequestedVersion::Summary,
            RequestedVersion::Auto,
        ];
        for ct in ContentType::ALL {
            for v in requested {
                let out = sel.select(&paragraph(ct), v, |_| Some(pattern(0.5, 0.5)));
                assert_eq!(out.emphasis_type, Some(ct));
            }
        }
    }

    #[test]
    fn empty_paragraph_renders_empty() {
        let p = AnalyzedParagraph {
            index: 0,
            original_text: String::new(),
            segments: Vec::new(),
            reading_difficulty: 0.0,
            importance_score: 0.0,
            primary_type: ContentType::Description,
        };
        for v in [Version::Full, Version::Condensed, Version::Summary] {
            let out = render(&p, v);
            assert!(out.text.is_empty());
            assert!(out.highlighted_sentences.is_empty());
        }
    }
}
