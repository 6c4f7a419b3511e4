/// Sentence segmentation.
///
/// Splitting is purely punctuation-driven: any run of `.`, `!` or `?`
/// ends a sentence. There is no abbreviation handling, so "Mr. Smith"
/// becomes two fragments.

const SENTENCE_ENDERS: &[char] = &['.', '!', '?'];

/// Split text into trimmed, non-empty sentence fragments, without their
/// terminal punctuation.
pub fn segment(text: &str) -> Vec<&str> {
    text.split(SENTENCE_ENDERS)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
