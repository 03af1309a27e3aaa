//! Pure text utilities: output-name derivation and paragraph splitting

use chrono::{DateTime, Local};

/// Maximum slug length for whole-text exports
pub const SLUG_MAX: usize = 40;
/// Shorter bound for chunked exports, leaving room for the part tag
pub const CHUNK_SLUG_MAX: usize = 30;
/// Slug used when sanitization leaves nothing
pub const FALLBACK_SLUG: &str = "note";

/// Position of one chunk within a bulk export, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkTag {
    pub index: usize,
    pub total: usize,
}

/// Convert text into a short, filesystem-safe slug.
///
/// Lowercases, keeps only alphanumerics plus space/hyphen/underscore, turns
/// spaces into hyphens, and truncates to `max` characters.
pub fn slugify(text: &str, max: usize) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|ch| ch.is_alphanumeric() || matches!(ch, ' ' | '-' | '_'))
        .collect();
    let slug: String = cleaned.trim().replace(' ', "-").chars().take(max).collect();
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Derive an output file stem (no directory, no extension) for an export.
///
/// Deterministic for a given text and instant; two exports of the same text
/// within the same second produce the same stem. That collision is accepted
/// behavior.
pub fn derive_file_stem(text: &str, timestamp: DateTime<Local>, chunk: Option<ChunkTag>) -> String {
    let stamp = timestamp.format("%Y%m%d-%H%M%S");
    match chunk {
        Some(tag) => format!(
            "{}-part-{:03}-of-{:03}-{}",
            stamp,
            tag.index,
            tag.total,
            slugify(text, CHUNK_SLUG_MAX)
        ),
        None => format!("{}-{}", stamp, slugify(text, SLUG_MAX)),
    }
}

/// Split text into paragraph chunks on blank-line boundaries.
///
/// Line endings are normalized first; empty chunks are dropped.
pub fn split_into_paragraphs(text: &str) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    normalized
        .split("\n\n")
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(str::to_string)
        .collect()
}

/// First 60 characters of the text with newlines flattened to spaces,
/// as recorded in history entries.
pub fn preview_snippet(text: &str) -> String {
    text.chars().take(60).collect::<String>().replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at_noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 15, 12, 30, 45).unwrap()
    }

    #[test]
    fn slug_keeps_only_safe_characters() {
        let slug = slugify("Hello, World! (draft #2)", SLUG_MAX);
        assert_eq!(slug, "hello-world-draft-2");
        assert!(slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_'));
    }

    #[test]
    fn slug_truncates_to_bound() {
        let long = "word ".repeat(40);
        assert_eq!(slugify(&long, SLUG_MAX).chars().count(), SLUG_MAX);
        assert_eq!(slugify(&long, CHUNK_SLUG_MAX).chars().count(), CHUNK_SLUG_MAX);
    }

    #[test]
    fn empty_or_punctuation_input_yields_fallback() {
        assert_eq!(slugify("", SLUG_MAX), "note");
        assert_eq!(slugify("!!! ??? ...", SLUG_MAX), "note");
    }

    #[test]
    fn stem_has_timestamp_prefix() {
        let stem = derive_file_stem("My morning notes", at_noon(), None);
        assert_eq!(stem, "20240315-123045-my-morning-notes");
    }

    #[test]
    fn chunked_stem_carries_zero_padded_part_tag() {
        let stem = derive_file_stem(
            "Second paragraph here",
            at_noon(),
            Some(ChunkTag { index: 2, total: 12 }),
        );
        assert_eq!(stem, "20240315-123045-part-002-of-012-second-paragraph-here");
    }

    #[test]
    fn stem_is_deterministic_for_same_instant() {
        let a = derive_file_stem("same text", at_noon(), None);
        let b = derive_file_stem("same text", at_noon(), None);
        assert_eq!(a, b);
    }

    #[test]
    fn splits_on_blank_lines_and_drops_empties() {
        let text = "First paragraph.\r\n\r\nSecond one.\n\n\n\nThird.\n";
        let chunks = split_into_paragraphs(text);
        assert_eq!(chunks, vec!["First paragraph.", "Second one.", "Third."]);
    }

    #[test]
    fn splitting_is_idempotent_on_rejoined_output() {
        let text = "One.\n\nTwo lines\nhere.\n\nThree.";
        let chunks = split_into_paragraphs(text);
        let rejoined = chunks.join("\n\n");
        assert_eq!(split_into_paragraphs(&rejoined), chunks);
    }

    #[test]
    fn single_paragraph_yields_one_chunk() {
        assert_eq!(split_into_paragraphs("just one\nparagraph").len(), 1);
        assert!(split_into_paragraphs("   \n\n  ").is_empty());
    }

    #[test]
    fn preview_flattens_newlines_and_truncates() {
        let text = "line one\nline two";
        assert_eq!(preview_snippet(text), "line one line two");
        let long = "x".repeat(100);
        assert_eq!(preview_snippet(&long).chars().count(), 60);
    }
}
