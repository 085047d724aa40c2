//! Citation Attacher - Inline `[n]` markers from grounding spans
//!
//! Provides:
//! - Citation insertion at grounding segment end offsets
//! - Citation number extraction
//! - Citation range validation against the source count
//!
//! Insertion is best effort: malformed supports are logged and skipped, and
//! the original answer text is always preserved as a subsequence.

use lexforge_common::metrics;
use lexforge_common::models::GroundingMetadata;
use lexforge_common::text::snap_to_char_boundary;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;
use tracing::{debug, warn};

static CITATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+)\]").expect("citation pattern is valid"));

/// Outcome of checking an answer's citations against its sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationValidation {
    pub valid: bool,

    /// Sorted, deduplicated numbers outside `1..=source_count`
    pub invalid_citations: Vec<usize>,
}

/// Insert `[n]` markers at the end offset of every grounding support.
///
/// `n` is the one-based grounding chunk index. Markers landing on the same
/// offset are merged and sorted. A single space is put in front of a marker
/// group unless it sits at the start of the text or after whitespace.
/// Absent or empty metadata returns the text unchanged.
pub fn add_citations(text: &str, metadata: Option<&GroundingMetadata>) -> String {
    let Some(metadata) = metadata else {
        return text.to_string();
    };
    if metadata.is_empty() {
        return text.to_string();
    }

    let mut insertions: BTreeMap<usize, BTreeSet<usize>> = BTreeMap::new();
    let mut skipped = 0usize;

    for (support_index, support) in metadata.grounding_supports.iter().enumerate() {
        let Some(end_index) = support.segment.end_index else {
            warn!(support_index, "Grounding support without end index skipped");
            skipped += 1;
            continue;
        };
        let offset = match usize::try_from(end_index) {
            Ok(offset) if offset <= text.len() => offset,
            _ => {
                warn!(
                    support_index,
                    end_index,
                    text_len = text.len(),
                    "Grounding support out of range skipped"
                );
                skipped += 1;
                continue;
            }
        };

        let snapped = snap_to_char_boundary(text, offset);
        if snapped != offset {
            warn!(
                support_index,
                end_index,
                snapped,
                "Grounding offset inside a character, snapped back"
            );
        }

        let numbers: BTreeSet<usize> = support
            .grounding_chunk_indices
            .iter()
            .filter_map(|&chunk_index| match usize::try_from(chunk_index) {
                Ok(index) => Some(index + 1),
                Err(_) => {
                    warn!(support_index, chunk_index, "Negative grounding chunk index skipped");
                    None
                }
            })
            .collect();

        if !numbers.is_empty() {
            insertions.entry(snapped).or_default().extend(numbers);
        }
    }

    let mut out = String::with_capacity(text.len() + insertions.len() * 5);
    let mut cursor = 0;
    let mut inserted = 0usize;

    for (&offset, numbers) in &insertions {
        out.push_str(&text[cursor..offset]);
        let preceding = text[..offset].chars().next_back();
        if preceding.is_some_and(|c| !c.is_whitespace()) {
            out.push(' ');
        }
        for number in numbers {
            out.push_str(&format!("[{}]", number));
        }
        inserted += numbers.len();
        cursor = offset;
    }
    out.push_str(&text[cursor..]);

    debug!(
        supports = metadata.grounding_supports.len(),
        offsets = insertions.len(),
        inserted,
        skipped,
        "Citations attached"
    );
    metrics::record_citations(inserted, skipped);

    out
}

/// Sorted, deduplicated numbers of every `[n]` token in `text`.
///
/// A number too large for `usize` saturates to `usize::MAX`, so it still
/// shows up as an invalid citation.
pub fn extract_citation_numbers(text: &str) -> Vec<usize> {
    CITATION_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().parse::<usize>().unwrap_or(usize::MAX))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Report citations that do not point at one of `source_count` sources
pub fn validate_citations(text: &str, source_count: usize) -> CitationValidation {
    let invalid_citations: Vec<usize> = extract_citation_numbers(text)
        .into_iter()
        .filter(|&n| n < 1 || n > source_count)
        .collect();

    CitationValidation {
        valid: invalid_citations.is_empty(),
        invalid_citations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexforge_common::models::{GroundingChunk, GroundingSupport, WebSource};

    fn metadata(supports: Vec<GroundingSupport>, chunk_count: usize) -> GroundingMetadata {
        GroundingMetadata {
            web_search_queries: Vec::new(),
            grounding_chunks: (0..chunk_count)
                .map(|i| GroundingChunk {
                    web: Some(WebSource {
                        uri: format!("https://mevzuat.gov.tr/{}", i),
                        title: format!("Kaynak {}", i),
                    }),
                })
                .collect(),
            grounding_supports: supports,
        }
    }

    fn is_subsequence(needle: &str, haystack: &str) -> bool {
        let mut chars = haystack.chars();
        needle.chars().all(|c| chars.any(|h| h == c))
    }

    #[test]
    fn test_identity_without_metadata() {
        let text = "Bu bir tespittir.";
        assert_eq!(add_citations(text, None), text);
        assert_eq!(add_citations(text, Some(&GroundingMetadata::default())), text);
    }

    #[test]
    fn test_no_space_after_whitespace() {
        let text = "Bu bir tespittir.";
        let meta = metadata(vec![GroundingSupport::ending_at(3, vec![0])], 1);
        assert_eq!(add_citations(text, Some(&meta)), "Bu [1]bir tespittir.");
    }

    #[test]
    fn test_space_after_word() {
        let text = "Bu bir tespittir.";
        let meta = metadata(vec![GroundingSupport::ending_at(17, vec![0, 1])], 2);
        assert_eq!(add_citations(text, Some(&meta)), "Bu bir tespittir. [1][2]");
    }

    #[test]
    fn test_offset_zero_gets_no_space() {
        let meta = metadata(vec![GroundingSupport::ending_at(0, vec![2])], 3);
        assert_eq!(add_citations("Metin", Some(&meta)), "[3]Metin");
    }

    #[test]
    fn test_same_offset_merged_and_sorted() {
        let text = "Birinci cümle. İkinci cümle.";
        let meta = metadata(
            vec![
                GroundingSupport::ending_at(15, vec![2, 0]),
                GroundingSupport::ending_at(15, vec![0, 1]),
            ],
            3,
        );
        assert_eq!(
            add_citations(text, Some(&meta)),
            "Birinci cümle. [1][2][3] İkinci cümle."
        );
    }

    #[test]
    fn test_invalid_supports_skipped() {
        let text = "Kısa metin";
        let mut missing = GroundingSupport::ending_at(0, vec![0]);
        missing.segment.end_index = None;
        let meta = metadata(
            vec![
                missing,
                GroundingSupport::ending_at(-1, vec![1]),
                GroundingSupport::ending_at(10_000, vec![2]),
                GroundingSupport::ending_at(5, vec![3]),
            ],
            4,
        );
        let out = add_citations(text, Some(&meta));
        assert_eq!(extract_citation_numbers(&out), vec![4]);
        assert!(is_subsequence(text, &out));
    }

    #[test]
    fn test_multibyte_offset_snapped() {
        // "İ" is two bytes; offset 1 falls inside it
        let text = "İş hukuku";
        let meta = metadata(vec![GroundingSupport::ending_at(1, vec![0])], 1);
        let out = add_citations(text, Some(&meta));
        assert_eq!(out, "[1]İş hukuku");
    }

    #[test]
    fn test_citation_set_matches_valid_supports() {
        let text = "KVKK madde 5 işleme şartlarını düzenler. Açık rıza aranır.";
        let supports = vec![
            GroundingSupport::ending_at(40, vec![0, 2]),
            GroundingSupport::ending_at(text.len() as i64, vec![1]),
            GroundingSupport::ending_at(text.len() as i64 + 1, vec![5]),
        ];
        let meta = metadata(supports, 3);
        let out = add_citations(text, Some(&meta));
        assert_eq!(extract_citation_numbers(&out), vec![1, 2, 3]);
        assert!(is_subsequence(text, &out));
    }

    #[test]
    fn test_extract_citation_numbers() {
        assert_eq!(extract_citation_numbers("a [3] b [1][3] c [x] [12]"), vec![1, 3, 12]);
        assert!(extract_citation_numbers("kaynak yok").is_empty());
    }

    #[test]
    fn test_validate_citations() {
        let report = validate_citations("Metin [1][2] ve [5] ile [0].", 3);
        assert!(!report.valid);
        assert_eq!(report.invalid_citations, vec![0, 5]);

        let ok = validate_citations("Metin [1][3].", 3);
        assert!(ok.valid);
        assert!(ok.invalid_citations.is_empty());
    }

    #[test]
    fn test_oversized_citation_number_is_invalid() {
        let text = "Metin [1] ve [99999999999999999999999999].";
        assert_eq!(extract_citation_numbers(text), vec![1, usize::MAX]);

        let report = validate_citations(text, 3);
        assert!(!report.valid);
        assert_eq!(report.invalid_citations, vec![usize::MAX]);
    }
}
