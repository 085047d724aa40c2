//! Text chunking module
//!
//! Splits legal text into chunks along its structure:
//! 1. `MADDE N` headings open a new section; every chunk in that section
//!    carries the label "Madde N".
//! 2. Inside a section, blank-line paragraphs are packed together while the
//!    chunk stays within `max_chunk_chars`.
//! 3. A single paragraph over budget is hard-split with `text-splitter`.
//!
//! Chunk content is always a verbatim slice of the input, so
//! `text[char_start..char_end] == content` holds for every chunk.

use lexforge_common::config::ChunkingSettings;
use lexforge_common::context::extract_entity_texts;
use lexforge_common::metrics;
use lexforge_common::models::{Chunk, ChunkKind, ChunkMetadata};
use lexforge_common::text::turkish_lowercase;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use text_splitter::{ChunkConfig, TextSplitter};
use tracing::debug;

static HEADING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*madde[ \t]+(\d+)").expect("heading pattern is valid")
});

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n[ \t]*\r?\n").expect("paragraph pattern is valid"));

/// Terms that mark normative or decisional text
const SIGNAL_TERMS: &[&str] = &["madde", "kanun", "karar", "hüküm"];

/// Entity density at which the density half of the score saturates
const ENTITIES_PER_WORD_SATURATION: f32 = 1.0 / 20.0;

/// Configuration for text chunking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum chunk size in characters
    pub max_chunk_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chunk_chars: 1000,
        }
    }
}

impl From<&ChunkingSettings> for ChunkingConfig {
    fn from(settings: &ChunkingSettings) -> Self {
        Self {
            max_chunk_chars: settings.max_chunk_chars,
        }
    }
}

/// Byte span of a future chunk
#[derive(Debug, Clone)]
struct Span {
    start: usize,
    end: usize,
    section: Option<String>,
}

/// Split a document with the default configuration
pub fn semantic_chunk(text: &str, document_id: &str, document_title: &str) -> Vec<Chunk> {
    semantic_chunk_with_config(text, document_id, document_title, &ChunkingConfig::default())
}

/// Split a document into chunks.
///
/// Empty input yields no chunks. Any other input yields at least one, and
/// input within budget or with no visible text yields exactly one
/// `Document` chunk covering it all.
pub fn semantic_chunk_with_config(
    text: &str,
    document_id: &str,
    document_title: &str,
    config: &ChunkingConfig,
) -> Vec<Chunk> {
    if text.is_empty() {
        debug!(document_id, "Empty document, no chunks");
        return Vec::new();
    }

    let max_chars = config.max_chunk_chars.max(1);

    let spans = if text.trim().is_empty() || text.chars().count() <= max_chars {
        vec![Span {
            start: 0,
            end: text.len(),
            section: leading_heading(text),
        }]
    } else {
        split_sections(text)
            .into_iter()
            .flat_map(|(start, end, section)| pack_section(text, start, end, section, max_chars))
            .collect()
    };

    let total_chunks = spans.len();
    let single = total_chunks == 1 && spans[0].start == 0 && spans[0].end == text.len();

    let chunks: Vec<Chunk> = spans
        .into_iter()
        .enumerate()
        .map(|(index, span)| {
            let content = &text[span.start..span.end];
            let entities = extract_entity_texts(content);
            let importance = importance_score(content, entities.len());
            let kind = if single {
                ChunkKind::Document
            } else if span.section.is_some() {
                ChunkKind::Article
            } else {
                ChunkKind::Paragraph
            };

            Chunk {
                id: format!("{}_chunk_{}", document_id, index),
                content: content.to_string(),
                metadata: ChunkMetadata {
                    document_id: document_id.to_string(),
                    document_title: document_title.to_string(),
                    chunk_index: index,
                    total_chunks,
                    kind,
                    char_start: span.start,
                    char_end: span.end,
                    section: span.section,
                    entities,
                    importance: Some(importance),
                },
            }
        })
        .collect();

    debug!(
        document_id,
        input_len = text.len(),
        chunk_count = chunks.len(),
        max_chunk_chars = max_chars,
        "Text chunked"
    );
    metrics::record_chunking(chunks.len());

    chunks
}

/// Section label when `text` opens with a `MADDE N` heading
fn leading_heading(text: &str) -> Option<String> {
    let caps = HEADING_PATTERN.captures(text)?;
    let whole = caps.get(0)?;
    if !text[..whole.start()].trim().is_empty() {
        return None;
    }
    caps.get(1).map(|n| format!("Madde {}", n.as_str()))
}

/// `(start, end, label)` for the preamble and each headed section
fn split_sections(text: &str) -> Vec<(usize, usize, Option<String>)> {
    let headings: Vec<(usize, String)> = HEADING_PATTERN
        .captures_iter(text)
        .filter_map(|caps| {
            let start = caps.get(0)?.start();
            let number = caps.get(1)?.as_str();
            Some((start, format!("Madde {}", number)))
        })
        .collect();

    let mut sections = Vec::with_capacity(headings.len() + 1);
    let first_heading = headings.first().map(|(start, _)| *start).unwrap_or(text.len());
    if first_heading > 0 {
        sections.push((0, first_heading, None));
    }
    for (i, (start, label)) in headings.iter().enumerate() {
        let end = headings
            .get(i + 1)
            .map(|(next, _)| *next)
            .unwrap_or(text.len());
        sections.push((*start, end, Some(label.clone())));
    }
    sections
}

/// Pack the paragraphs of one section into budget-sized spans
fn pack_section(
    text: &str,
    start: usize,
    end: usize,
    section: Option<String>,
    max_chars: usize,
) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut current: Option<(usize, usize)> = None;

    let flush = |current: &mut Option<(usize, usize)>, spans: &mut Vec<Span>| {
        if let Some((s, e)) = current.take() {
            spans.push(Span {
                start: s,
                end: e,
                section: section.clone(),
            });
        }
    };

    for (ps, pe) in paragraphs(text, start, end) {
        let para_chars = text[ps..pe].chars().count();

        if para_chars > max_chars {
            flush(&mut current, &mut spans);
            let splitter = TextSplitter::new(ChunkConfig::new(max_chars));
            for (offset, piece) in splitter.chunk_indices(&text[ps..pe]) {
                if piece.is_empty() {
                    continue;
                }
                current = Some((ps + offset, ps + offset + piece.len()));
                flush(&mut current, &mut spans);
            }
            continue;
        }

        if let Some((cs, _)) = current {
            if text[cs..pe].chars().count() > max_chars {
                flush(&mut current, &mut spans);
                current = Some((ps, pe));
            } else {
                current = Some((cs, pe));
            }
        } else {
            current = Some((ps, pe));
        }
    }
    flush(&mut current, &mut spans);

    spans
}

/// Trimmed, non-empty paragraph spans inside `[start, end)`
fn paragraphs(text: &str, start: usize, end: usize) -> Vec<(usize, usize)> {
    let region = &text[start..end];
    let mut out = Vec::new();
    let mut cursor = 0;

    let breaks = PARAGRAPH_BREAK
        .find_iter(region)
        .map(|m| (m.start(), m.end()))
        .chain(std::iter::once((region.len(), region.len())));

    for (break_start, break_end) in breaks {
        let piece = &region[cursor..break_start];
        let leading = piece.len() - piece.trim_start().len();
        let trimmed = piece.trim();
        if !trimmed.is_empty() {
            let s = start + cursor + leading;
            out.push((s, s + trimmed.len()));
        }
        cursor = break_end;
    }

    out
}

/// Entity density plus legal signal terms, clamped to [0, 1]
fn importance_score(content: &str, entity_count: usize) -> f32 {
    let lower = turkish_lowercase(content);
    let words = content.split_whitespace().count().max(1) as f32;

    let density = ((entity_count as f32 / words) / ENTITIES_PER_WORD_SATURATION).min(1.0);
    let signals = SIGNAL_TERMS.iter().filter(|t| lower.contains(*t)).count() as f32
        / SIGNAL_TERMS.len() as f32;

    (0.5 * density + 0.5 * signals).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUTE: &str = "KİŞİSEL VERİLERİN KORUNMASI KANUNU\n\n\
        Kanun Numarası: 6698\n\n\
        MADDE 4 - (1) Kişisel veriler, ancak bu Kanunda ve diğer kanunlarda öngörülen usul ve esaslara uygun olarak işlenebilir.\n\n\
        (2) Kişisel verilerin işlenmesinde hukuka ve dürüstlük kurallarına uygun olma ilkelerine uyulması zorunludur.\n\n\
        MADDE 5 - (1) Kişisel veriler ilgili kişinin açık rızası olmaksızın işlenemez.\n\n\
        (2) Aşağıdaki şartlardan birinin varlığı hâlinde, ilgili kişinin açık rızası aranmaksızın kişisel verilerinin işlenmesi mümkündür.";

    fn small() -> ChunkingConfig {
        ChunkingConfig { max_chunk_chars: 200 }
    }

    #[test]
    fn test_small_text_single_chunk() {
        let chunks = semantic_chunk("Kısa bir metin.", "doc1", "Deneme");
        assert_eq!(chunks.len(), 1);
        let meta = &chunks[0].metadata;
        assert_eq!(meta.chunk_index, 0);
        assert_eq!(meta.total_chunks, 1);
        assert_eq!(meta.char_start, 0);
        assert_eq!(meta.char_end, "Kısa bir metin.".len());
        assert_eq!(meta.kind, ChunkKind::Document);
        assert_eq!(chunks[0].id, "doc1_chunk_0");
    }

    #[test]
    fn test_empty_text() {
        assert!(semantic_chunk("", "doc1", "Boş").is_empty());
    }

    #[test]
    fn test_whitespace_only_text_is_one_chunk() {
        let text = " \n\n ";
        let chunks = semantic_chunk(text, "doc1", "Boş");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].metadata.kind, ChunkKind::Document);
        assert_eq!(chunks[0].metadata.char_start, 0);
        assert_eq!(chunks[0].metadata.char_end, text.len());
        assert_eq!(chunks[0].content, text);

        let long = " ".repeat(500);
        let chunks = semantic_chunk_with_config(&long, "doc1", "Boş", &small());
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].metadata.char_end, long.len());
    }

    #[test]
    fn test_headings_start_sections() {
        let chunks = semantic_chunk_with_config(STATUTE, "kvkk", "KVKK", &small());
        assert!(chunks.len() > 2);

        let sections: Vec<_> = chunks
            .iter()
            .filter_map(|c| c.metadata.section.as_deref())
            .collect();
        assert!(sections.contains(&"Madde 4"));
        assert!(sections.contains(&"Madde 5"));

        // No chunk straddles two articles
        for chunk in &chunks {
            let headings = HEADING_PATTERN.find_iter(&chunk.content).count();
            assert!(headings <= 1, "chunk spans two headings: {}", chunk.content);
        }
        assert_eq!(chunks[0].metadata.kind, ChunkKind::Paragraph);
    }

    #[test]
    fn test_offsets_address_source() {
        let chunks = semantic_chunk_with_config(STATUTE, "kvkk", "KVKK", &small());
        for chunk in &chunks {
            let meta = &chunk.metadata;
            assert!(meta.char_start < meta.char_end);
            assert_eq!(&STATUTE[meta.char_start..meta.char_end], chunk.content);
        }
    }

    #[test]
    fn test_chunk_indices_contiguous() {
        let text = (0..50)
            .map(|i| format!("Paragraf numarası {} ve biraz daha metin.", i))
            .collect::<Vec<_>>()
            .join("\n\n");
        let chunks = semantic_chunk_with_config(&text, "doc1", "Uzun", &small());
        assert!(chunks.len() > 1);
        for (i, c) in chunks.iter().enumerate() {
            assert_eq!(c.metadata.chunk_index, i, "Index mismatch at position {}", i);
            assert_eq!(c.metadata.total_chunks, chunks.len());
            assert!(c.content.chars().count() <= 200);
        }
    }

    #[test]
    fn test_oversized_paragraph_hard_split() {
        let text = "kelime ".repeat(100);
        let chunks = semantic_chunk_with_config(&text, "doc1", "Tek", &ChunkingConfig {
            max_chunk_chars: 50,
        });
        assert!(chunks.len() > 1);
        for c in &chunks {
            assert!(c.content.chars().count() <= 50);
            assert_eq!(&text[c.metadata.char_start..c.metadata.char_end], c.content);
        }
    }

    #[test]
    fn test_entities_and_importance() {
        let chunks = semantic_chunk_with_config(STATUTE, "kvkk", "KVKK", &small());
        let article5 = chunks
            .iter()
            .find(|c| c.metadata.section.as_deref() == Some("Madde 5"))
            .unwrap();
        assert!(article5.metadata.entities.contains(&"madde 5".to_string()));

        for chunk in &chunks {
            let importance = chunk.importance();
            assert!((0.0..=1.0).contains(&importance));
        }
        assert!(article5.importance() > 0.0);
    }

    #[test]
    fn test_short_text_with_heading_is_labelled() {
        let chunks = semantic_chunk("MADDE 7 - Bu Kanun yayımı tarihinde yürürlüğe girer.", "d", "T");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].metadata.section.as_deref(), Some("Madde 7"));
    }

    #[test]
    fn test_importance_bounds() {
        assert_eq!(importance_score("sıradan bir cümle", 0), 0.0);
        let heavy = importance_score("madde kanun karar hüküm", 10);
        assert!((heavy - 1.0).abs() < f32::EPSILON);
    }
}
