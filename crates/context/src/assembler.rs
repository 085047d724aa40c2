//! Context Assembler - Renders ranked chunks for the generation step

use lexforge_search::RetrievalResult;

/// `---` line placed between rendered chunks
const DIVIDER: &str = "\n---\n";

/// Render results as `[title]` / `[title - section]` headed blocks.
///
/// Blocks are separated by a `---` line. No results renders as `""`.
pub fn format_context_from_results(results: &[RetrievalResult<'_>]) -> String {
    results
        .iter()
        .map(|result| {
            let meta = &result.chunk.metadata;
            let header = match &meta.section {
                Some(section) => format!("[{} - {}]", meta.document_title, section),
                None => format!("[{}]", meta.document_title),
            };
            format!("{}\n{}", header, result.chunk.content)
        })
        .collect::<Vec<_>>()
        .join(DIVIDER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexforge_common::models::{Chunk, ChunkKind, ChunkMetadata};
    use lexforge_search::MatchType;

    fn make_chunk(title: &str, section: Option<&str>, content: &str) -> Chunk {
        Chunk {
            id: format!("{}_chunk_0", title),
            content: content.to_string(),
            metadata: ChunkMetadata {
                document_id: title.to_string(),
                document_title: title.to_string(),
                chunk_index: 0,
                total_chunks: 1,
                kind: ChunkKind::Article,
                char_start: 0,
                char_end: content.len(),
                section: section.map(str::to_string),
                entities: Vec::new(),
                importance: None,
            },
        }
    }

    fn result(chunk: &Chunk) -> RetrievalResult<'_> {
        RetrievalResult {
            chunk,
            score: 1.0,
            match_type: MatchType::Keyword,
        }
    }

    #[test]
    fn test_empty_results() {
        assert_eq!(format_context_from_results(&[]), "");
    }

    #[test]
    fn test_section_header() {
        let chunk = make_chunk("KVKK", Some("Madde 5"), "X");
        let out = format_context_from_results(&[result(&chunk)]);
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("[KVKK - Madde 5]"));
        assert_eq!(lines.next(), Some("X"));
    }

    #[test]
    fn test_title_only_header() {
        let chunk = make_chunk("Yargıtay 9. HD", None, "Karar metni");
        assert_eq!(
            format_context_from_results(&[result(&chunk)]),
            "[Yargıtay 9. HD]\nKarar metni"
        );
    }

    #[test]
    fn test_single_divider_between_two_blocks() {
        let a = make_chunk("TBK", Some("Madde 1"), "Birinci");
        let b = make_chunk("TMK", None, "İkinci");
        let out = format_context_from_results(&[result(&a), result(&b)]);
        assert_eq!(out.matches("---").count(), 1);
        assert_eq!(out, "[TBK - Madde 1]\nBirinci\n---\n[TMK]\nİkinci");
    }
}
