//! Entity-overlap reranking
//!
//! Second scoring pass over retrieval results. Every query entity that the
//! chunker also found inside a chunk adds a fixed boost to that chunk's
//! score; results are then re-sorted.

use crate::retrieval::RetrievalResult;
use lexforge_common::config::RetrievalSettings;
use lexforge_common::metrics;
use lexforge_common::models::QueryAnalysis;
use std::collections::HashSet;
use tracing::debug;

/// Default additive boost per shared entity
pub const DEFAULT_ENTITY_BOOST: f32 = 0.2;

/// Reranker that boosts results sharing entities with the query
#[derive(Debug, Clone, Copy)]
pub struct EntityReranker {
    weight: f32,
}

impl Default for EntityReranker {
    fn default() -> Self {
        Self {
            weight: DEFAULT_ENTITY_BOOST,
        }
    }
}

impl From<&RetrievalSettings> for EntityReranker {
    fn from(settings: &RetrievalSettings) -> Self {
        Self::new(settings.entity_boost)
    }
}

impl EntityReranker {
    pub fn new(weight: f32) -> Self {
        Self { weight }
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Apply entity boosts and re-sort, keeping the prior order for equal scores
    pub fn rerank<'a>(
        &self,
        mut results: Vec<RetrievalResult<'a>>,
        query: &QueryAnalysis,
    ) -> Vec<RetrievalResult<'a>> {
        if results.is_empty() {
            return results;
        }

        // The same entity mentioned twice in a question boosts once
        let mut seen = HashSet::new();
        let query_entities: Vec<String> = query
            .entities
            .iter()
            .map(|e| e.canonical())
            .filter(|c| seen.insert(c.clone()))
            .collect();

        let mut boosted = 0;
        for result in results.iter_mut() {
            let shared = query_entities
                .iter()
                .filter(|entity| result.chunk.has_entity(entity))
                .count();
            if shared > 0 {
                result.score += self.weight * shared as f32;
                boosted += 1;
            }
        }

        results.sort_by(|a, b| b.score.total_cmp(&a.score));

        debug!(
            results = results.len(),
            query_entities = query_entities.len(),
            boosted,
            "Rerank complete"
        );
        metrics::record_rerank(boosted);

        results
    }
}

/// Rerank with the default boost
pub fn rerank_results<'a>(
    results: Vec<RetrievalResult<'a>>,
    query: &QueryAnalysis,
) -> Vec<RetrievalResult<'a>> {
    EntityReranker::default().rerank(results, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::{keyword_retrieval, MatchType};
    use lexforge_common::context::analyze_query;
    use lexforge_common::models::{Chunk, ChunkKind, ChunkMetadata};

    fn make_chunk(index: usize, content: &str, entities: &[&str]) -> Chunk {
        Chunk {
            id: format!("doc_chunk_{}", index),
            content: content.to_string(),
            metadata: ChunkMetadata {
                document_id: "doc".to_string(),
                document_title: "KVKK".to_string(),
                chunk_index: index,
                total_chunks: 3,
                kind: ChunkKind::Article,
                char_start: index * 50,
                char_end: index * 50 + content.len(),
                section: None,
                entities: entities.iter().map(|e| e.to_string()).collect(),
                importance: None,
            },
        }
    }

    fn result(chunk: &Chunk, score: f32) -> RetrievalResult<'_> {
        RetrievalResult {
            chunk,
            score,
            match_type: MatchType::Keyword,
        }
    }

    #[test]
    fn test_empty_input() {
        let query = analyze_query("6698 sayılı kanun madde 5");
        assert!(rerank_results(Vec::new(), &query).is_empty());
    }

    #[test]
    fn test_entity_overlap_promotes_result() {
        let chunks = vec![
            make_chunk(0, "Genel hükümler", &[]),
            make_chunk(1, "İşleme şartları", &["madde 5", "6698 sayılı"]),
        ];
        let query = analyze_query("6698 sayılı kanun madde 5 nedir?");
        let results = vec![result(&chunks[0], 0.6), result(&chunks[1], 0.5)];

        let reranked = rerank_results(results, &query);
        assert_eq!(reranked[0].chunk.id, "doc_chunk_1");
        assert!((reranked[0].score - 0.9).abs() < 1e-6);
        assert!((reranked[1].score - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_canonical_comparison() {
        let chunks = vec![make_chunk(0, "MADDE 5 - Şartlar", &["madde 5"])];
        let query = analyze_query("MADDE   5 kapsamı");
        let reranked = rerank_results(vec![result(&chunks[0], 0.1)], &query);
        assert!((reranked[0].score - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_stable_for_equal_scores() {
        let chunks = vec![
            make_chunk(0, "a", &["madde 5"]),
            make_chunk(1, "b", &["madde 5"]),
            make_chunk(2, "c", &["madde 5"]),
        ];
        let query = analyze_query("madde 5");
        let results = chunks.iter().map(|c| result(c, 0.5)).collect();
        let ids: Vec<_> = rerank_results(results, &query)
            .iter()
            .map(|r| r.chunk.id.clone())
            .collect();
        assert_eq!(ids, vec!["doc_chunk_0", "doc_chunk_1", "doc_chunk_2"]);
    }

    #[test]
    fn test_no_query_entities_still_sorts() {
        let chunks = vec![make_chunk(0, "a", &["madde 5"]), make_chunk(1, "b", &[])];
        let query = analyze_query("kira artışı");
        assert!(query.entities.is_empty());

        let results = vec![result(&chunks[1], 0.2), result(&chunks[0], 0.7)];
        let reranked = rerank_results(results, &query);
        let scores: Vec<f32> = reranked.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![0.7, 0.2]);
        assert_eq!(reranked[0].chunk.id, "doc_chunk_0");
    }

    #[test]
    fn test_custom_weight_and_chunks_untouched() {
        let chunks = vec![make_chunk(0, "Yargıtay kararı", &["yargıtay"])];
        let snapshot = chunks.clone();
        let query = analyze_query("Yargıtay içtihadı");
        let retrieved = keyword_retrieval(&chunks, &query, None);
        let base = retrieved[0].score;

        let reranked = EntityReranker::new(1.0).rerank(retrieved, &query);
        assert!((reranked[0].score - (base + 1.0)).abs() < 1e-6);
        assert_eq!(chunks, snapshot);
    }
}
