//! Keyword retrieval
//!
//! Scores each chunk by the share of query terms it contains. Query terms
//! are the analyzed keywords plus the keywords of every synonym variant, so
//! "KVKK" also finds chunks that spell out "kişisel verilerin korunması".

use super::{MatchType, RetrievalResult, Retriever};
use lexforge_common::config::RetrievalSettings;
use lexforge_common::context::extract_keywords;
use lexforge_common::metrics;
use lexforge_common::models::{Chunk, QueryAnalysis};
use lexforge_common::text::tokenize;
use std::collections::HashSet;
use tracing::debug;

/// Keyword retriever with an optional default limit
#[derive(Debug, Clone, Default)]
pub struct KeywordRetriever {
    default_limit: Option<usize>,
}

impl KeywordRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit applied when a call passes `None`
    pub fn with_default_limit(limit: usize) -> Self {
        Self {
            default_limit: Some(limit),
        }
    }
}

impl From<&RetrievalSettings> for KeywordRetriever {
    fn from(settings: &RetrievalSettings) -> Self {
        Self {
            default_limit: settings.default_limit,
        }
    }
}

impl Retriever for KeywordRetriever {
    fn retrieve<'a>(
        &self,
        chunks: &'a [Chunk],
        query: &QueryAnalysis,
        limit: Option<usize>,
    ) -> Vec<RetrievalResult<'a>> {
        keyword_retrieval(chunks, query, limit.or(self.default_limit))
    }

    fn match_type(&self) -> MatchType {
        MatchType::Keyword
    }
}

/// Rank chunks by keyword overlap with the query.
///
/// Chunks sharing no term with the query are left out. Order is score
/// descending, then importance descending, then corpus order.
pub fn keyword_retrieval<'a>(
    chunks: &'a [Chunk],
    query: &QueryAnalysis,
    limit: Option<usize>,
) -> Vec<RetrievalResult<'a>> {
    let terms = query_terms(query);
    if chunks.is_empty() || terms.is_empty() {
        metrics::record_retrieval(0);
        return Vec::new();
    }

    let mut results: Vec<RetrievalResult<'a>> = chunks
        .iter()
        .filter_map(|chunk| {
            let tokens: HashSet<String> = tokenize(&chunk.content).collect();
            let matched = terms.iter().filter(|t| tokens.contains(*t)).count();
            if matched == 0 {
                return None;
            }
            Some(RetrievalResult {
                chunk,
                score: matched as f32 / terms.len() as f32,
                match_type: MatchType::Keyword,
            })
        })
        .collect();

    let candidates = results.len();

    // Stable sort keeps corpus order for full ties
    results.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.chunk.importance().total_cmp(&a.chunk.importance()))
    });

    if let Some(limit) = limit {
        results.truncate(limit);
    }

    debug!(
        corpus = chunks.len(),
        terms = terms.len(),
        candidates,
        returned = results.len(),
        "Keyword retrieval complete"
    );
    metrics::record_retrieval(results.len());

    results
}

/// Keywords of the query and of each expanded variant, deduplicated
fn query_terms(query: &QueryAnalysis) -> Vec<String> {
    let mut seen = HashSet::new();
    query
        .keywords
        .iter()
        .cloned()
        .chain(
            query
                .expanded_queries
                .iter()
                .flat_map(|variant| extract_keywords(variant)),
        )
        .filter(|term| seen.insert(term.clone()))
        .collect()
}
