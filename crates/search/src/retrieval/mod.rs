//! Retrieval over caller-owned chunks
//!
//! Only lexical keyword matching is implemented. `MatchType` reserves tags
//! for vector and hybrid strategies so results keep a stable shape if those
//! are added behind the `Retriever` trait.

mod keyword;

pub use keyword::{keyword_retrieval, KeywordRetriever};

use lexforge_common::models::{Chunk, QueryAnalysis};
use serde::Serialize;

/// Retrieved chunk with relevance score
///
/// Borrows the chunk: retrieval never copies or mutates the corpus.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalResult<'a> {
    pub chunk: &'a Chunk,

    /// Keyword overlap in [0, 1], plus any rerank boost
    pub score: f32,

    pub match_type: MatchType,
}

/// Retrieval strategy that produced a result
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Lexical keyword overlap
    Keyword,
    /// Embedding similarity (reserved)
    Vector,
    /// Fused lexical + vector (reserved)
    Hybrid,
}

/// Common trait for retrieval strategies
pub trait Retriever: Send + Sync {
    /// Score `chunks` against `query`, best first, at most `limit` results
    fn retrieve<'a>(
        &self,
        chunks: &'a [Chunk],
        query: &QueryAnalysis,
        limit: Option<usize>,
    ) -> Vec<RetrievalResult<'a>>;

    /// Get the match type this retriever produces
    fn match_type(&self) -> MatchType;
}
