//! LexForge Search
//!
//! Lexical retrieval over caller-owned chunks:
//! - Keyword overlap scoring against analyzed queries
//! - Entity-overlap reranking

pub mod rerank;
pub mod retrieval;

pub use rerank::{rerank_results, EntityReranker};
pub use retrieval::{keyword_retrieval, KeywordRetriever, MatchType, RetrievalResult, Retriever};
