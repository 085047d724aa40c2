//! Metrics helpers
//!
//! Records engine counters through the `metrics` facade. No exporter is
//! bundled; without an installed recorder every call is a no-op.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};

pub const CHUNKS_CREATED: &str = "lexforge_chunks_created_total";
pub const RETRIEVAL_QUERIES: &str = "lexforge_retrieval_queries_total";
pub const RETRIEVAL_RESULTS: &str = "lexforge_retrieval_results";
pub const RERANK_BOOSTED: &str = "lexforge_rerank_boosted_total";
pub const CITATIONS_INSERTED: &str = "lexforge_citations_inserted_total";
pub const CITATIONS_SKIPPED: &str = "lexforge_citations_skipped_total";
pub const SUMMARIES_GENERATED: &str = "lexforge_summaries_generated_total";

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(CHUNKS_CREATED, Unit::Count, "Total chunks produced by the chunker");
    describe_counter!(RETRIEVAL_QUERIES, Unit::Count, "Total keyword retrieval calls");
    describe_histogram!(
        RETRIEVAL_RESULTS,
        Unit::Count,
        "Results returned per retrieval call"
    );
    describe_counter!(
        RERANK_BOOSTED,
        Unit::Count,
        "Results that received an entity boost"
    );
    describe_counter!(
        CITATIONS_INSERTED,
        Unit::Count,
        "Citation markers inserted into answers"
    );
    describe_counter!(
        CITATIONS_SKIPPED,
        Unit::Count,
        "Grounding supports skipped for invalid offsets"
    );
    describe_counter!(
        SUMMARIES_GENERATED,
        Unit::Count,
        "Conversation summaries generated"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record chunking output
pub fn record_chunking(chunk_count: usize) {
    counter!(CHUNKS_CREATED).increment(chunk_count as u64);
}

/// Helper to record a retrieval call
pub fn record_retrieval(result_count: usize) {
    counter!(RETRIEVAL_QUERIES).increment(1);
    histogram!(RETRIEVAL_RESULTS).record(result_count as f64);
}

/// Helper to record reranking boosts
pub fn record_rerank(boosted: usize) {
    counter!(RERANK_BOOSTED).increment(boosted as u64);
}

/// Helper to record citation insertion
pub fn record_citations(inserted: usize, skipped: usize) {
    counter!(CITATIONS_INSERTED).increment(inserted as u64);
    counter!(CITATIONS_SKIPPED).increment(skipped as u64);
}

/// Helper to record a summary regeneration
pub fn record_summary() {
    counter!(SUMMARIES_GENERATED).increment(1);
}
