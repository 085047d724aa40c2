//! RAG Pipeline - End-to-end preparation and post-processing
//!
//! `prepare` turns a question and caller-owned chunks into the context
//! handed to the generation provider. `finalize` turns the provider's
//! answer and grounding metadata into a cited, validated answer.

use crate::assembler::format_context_from_results;
use crate::citation::{add_citations, extract_citation_numbers, validate_citations, CitationValidation};
use crate::window::{build_context, ContextOptions, ContextWindow};
use lexforge_common::config::LexConfig;
use lexforge_common::context::QueryAnalyzer;
use lexforge_common::models::{Chunk, Conversation, EvidenceSource, GroundingMetadata, QueryAnalysis};
use lexforge_search::{EntityReranker, KeywordRetriever, RetrievalResult, Retriever};
use serde::Serialize;
use tracing::debug;

/// Everything the generation step needs for one question
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedContext<'a> {
    pub analysis: QueryAnalysis,

    /// Reranked results, truncated to the configured maximum
    pub results: Vec<RetrievalResult<'a>>,

    /// Rendered `results`
    pub context: String,

    /// Budgeted history when a conversation was supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<ContextWindow>,
}

/// Answer with inline citations and their integrity report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedAnswer {
    pub text: String,

    /// Citation numbers present in `text`
    pub citations: Vec<usize>,

    pub validation: CitationValidation,

    /// Grounding sources in chunk order, so `[n]` refers to `sources[n - 1]`
    pub sources: Vec<EvidenceSource>,
}

pub struct RagPipeline {
    analyzer: QueryAnalyzer,
    retriever: Box<dyn Retriever>,
    reranker: EntityReranker,
    max_results: usize,
    window_options: ContextOptions,
}

impl RagPipeline {
    pub fn new(config: &LexConfig) -> Self {
        Self {
            analyzer: QueryAnalyzer::default(),
            retriever: Box::new(KeywordRetriever::from(&config.retrieval)),
            reranker: EntityReranker::from(&config.retrieval),
            max_results: config.context.max_results,
            window_options: ContextOptions::from(&config.context),
        }
    }

    /// Swap the retrieval strategy
    pub fn with_retriever(mut self, retriever: Box<dyn Retriever>) -> Self {
        self.retriever = retriever;
        self
    }

    pub fn with_analyzer(mut self, analyzer: QueryAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Analyze, retrieve, rerank, truncate and render.
    ///
    /// Reranking sees every retrieved candidate; truncation to
    /// `max_results` happens afterwards so an entity boost can promote a
    /// chunk that keyword scoring alone would have cut.
    pub fn prepare<'a>(
        &self,
        query: &str,
        chunks: &'a [Chunk],
        conversation: Option<&Conversation>,
    ) -> PreparedContext<'a> {
        let analysis = self.analyzer.analyze(query);
        // Explicit limit so a retriever's own default cannot cut candidates
        let candidates = self.retriever.retrieve(chunks, &analysis, Some(chunks.len()));
        let mut results = self.reranker.rerank(candidates, &analysis);
        results.truncate(self.max_results);

        let context = format_context_from_results(&results);
        let history = conversation.map(|conv| build_context(conv, &self.window_options));

        debug!(
            intent = ?analysis.intent,
            results = results.len(),
            context_chars = context.chars().count(),
            history_messages = history.as_ref().map(|h| h.messages.len()),
            "Context prepared"
        );

        PreparedContext {
            analysis,
            results,
            context,
            history,
        }
    }

    /// Attach citations to the provider's answer and validate them
    pub fn finalize(
        &self,
        answer: &str,
        grounding: Option<&GroundingMetadata>,
        source_count: usize,
    ) -> AnnotatedAnswer {
        let text = add_citations(answer, grounding);
        let citations = extract_citation_numbers(&text);
        let validation = validate_citations(&text, source_count);

        let sources: Vec<EvidenceSource> = grounding
            .map(|meta| {
                meta.grounding_chunks
                    .iter()
                    .map(|chunk| match &chunk.web {
                        Some(web) => EvidenceSource {
                            title: web.title.clone(),
                            uri: web.uri.clone(),
                        },
                        None => EvidenceSource {
                            title: String::new(),
                            uri: String::new(),
                        },
                    })
                    .collect()
            })
            .unwrap_or_default();

        debug!(
            citations = citations.len(),
            invalid = validation.invalid_citations.len(),
            "Answer finalized"
        );

        AnnotatedAnswer {
            text,
            citations,
            validation,
            sources,
        }
    }
}

impl Default for RagPipeline {
    fn default() -> Self {
        Self::new(&LexConfig::default())
    }
}
