//! LexForge Context Engine
//!
//! Everything between retrieval and the generation call, and back:
//! - Rendering ranked chunks into a model-ready context block
//! - Token-budgeted conversation windows with rule-based summaries
//! - Inline `[n]` citations from provider grounding spans
//! - Conversation repository seam with an in-memory store
//! - `RagPipeline` wiring analyzer, retrieval, reranking and formatting

pub mod assembler;
pub mod citation;
pub mod manager;
pub mod pipeline;
pub mod store;
pub mod summarizer;
pub mod window;

pub use assembler::format_context_from_results;
pub use citation::{add_citations, extract_citation_numbers, validate_citations, CitationValidation};
pub use manager::ConversationManager;
pub use pipeline::{AnnotatedAnswer, PreparedContext, RagPipeline};
pub use store::{ConversationRepository, InMemoryConversationStore};
pub use summarizer::{generate_summary, needs_summarization, needs_summarization_with, SummaryPolicy};
pub use window::{build_context, estimate_tokens, format_summary, ContextOptions, ContextWindow};
