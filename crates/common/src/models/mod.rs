//! Shared data model
//!
//! Types exchanged between the chunker, retriever, context assembler and
//! citation attacher. JSON field names are camelCase to match the UI layer
//! and the generation provider.

mod chunk;
mod conversation;
mod grounding;
mod query;

pub use chunk::{Chunk, ChunkKind, ChunkMetadata};
pub use conversation::{
    Conversation, ConversationMetadata, ConversationSummary, Message, MessageMetadata,
    MessageRole, DEFAULT_CONVERSATION_TITLE,
};
pub use grounding::{
    EvidenceSource, GroundingChunk, GroundingMetadata, GroundingSupport, Segment, WebSource,
};
pub use query::{Entity, EntityKind, QueryAnalysis, QueryFilters, QueryIntent};
