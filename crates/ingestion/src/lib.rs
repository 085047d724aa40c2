//! LexForge Ingestion
//!
//! Turns pre-parsed legal source text (mevzuat, court decisions) into
//! offset-addressed, metadata-tagged chunks. Fetching and parsing raw
//! documents is the caller's job.

pub mod chunker;

pub use chunker::{semantic_chunk, semantic_chunk_with_config, ChunkingConfig};
