//! LexForge Common Library
//!
//! Shared code for all LexForge crates including:
//! - Data model (chunks, conversations, grounding metadata)
//! - Query analysis (intent, entities, keywords, expansion)
//! - Error types and handling
//! - Configuration management
//! - Metrics and tracing bootstrap

pub mod config;
pub mod context;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod telemetry;
pub mod text;

// Re-export commonly used types
pub use config::LexConfig;
pub use context::{QueryAnalyzer, QueryAnalyzerConfig};
pub use errors::{AppError, Result};
pub use models::{Chunk, ChunkMetadata, Entity, EntityKind, QueryAnalysis, QueryIntent};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
