//! Query Understanding
//!
//! Rule tables shared by every stage of the engine:
//! - Intent classification
//! - Legal entity extraction
//! - Keyword extraction and synonym expansion

mod entities;
mod intent;
mod query_analyzer;

pub use entities::{extract_entities, extract_entity_texts};
pub use intent::classify_intent;
pub use query_analyzer::{analyze_query, extract_keywords, QueryAnalyzer, QueryAnalyzerConfig};
