//! Configuration management for LexForge
//!
//! Supports loading configuration from:
//! - A `.env` file (via dotenvy)
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config/default, config/{APP_ENV}, config/local)
//! - Default values

use crate::errors::{AppError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Main engine configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LexConfig {
    /// Document chunking
    #[serde(default)]
    pub chunking: ChunkingSettings,

    /// Keyword retrieval and reranking
    #[serde(default)]
    pub retrieval: RetrievalSettings,

    /// Context assembly and conversation windowing
    #[serde(default)]
    pub context: ContextSettings,

    /// Conversation summarization trigger
    #[serde(default)]
    pub summary: SummarySettings,

    /// Logging configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChunkingSettings {
    /// Maximum characters per chunk
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetrievalSettings {
    /// Default result limit (None = unbounded)
    #[serde(default)]
    pub default_limit: Option<usize>,

    /// Additive score boost per query entity found in a chunk
    #[serde(default = "default_entity_boost")]
    pub entity_boost: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContextSettings {
    /// Maximum history messages in the window
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,

    /// Token budget for the history window
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Prepend the conversation summary when older messages are cut
    #[serde(default = "default_include_summary")]
    pub include_summary: bool,

    /// Retrieval results rendered into the model context
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SummarySettings {
    /// Message count at which summarization starts
    #[serde(default = "default_trigger_threshold")]
    pub trigger_threshold: usize,

    /// New messages required before a summary is refreshed
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logging: bool,

    /// Service name attached to log lines
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

// Default value functions
fn default_max_chunk_chars() -> usize { 1000 }
fn default_entity_boost() -> f32 { 0.2 }
fn default_max_messages() -> usize { 20 }
fn default_max_tokens() -> usize { 4000 }
fn default_include_summary() -> bool { true }
fn default_max_results() -> usize { 5 }
fn default_trigger_threshold() -> usize { 20 }
fn default_refresh_interval() -> usize { 10 }
fn default_log_level() -> String { "info".to_string() }
fn default_service_name() -> String { "lexforge".to_string() }

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            max_chunk_chars: default_max_chunk_chars(),
        }
    }
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            default_limit: None,
            entity_boost: default_entity_boost(),
        }
    }
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            max_messages: default_max_messages(),
            max_tokens: default_max_tokens(),
            include_summary: default_include_summary(),
            max_results: default_max_results(),
        }
    }
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            trigger_threshold: default_trigger_threshold(),
            refresh_interval: default_refresh_interval(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: false,
            service_name: default_service_name(),
        }
    }
}

impl LexConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., APP__RETRIEVAL__ENTITY_BOOST=0.3
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: LexConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a specific file (format inferred from the extension)
    pub fn from_file(path: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: LexConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the algorithms cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.chunking.max_chunk_chars == 0 {
            return Err(AppError::invalid_field(
                "chunking.max_chunk_chars",
                "must be greater than zero",
            ));
        }
        if self.context.max_messages == 0 {
            return Err(AppError::invalid_field(
                "context.max_messages",
                "must be greater than zero",
            ));
        }
        if self.context.max_tokens == 0 {
            return Err(AppError::invalid_field(
                "context.max_tokens",
                "must be greater than zero",
            ));
        }
        let boost = self.retrieval.entity_boost;
        if !boost.is_finite() || boost < 0.0 {
            return Err(AppError::invalid_field(
                "retrieval.entity_boost",
                format!("must be a non-negative number, got {}", boost),
            ));
        }
        if self.summary.refresh_interval == 0 {
            return Err(AppError::invalid_field(
                "summary.refresh_interval",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}
