//! Offset-addressed document chunk

use serde::{Deserialize, Serialize};

/// An independently retrievable unit of a source document.
///
/// Produced once by the chunker and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    pub id: String,

    pub content: String,

    pub metadata: ChunkMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkMetadata {
    pub document_id: String,

    pub document_title: String,

    /// Dense `0..total_chunks` within one document
    pub chunk_index: usize,

    pub total_chunks: usize,

    #[serde(rename = "type")]
    pub kind: ChunkKind,

    /// Byte offset of the first content byte in the source text
    pub char_start: usize,

    /// Byte offset one past the last content byte
    pub char_end: usize,

    /// Heading label such as "Madde 5"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,

    /// Canonical entity texts found inside the chunk
    #[serde(default)]
    pub entities: Vec<String>,

    /// Heuristic weight in [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<f32>,
}

/// How the chunk boundary was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    /// Whole document fit in one chunk
    Document,
    /// Starts at a `MADDE N` heading
    Article,
    /// Paragraph group without a heading
    Paragraph,
}

impl Chunk {
    /// Importance with absent values treated as zero
    pub fn importance(&self) -> f32 {
        self.metadata.importance.unwrap_or(0.0)
    }

    /// Whether the chunk carries the given canonical entity text
    pub fn has_entity(&self, canonical: &str) -> bool {
        self.metadata.entities.iter().any(|e| e == canonical)
    }
}
