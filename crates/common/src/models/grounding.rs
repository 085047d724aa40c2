//! Grounding metadata returned by the generation provider
//!
//! Every field is optional on the wire; a provider that returns a partial
//! payload still deserializes.

use crate::errors::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub web_search_queries: Vec<String>,

    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,

    #[serde(default)]
    pub grounding_supports: Vec<GroundingSupport>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingChunk {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<WebSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSource {
    #[serde(default)]
    pub uri: String,

    #[serde(default)]
    pub title: String,
}

/// Links an answer span to the grounding chunks that back it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingSupport {
    #[serde(default)]
    pub segment: Segment,

    /// Zero-based indices into `grounding_chunks`
    #[serde(default)]
    pub grounding_chunk_indices: Vec<i64>,

    #[serde(default)]
    pub confidence_scores: Vec<f32>,
}

/// Answer span; offsets are signed so malformed values survive parsing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_index: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Source shown to the user next to an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceSource {
    pub title: String,
    pub uri: String,
}

impl GroundingMetadata {
    /// Parse the provider's JSON payload
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// True when there is nothing to attach
    pub fn is_empty(&self) -> bool {
        self.grounding_supports.is_empty()
    }
}

impl GroundingSupport {
    /// Support ending at `end_index` citing the given zero-based chunks
    pub fn ending_at(end_index: i64, chunk_indices: Vec<i64>) -> Self {
        Self {
            segment: Segment {
                start_index: None,
                end_index: Some(end_index),
                text: None,
            },
            grounding_chunk_indices: chunk_indices,
            confidence_scores: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provider_payload() {
        let json = r#"{
            "webSearchQueries": ["kvkk madde 5"],
            "groundingChunks": [{"web": {"uri": "https://mevzuat.gov.tr/x", "title": "KVKK"}}],
            "groundingSupports": [
                {"segment": {"startIndex": 0, "endIndex": 12, "text": "Bu bir tespit"},
                 "groundingChunkIndices": [0], "confidenceScores": [0.9]}
            ]
        }"#;
        let meta = GroundingMetadata::from_json(json).unwrap();
        assert_eq!(meta.grounding_chunks.len(), 1);
        assert_eq!(meta.grounding_supports[0].segment.end_index, Some(12));
        assert!(!meta.is_empty());
    }

    #[test]
    fn test_partial_payload_defaults() {
        let meta = GroundingMetadata::from_json(r#"{"groundingSupports": [{}]}"#).unwrap();
        assert_eq!(meta.grounding_supports[0].segment.end_index, None);
        assert!(meta.grounding_supports[0].grounding_chunk_indices.is_empty());
    }

    #[test]
    fn test_malformed_payload_is_error() {
        assert!(GroundingMetadata::from_json("not json").is_err());
    }
}
