//! Query analysis result types

use crate::text::canonicalize;
use serde::{Deserialize, Serialize};

/// Query understanding result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryAnalysis {
    /// Original query text, untouched
    pub original_query: String,

    /// Detected intent
    pub intent: QueryIntent,

    /// Extracted entities, one per distinct matched text
    pub entities: Vec<Entity>,

    /// Lower-cased content words
    pub keywords: Vec<String>,

    /// Synonym variants; the original query is always first
    pub expanded_queries: Vec<String>,

    /// Retrieval filters derived from entities
    pub filters: QueryFilters,
}

/// Query intent classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryIntent {
    /// Looking up a statute by number
    FindLaw,
    /// Looking for court decisions / precedent
    FindCase,
    /// Asking what a legal term means
    ExplainConcept,
    /// Comparing two institutions or rules
    Compare,
    /// Asking how a procedure is carried out
    Procedure,
    /// Unknown/general
    General,
}

/// Extracted legal entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(flatten)]
    pub kind: EntityKind,

    /// Text exactly as matched
    pub text: String,

    /// Byte offset in the scanned text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

/// Types of entities we can extract
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityKind {
    /// "6698 sayılı"
    Law { number: u32 },
    /// "madde 5"
    Article { number: u32 },
    /// "2019/1234 E."
    Case { docket: String },
    /// "Yargıtay"
    Court { name: String },
}

impl Entity {
    /// Comparison form used for chunk metadata and reranking
    pub fn canonical(&self) -> String {
        canonicalize(&self.text)
    }
}

/// Filters derived from extracted entities
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryFilters {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub courts: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub law_numbers: Vec<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_serializes_with_type_tag() {
        let entity = Entity {
            kind: EntityKind::Law { number: 6698 },
            text: "6698 sayılı".to_string(),
            offset: Some(0),
        };
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["type"], "law");
        assert_eq!(json["number"], 6698);
        assert_eq!(json["text"], "6698 sayılı");

        let back: Entity = serde_json::from_value(json).unwrap();
        assert_eq!(back, entity);
    }

    #[test]
    fn test_intent_wire_names() {
        let json = serde_json::to_string(&QueryIntent::ExplainConcept).unwrap();
        assert_eq!(json, "\"explain_concept\"");
    }
}
