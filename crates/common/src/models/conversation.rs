//! Conversation history types

use super::grounding::EvidenceSource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title given to a conversation before its first user message
pub const DEFAULT_CONVERSATION_TITLE: &str = "Yeni Konuşma";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,

    pub title: String,

    /// Chronological
    pub messages: Vec<Message>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<ConversationSummary>,

    pub metadata: ConversationMetadata,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMetadata {
    pub message_count: usize,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub legal_topics: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,

    pub role: MessageRole,

    pub content: String,

    pub timestamp: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageMetadata {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<EvidenceSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_score: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<usize>,
}

/// Rule-based digest of a long conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    /// At most 5 topic labels
    pub main_topics: Vec<String>,

    /// At most 10 entity texts
    pub key_entities: Vec<String>,

    /// At most 3 concluding sentences from assistant turns
    pub conclusions: Vec<String>,

    pub last_updated: DateTime<Utc>,

    /// Number of messages the summary was computed over
    #[serde(default)]
    pub message_count: usize,
}

impl Conversation {
    /// Empty conversation with the default title
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: DEFAULT_CONVERSATION_TITLE.to_string(),
            messages: Vec::new(),
            summary: None,
            metadata: ConversationMetadata::default(),
            created_at: Utc::now(),
        }
    }

    /// Append a message and keep the count in sync
    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
        self.metadata.message_count = self.messages.len();
    }

    /// Replace the summary and mirror its topics into the metadata
    pub fn set_summary(&mut self, summary: ConversationSummary) {
        self.metadata.legal_topics = summary.main_topics.clone();
        self.summary = Some(summary);
    }
}

impl Message {
    /// New message stamped with a random id and the current time
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            metadata: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    pub fn with_metadata(mut self, metadata: MessageMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}
