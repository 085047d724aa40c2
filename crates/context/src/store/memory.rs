//! In-memory [`ConversationRepository`] for tests and single-process hosts.
//!
//! All conversations live in one `HashMap` behind a `tokio::sync::RwLock`;
//! every mutation holds the write lock for its whole read-modify-write.

use super::ConversationRepository;
use async_trait::async_trait;
use lexforge_common::errors::{AppError, Result};
use lexforge_common::models::{Conversation, ConversationSummary, Message};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

pub struct InMemoryConversationStore {
    conversations: RwLock<HashMap<String, Conversation>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self {
            conversations: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored conversations
    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.conversations.read().await.is_empty()
    }
}

impl Default for InMemoryConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationRepository for InMemoryConversationStore {
    async fn get_or_create(&self, id: &str) -> Result<Conversation> {
        if let Some(conversation) = self.conversations.read().await.get(id) {
            return Ok(conversation.clone());
        }

        let mut conversations = self.conversations.write().await;
        let conversation = conversations.entry(id.to_string()).or_insert_with(|| {
            debug!(conversation_id = %id, "Conversation created");
            Conversation::new(id)
        });
        Ok(conversation.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<Conversation>> {
        Ok(self.conversations.read().await.get(id).cloned())
    }

    async fn add_message(&self, id: &str, message: Message) -> Result<Conversation> {
        let mut conversations = self.conversations.write().await;
        let conversation = conversations
            .entry(id.to_string())
            .or_insert_with(|| Conversation::new(id));
        conversation.push_message(message);
        Ok(conversation.clone())
    }

    async fn update_summary(&self, id: &str, summary: ConversationSummary) -> Result<Conversation> {
        let mut conversations = self.conversations.write().await;
        let conversation = conversations
            .get_mut(id)
            .ok_or_else(|| AppError::ConversationNotFound { id: id.to_string() })?;

        let stored = conversation.summary.as_ref().map(|s| s.message_count);
        if stored.is_some_and(|count| count > summary.message_count) {
            debug!(
                conversation_id = %id,
                stored = ?stored,
                offered = summary.message_count,
                "Stale summary ignored"
            );
            return Ok(conversation.clone());
        }

        conversation.set_summary(summary);
        Ok(conversation.clone())
    }

    async fn update_title(&self, id: &str, title: &str) -> Result<Conversation> {
        let mut conversations = self.conversations.write().await;
        let conversation = conversations
            .get_mut(id)
            .ok_or_else(|| AppError::ConversationNotFound { id: id.to_string() })?;
        conversation.title = title.to_string();
        Ok(conversation.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lexforge_common::errors::ErrorCode;
    use lexforge_common::models::DEFAULT_CONVERSATION_TITLE;
    use std::sync::Arc;

    fn summary(topics: &[&str]) -> ConversationSummary {
        ConversationSummary {
            main_topics: topics.iter().map(|t| t.to_string()).collect(),
            key_entities: Vec::new(),
            conclusions: Vec::new(),
            last_updated: Utc::now(),
            message_count: 0,
        }
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        tokio_test::block_on(async {
            let store = InMemoryConversationStore::new();
            let first = store.get_or_create("c1").await.unwrap();
            let second = store.get_or_create("c1").await.unwrap();
            assert_eq!(first.id, "c1");
            assert_eq!(first.title, DEFAULT_CONVERSATION_TITLE);
            assert_eq!(first.created_at, second.created_at);
            assert_eq!(store.len().await, 1);
        });
    }

    #[tokio::test]
    async fn test_add_message_creates_and_appends() {
        let store = InMemoryConversationStore::new();
        assert!(store.get("c1").await.unwrap().is_none());

        store.add_message("c1", Message::user("Merhaba")).await.unwrap();
        let conv = store
            .add_message("c1", Message::assistant("Buyurun"))
            .await
            .unwrap();

        assert_eq!(conv.messages.len(), 2);
        assert_eq!(conv.metadata.message_count, 2);
        assert_eq!(conv.messages[0].content, "Merhaba");
    }

    #[tokio::test]
    async fn test_update_summary() {
        let store = InMemoryConversationStore::new();
        store.get_or_create("c1").await.unwrap();
        let conv = store
            .update_summary("c1", summary(&["Kira Hukuku"]))
            .await
            .unwrap();
        assert_eq!(conv.metadata.legal_topics, vec!["Kira Hukuku"]);
        assert!(conv.summary.is_some());
    }

    #[tokio::test]
    async fn test_older_summary_does_not_replace_newer() {
        let store = InMemoryConversationStore::new();
        store.get_or_create("c1").await.unwrap();

        let mut newer = summary(&["İş Hukuku"]);
        newer.message_count = 21;
        let mut older = summary(&["Kira Hukuku"]);
        older.message_count = 20;

        store.update_summary("c1", newer).await.unwrap();
        let conv = store.update_summary("c1", older).await.unwrap();
        assert_eq!(conv.summary.as_ref().unwrap().message_count, 21);
        assert_eq!(conv.metadata.legal_topics, vec!["İş Hukuku"]);

        let mut same = summary(&["Aile Hukuku"]);
        same.message_count = 21;
        let conv = store.update_summary("c1", same).await.unwrap();
        assert_eq!(conv.metadata.legal_topics, vec!["Aile Hukuku"]);
    }

    #[tokio::test]
    async fn test_update_unknown_conversation() {
        let store = InMemoryConversationStore::new();
        let err = store.update_summary("missing", summary(&[])).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ConversationNotFound);

        let err = store.update_title("missing", "Başlık").await.unwrap_err();
        assert!(matches!(err, AppError::ConversationNotFound { .. }));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_not_lost() {
        let store = Arc::new(InMemoryConversationStore::new());
        let handles: Vec<_> = (0..50)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .add_message("shared", Message::user(format!("mesaj {}", i)))
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        let conv = store.get("shared").await.unwrap().unwrap();
        assert_eq!(conv.messages.len(), 50);
        assert_eq!(conv.metadata.message_count, 50);
    }
}
