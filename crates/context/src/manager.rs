//! Conversation Manager - Message bookkeeping on top of a repository
//!
//! Provides:
//! - Appending messages through a [`ConversationRepository`] handle
//! - Titling a conversation from its first user message
//! - Regenerating the summary when the summary policy says so
//! - Budgeted history windows

use crate::store::ConversationRepository;
use crate::summarizer::{generate_summary, needs_summarization_with, SummaryPolicy};
use crate::window::{build_context, ContextOptions, ContextWindow};
use lexforge_common::config::LexConfig;
use lexforge_common::errors::Result;
use lexforge_common::models::{
    Conversation, Message, MessageMetadata, MessageRole, DEFAULT_CONVERSATION_TITLE,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Characters of the first user message used as the title
const TITLE_MAX_CHARS: usize = 50;

/// Conversation manager holding a shared repository handle
pub struct ConversationManager<R: ConversationRepository> {
    repository: Arc<R>,
    policy: SummaryPolicy,
    options: ContextOptions,
}

impl<R: ConversationRepository> ConversationManager<R> {
    /// Create a manager with default summary and window settings
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            policy: SummaryPolicy::default(),
            options: ContextOptions::default(),
        }
    }

    /// Create a manager from engine configuration
    pub fn with_config(repository: Arc<R>, config: &LexConfig) -> Self {
        Self {
            repository,
            policy: SummaryPolicy::from(&config.summary),
            options: ContextOptions::from(&config.context),
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Window budgets used by [`Self::default_window`]
    pub fn context_options(&self) -> &ContextOptions {
        &self.options
    }

    /// Append a message and return the updated conversation.
    ///
    /// The first user message of an untitled conversation becomes its
    /// title. Once the history crosses the summary policy the summary is
    /// regenerated over the full history.
    pub async fn append(
        &self,
        conversation_id: &str,
        role: MessageRole,
        content: impl Into<String>,
        metadata: Option<MessageMetadata>,
    ) -> Result<Conversation> {
        let mut message = Message::new(role, content);
        if let Some(metadata) = metadata {
            message = message.with_metadata(metadata);
        }

        let mut conversation = self.repository.add_message(conversation_id, message).await?;

        if let Some(title) = derive_title(&conversation) {
            debug!(conversation_id, title = %title, "Conversation titled");
            conversation = self.repository.update_title(conversation_id, &title).await?;
        }

        if needs_summarization_with(&conversation, &self.policy) {
            let summary = generate_summary(&conversation.messages);
            info!(
                conversation_id,
                messages = conversation.messages.len(),
                topics = summary.main_topics.len(),
                "Conversation summary regenerated"
            );
            conversation = self
                .repository
                .update_summary(conversation_id, summary)
                .await?;
        }

        Ok(conversation)
    }

    /// History window for `conversation_id` under explicit budgets
    pub async fn window(
        &self,
        conversation_id: &str,
        options: &ContextOptions,
    ) -> Result<ContextWindow> {
        let conversation = self.repository.get_or_create(conversation_id).await?;
        Ok(build_context(&conversation, options))
    }

    /// History window under the configured budgets
    pub async fn default_window(&self, conversation_id: &str) -> Result<ContextWindow> {
        self.window(conversation_id, &self.options).await
    }
}

/// Title for a conversation whose only user message was just appended
fn derive_title(conversation: &Conversation) -> Option<String> {
    if conversation.title != DEFAULT_CONVERSATION_TITLE {
        return None;
    }
    let mut user_messages = conversation
        .messages
        .iter()
        .filter(|m| m.role == MessageRole::User);
    let first = user_messages.next()?;
    if user_messages.next().is_some() {
        return None;
    }

    let title: String = first.content.trim().chars().take(TITLE_MAX_CHARS).collect();
    let title = title.trim_end().to_string();
    (!title.is_empty()).then_some(title)
}
