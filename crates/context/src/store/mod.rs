//! Conversation storage abstraction
//!
//! [`ConversationRepository`] is the handle request code receives for
//! conversation state. The engine ships [`InMemoryConversationStore`]; a
//! database or cache backed implementation plugs in behind the same trait.
//!
//! Implementations must be `Send + Sync` and must apply each call
//! atomically per conversation, so concurrent appends to one id never lose
//! a message and a stored summary only moves forward.

pub mod memory;

pub use memory::InMemoryConversationStore;

use async_trait::async_trait;
use lexforge_common::errors::Result;
use lexforge_common::models::{Conversation, ConversationSummary, Message};

#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Fetch a conversation, creating an empty one for unknown ids
    async fn get_or_create(&self, id: &str) -> Result<Conversation>;

    /// Fetch without creating
    async fn get(&self, id: &str) -> Result<Option<Conversation>>;

    /// Append a message, creating the conversation if needed.
    ///
    /// Returns the conversation after the append.
    async fn add_message(&self, id: &str, message: Message) -> Result<Conversation>;

    /// Replace the summary of an existing conversation.
    ///
    /// A summary covering fewer messages than the stored one is ignored, so
    /// a slow writer cannot roll the summary back. Fails with
    /// `ConversationNotFound` for unknown ids.
    async fn update_summary(&self, id: &str, summary: ConversationSummary) -> Result<Conversation>;

    /// Rename an existing conversation.
    ///
    /// Fails with `ConversationNotFound` for unknown ids.
    async fn update_title(&self, id: &str, title: &str) -> Result<Conversation>;
}
