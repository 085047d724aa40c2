//! Conversation Window - Budgeted slice of history for the generation step
//!
//! Provides:
//! - Newest-first message selection under message and token budgets
//! - Summary block for history that fell out of the window
//! - Token estimation (`estimate_tokens`, four characters per token)

use lexforge_common::config::ContextSettings;
use lexforge_common::models::{Conversation, ConversationSummary, Message};
pub use lexforge_common::text::estimate_tokens;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Window budgets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextOptions {
    pub max_messages: usize,
    pub max_tokens: usize,
    pub include_summary: bool,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self::from(&ContextSettings::default())
    }
}

impl From<&ContextSettings> for ContextOptions {
    fn from(settings: &ContextSettings) -> Self {
        Self {
            max_messages: settings.max_messages,
            max_tokens: settings.max_tokens,
            include_summary: settings.include_summary,
        }
    }
}

/// History passed downstream
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextWindow {
    /// Chronological, newest messages that fit the budgets
    pub messages: Vec<Message>,

    /// Rendered summary of the messages that did not fit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Estimated tokens of `messages` plus `summary`
    pub token_count: usize,
}

impl ContextWindow {
    /// Whether the window dropped any older messages
    pub fn is_truncated(&self, conversation: &Conversation) -> bool {
        self.messages.len() < conversation.messages.len()
    }
}

/// Build the history window for `conversation`.
///
/// Walks backwards from the newest message and stops at the first message
/// that would break either budget, so the window is always a contiguous
/// suffix of the history.
pub fn build_context(conversation: &Conversation, options: &ContextOptions) -> ContextWindow {
    let mut selected: Vec<Message> = Vec::new();
    let mut token_count = 0;

    for message in conversation.messages.iter().rev() {
        if selected.len() >= options.max_messages {
            break;
        }
        let cost = estimate_tokens(&message.content);
        if token_count + cost > options.max_tokens {
            break;
        }
        token_count += cost;
        selected.push(message.clone());
    }
    selected.reverse();

    let excluded = conversation.messages.len() - selected.len();
    let summary = if excluded > 0 && options.include_summary {
        conversation.summary.as_ref().map(format_summary)
    } else {
        None
    };
    if let Some(block) = &summary {
        token_count += estimate_tokens(block);
    }

    debug!(
        conversation_id = %conversation.id,
        kept = selected.len(),
        excluded,
        with_summary = summary.is_some(),
        token_count,
        "Context window built"
    );

    ContextWindow {
        messages: selected,
        summary,
        token_count,
    }
}

/// Render a summary as the block prepended to a truncated window
pub fn format_summary(summary: &ConversationSummary) -> String {
    let mut lines = vec!["[Önceki konuşma özeti]".to_string()];

    if !summary.main_topics.is_empty() {
        lines.push(format!("Ana konular: {}", summary.main_topics.join(", ")));
    }
    if !summary.key_entities.is_empty() {
        lines.push(format!("Önemli varlıklar: {}", summary.key_entities.join(", ")));
    }
    if !summary.conclusions.is_empty() {
        lines.push("Sonuçlar:".to_string());
        lines.extend(summary.conclusions.iter().map(|c| format!("- {}", c)));
    }

    lines.join("\n")
}
