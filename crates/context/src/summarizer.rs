//! Conversation Summarizer - Rule-based digest of long conversations
//!
//! Provides:
//! - Summarization trigger (message threshold + refresh interval)
//! - Topic labelling from an ordered (pattern, label) table
//! - Key entity collection via the shared entity rules
//! - Conclusion sentences from assistant turns

use chrono::Utc;
use lexforge_common::config::SummarySettings;
use lexforge_common::context::extract_entities;
use lexforge_common::metrics;
use lexforge_common::models::{Conversation, ConversationSummary, Message, MessageRole};
use lexforge_common::text::turkish_lowercase;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;

const MAX_TOPICS: usize = 5;
const MAX_ENTITIES: usize = 10;
const MAX_CONCLUSIONS: usize = 3;

/// Topic rules, matched against Turkish-lowercased message content
const TOPIC_TABLE: &[(&str, &str)] = &[
    (r"işçi|işveren|kıdem|ihbar tazminat|fazla mesai|iş sözleşmesi", "İş Hukuku"),
    (r"boşanma|nafaka|velayet|evlilik|ziynet", "Aile Hukuku"),
    (r"kira|kiracı|tahliye", "Kira Hukuku"),
    (r"icra|haciz|iflas|konkordato", "İcra ve İflas Hukuku"),
    (r"suç|sanık|savcı|tck|hapis cezası|kovuşturma", "Ceza Hukuku"),
    (r"miras|vasiyet|tereke|saklı pay", "Miras Hukuku"),
    (r"tüketici|ayıplı|cayma hakkı", "Tüketici Hukuku"),
    (r"vergi|tarhiyat|vergi ziyaı", "Vergi Hukuku"),
    (r"şirket|ticari|ttk|kambiyo|anonim", "Ticaret Hukuku"),
    (r"idari|iptal davası|kamulaştırma|idare mahkemesi", "İdare Hukuku"),
    (r"kvkk|kişisel veri", "Kişisel Verilerin Korunması"),
    (r"tazminat|zarar", "Tazminat Hukuku"),
];

static TOPIC_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    TOPIC_TABLE
        .iter()
        .map(|(pattern, label)| (Regex::new(pattern).expect("topic pattern is valid"), *label))
        .collect()
});

/// Sentence openers that mark a conclusion, up to the end of the sentence
static CONCLUSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(sonuç olarak|[öÖ]zetle|bu nedenle|dolay[ıI]s[ıI]yla)[^.!?\n]*[.!?]?")
        .expect("conclusion pattern is valid")
});

/// When to (re)compute a conversation summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryPolicy {
    /// Minimum history length before the first summary
    pub trigger_threshold: usize,

    /// New messages since the last summary before it is refreshed
    pub refresh_interval: usize,
}

impl Default for SummaryPolicy {
    fn default() -> Self {
        Self::from(&SummarySettings::default())
    }
}

impl From<&SummarySettings> for SummaryPolicy {
    fn from(settings: &SummarySettings) -> Self {
        Self {
            trigger_threshold: settings.trigger_threshold,
            refresh_interval: settings.refresh_interval,
        }
    }
}

/// Check the default policy: 20 messages, refreshed every 10
pub fn needs_summarization(conversation: &Conversation) -> bool {
    needs_summarization_with(conversation, &SummaryPolicy::default())
}

pub fn needs_summarization_with(conversation: &Conversation, policy: &SummaryPolicy) -> bool {
    let count = conversation.messages.len();
    if count < policy.trigger_threshold {
        return false;
    }
    match &conversation.summary {
        None => true,
        Some(summary) => count.saturating_sub(summary.message_count) >= policy.refresh_interval,
    }
}

/// Summarize `messages` with the topic, entity and conclusion rules.
pub fn generate_summary(messages: &[Message]) -> ConversationSummary {
    let mut main_topics: Vec<String> = Vec::new();
    let mut key_entities: Vec<String> = Vec::new();
    let mut conclusions: Vec<String> = Vec::new();
    let mut seen_entities = HashSet::new();

    for message in messages {
        if main_topics.len() < MAX_TOPICS {
            let lowered = turkish_lowercase(&message.content);
            for (pattern, label) in TOPIC_RULES.iter() {
                if main_topics.len() >= MAX_TOPICS {
                    break;
                }
                if pattern.is_match(&lowered) && !main_topics.iter().any(|t| t == label) {
                    main_topics.push((*label).to_string());
                }
            }
        }

        if key_entities.len() < MAX_ENTITIES {
            for entity in extract_entities(&message.content) {
                if key_entities.len() >= MAX_ENTITIES {
                    break;
                }
                if seen_entities.insert(entity.text.clone()) {
                    key_entities.push(entity.text);
                }
            }
        }

        if message.role == MessageRole::Assistant && conclusions.len() < MAX_CONCLUSIONS {
            for m in CONCLUSION_PATTERN.find_iter(&message.content) {
                if conclusions.len() >= MAX_CONCLUSIONS {
                    break;
                }
                let sentence = m.as_str().trim().to_string();
                if !conclusions.contains(&sentence) {
                    conclusions.push(sentence);
                }
            }
        }
    }

    debug!(
        messages = messages.len(),
        topics = main_topics.len(),
        entities = key_entities.len(),
        conclusions = conclusions.len(),
        "Summary generated"
    );
    metrics::record_summary();

    ConversationSummary {
        main_topics,
        key_entities,
        conclusions,
        last_updated: Utc::now(),
        message_count: messages.len(),
    }
}
