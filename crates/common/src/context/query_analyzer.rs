//! Query Analyzer - Understands user intent and extracts entities
//!
//! Provides:
//! - Intent classification (ordered rule table)
//! - Typed entity extraction (laws, articles, dockets, courts)
//! - Keyword extraction with a Turkish stop-word list
//! - Query expansion with a legal synonym table
//! - Court / law-number filters

use super::entities::extract_entities;
use super::intent::classify_intent;
use crate::models::{Entity, EntityKind, QueryAnalysis, QueryFilters};
use crate::text::{normalize_token, tokenize};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use tracing::debug;

/// Keywords shorter than this (in characters) are dropped
const MIN_KEYWORD_CHARS: usize = 3;

const STOP_WORDS: &[&str] = &[
    "acaba", "ama", "ancak", "arasında", "arasındaki", "bana", "ben", "beni", "bir", "biz",
    "bu", "buna", "bunu", "çok", "daha", "dair", "değil", "diye", "gibi", "göre", "hakkında",
    "hangi", "hem", "her", "için", "ile", "ilgili", "ise", "kadar", "kaç", "midir", "mıdır",
    "mudur", "müdür", "nasıl", "neden", "nedir", "nelerdir", "nerede", "niye", "olan",
    "olarak", "olur", "önce", "sonra", "şey", "şu", "şunu", "tüm", "var", "veya", "yani",
    "yok", "zaman",
];

/// Legal abbreviations and everyday synonyms; keys are normalized tokens
const SYNONYMS: &[(&str, &[&str])] = &[
    ("kvkk", &["kişisel verilerin korunması kanunu"]),
    ("tbk", &["türk borçlar kanunu"]),
    ("tmk", &["türk medeni kanunu"]),
    ("tck", &["türk ceza kanunu"]),
    ("ttk", &["türk ticaret kanunu"]),
    ("hmk", &["hukuk muhakemeleri kanunu"]),
    ("cmk", &["ceza muhakemesi kanunu"]),
    ("iik", &["icra ve iflas kanunu"]),
    ("sözleşme", &["akit"]),
    ("akit", &["sözleşme"]),
    ("işçi", &["çalışan"]),
    ("çalışan", &["işçi"]),
    ("işveren", &["çalıştıran"]),
    ("fesih", &["sona erdirme"]),
    ("tazminat", &["zarar giderimi"]),
    ("boşanma", &["evliliğin sona ermesi"]),
    ("emsal", &["içtihat"]),
    ("içtihat", &["emsal karar"]),
    ("zamanaşımı", &["süre aşımı"]),
];

static STOP_WORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOP_WORDS.iter().copied().collect());

static DEFAULT_ANALYZER: LazyLock<QueryAnalyzer> =
    LazyLock::new(|| QueryAnalyzer::new(QueryAnalyzerConfig::default()));

/// Query analyzer configuration
#[derive(Debug, Clone)]
pub struct QueryAnalyzerConfig {
    /// Enable synonym expansion
    pub enable_expansion: bool,

    /// Maximum variants generated in addition to the original query
    pub max_expansions: usize,
}

impl Default for QueryAnalyzerConfig {
    fn default() -> Self {
        Self {
            enable_expansion: true,
            max_expansions: 5,
        }
    }
}

/// Query analyzer for understanding user queries
pub struct QueryAnalyzer {
    config: QueryAnalyzerConfig,

    /// Synonym dictionary for expansion
    synonyms: HashMap<String, Vec<String>>,
}

impl QueryAnalyzer {
    /// Create a new query analyzer
    pub fn new(config: QueryAnalyzerConfig) -> Self {
        Self {
            config,
            synonyms: Self::load_default_synonyms(),
        }
    }

    /// Analyze a query; never fails
    pub fn analyze(&self, query: &str) -> QueryAnalysis {
        let intent = classify_intent(query);
        let entities = extract_entities(query);
        let keywords = extract_keywords(query);

        let mut expanded_queries = vec![query.to_string()];
        if self.config.enable_expansion {
            expanded_queries.extend(self.expand_query(query, &keywords));
        }

        let filters = derive_filters(&entities);

        debug!(
            intent = ?intent,
            entities = entities.len(),
            keywords = keywords.len(),
            variants = expanded_queries.len(),
            "Query analyzed"
        );

        QueryAnalysis {
            original_query: query.to_string(),
            intent,
            entities,
            keywords,
            expanded_queries,
            filters,
        }
    }

    /// One variant per keyword that has a synonym, substituting that keyword
    fn expand_query(&self, query: &str, keywords: &[String]) -> Vec<String> {
        let mut variants: Vec<String> = Vec::new();

        for keyword in keywords {
            if variants.len() >= self.config.max_expansions {
                break;
            }
            let Some(replacement) = self.synonyms.get(keyword).and_then(|s| s.first()) else {
                continue;
            };
            let variant = substitute_token(query, keyword, replacement);
            if variant != query && !variants.contains(&variant) {
                variants.push(variant);
            }
        }

        variants
    }

    fn load_default_synonyms() -> HashMap<String, Vec<String>> {
        SYNONYMS
            .iter()
            .map(|(term, alternates)| {
                (
                    term.to_string(),
                    alternates.iter().map(|s| s.to_string()).collect(),
                )
            })
            .collect()
    }
}

impl Default for QueryAnalyzer {
    fn default() -> Self {
        Self::new(QueryAnalyzerConfig::default())
    }
}

/// Analyze with the default configuration
pub fn analyze_query(query: &str) -> QueryAnalysis {
    DEFAULT_ANALYZER.analyze(query)
}

/// Lower-cased content words of `text`, deduplicated in order.
///
/// Tokens shorter than three characters and stop words are dropped.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    tokenize(text)
        .filter(|t| t.chars().count() >= MIN_KEYWORD_CHARS)
        .filter(|t| !STOP_WORD_SET.contains(t.as_str()))
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

fn derive_filters(entities: &[Entity]) -> QueryFilters {
    let mut filters = QueryFilters::default();
    for entity in entities {
        match &entity.kind {
            EntityKind::Court { .. } => filters.courts.push(entity.text.clone()),
            EntityKind::Law { number } => {
                if !filters.law_numbers.contains(number) {
                    filters.law_numbers.push(*number);
                }
            }
            EntityKind::Article { .. } | EntityKind::Case { .. } => {}
        }
    }
    filters
}

/// Replace every whitespace token whose normalized form is `term`,
/// keeping the token's surrounding punctuation.
fn substitute_token(query: &str, term: &str, replacement: &str) -> String {
    query
        .split_whitespace()
        .map(|token| {
            if normalize_token(token) != term {
                return token.to_string();
            }
            let start = token
                .char_indices()
                .find(|(_, c)| c.is_alphanumeric())
                .map(|(i, _)| i)
                .unwrap_or(0);
            let end = token
                .char_indices()
                .rev()
                .find(|(_, c)| c.is_alphanumeric())
                .map(|(i, c)| i + c.len_utf8())
                .unwrap_or(token.len());
            format!("{}{}{}", &token[..start], replacement, &token[end..])
        })
        .collect::<Vec<_>>()
        .join(" ")
}
