//! Intent classification
//!
//! An ordered `(pattern, intent)` table; the first matching row wins and
//! anything unmatched is `General`. `FindLaw` sits above `FindCase`, so a
//! court mention only classifies as case search when no law number anchors
//! the query.

use crate::models::QueryIntent;
use regex_lite::Regex;
use std::sync::LazyLock;

const INTENT_TABLE: &[(&str, QueryIntent)] = &[
    (
        r"(?i)\b\d{4,}\s*say[ıi]l[ıi](?:.*?\bmadde\s*\d+)?",
        QueryIntent::FindLaw,
    ),
    (
        r"(?i)(yarg[ıiI]tay|dan[ıiI][şŞ]tay|mahkeme|emsal|karar|i[çÇ]tihat)",
        QueryIntent::FindCase,
    ),
    (
        r"(?i)(aras[ıiI]ndaki\s+fark|fark[ıiI]\s+(nedir|ne)|kar[şŞ][ıiI]la[şŞ]t[ıiI]r)",
        QueryIntent::Compare,
    ),
    (
        r"(?i)(nas[ıiI]l\s.*([ıiI]l[ıiI]r|ulur|[üÜ]l[üÜ]r)|a[çÇ][ıiI]l[ıiI]r)",
        QueryIntent::Procedure,
    ),
    (
        r"(?i)^\s*[^\s?]+(\s+[^\s?]+){0,3}\s+(nedir|ne\s+demektir|ne\s+demek)\s*\??\s*$",
        QueryIntent::ExplainConcept,
    ),
];

static INTENT_RULES: LazyLock<Vec<(Regex, QueryIntent)>> = LazyLock::new(|| {
    INTENT_TABLE
        .iter()
        .map(|(pattern, intent)| (Regex::new(pattern).expect("intent pattern is valid"), *intent))
        .collect()
});

/// Classify a query; never fails.
pub fn classify_intent(query: &str) -> QueryIntent {
    INTENT_RULES
        .iter()
        .find(|(pattern, _)| pattern.is_match(query))
        .map(|(_, intent)| *intent)
        .unwrap_or(QueryIntent::General)
}
