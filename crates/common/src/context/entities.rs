//! Legal entity extraction
//!
//! One pattern per entity variant plus a table of court names. Used by the
//! query analyzer, the chunker and the conversation summarizer so that an
//! entity found in a question compares equal to the same entity in a
//! statute chunk.

use crate::models::{Entity, EntityKind};
use regex_lite::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static LAW_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{3,6})\s*say[ıi]l[ıi]").expect("law pattern is valid")
});

static ARTICLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bmadde\s*(\d+)").expect("article pattern is valid")
});

static CASE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{4}/\d+)\s*([EK])\.?").expect("case pattern is valid")
});

/// Known courts, longest names first so "Bölge İdare Mahkemesi" claims its
/// span before "İdare Mahkemesi" can.
const COURT_TABLE: &[(&str, &str)] = &[
    ("bölge adliye mahkemesi", "Bölge Adliye Mahkemesi"),
    ("bölge idare mahkemesi", "Bölge İdare Mahkemesi"),
    ("asliye hukuk mahkemesi", "Asliye Hukuk Mahkemesi"),
    ("asliye ceza mahkemesi", "Asliye Ceza Mahkemesi"),
    ("asliye ticaret mahkemesi", "Asliye Ticaret Mahkemesi"),
    ("ağır ceza mahkemesi", "Ağır Ceza Mahkemesi"),
    ("sulh hukuk mahkemesi", "Sulh Hukuk Mahkemesi"),
    ("sulh ceza hakimliği", "Sulh Ceza Hakimliği"),
    ("icra hukuk mahkemesi", "İcra Hukuk Mahkemesi"),
    ("uyuşmazlık mahkemesi", "Uyuşmazlık Mahkemesi"),
    ("anayasa mahkemesi", "Anayasa Mahkemesi"),
    ("tüketici mahkemesi", "Tüketici Mahkemesi"),
    ("idare mahkemesi", "İdare Mahkemesi"),
    ("vergi mahkemesi", "Vergi Mahkemesi"),
    ("aile mahkemesi", "Aile Mahkemesi"),
    ("iş mahkemesi", "İş Mahkemesi"),
    ("yargıtay", "Yargıtay"),
    ("danıştay", "Danıştay"),
];

/// Case-insensitive pattern for a lowercase Turkish phrase.
///
/// `(?i)` folds ASCII only, so each Turkish-specific letter gets an explicit
/// class with its uppercase form. Dotless `ı` also accepts ASCII `i`.
fn turkish_phrase_pattern(phrase: &str) -> String {
    let words: Vec<String> = phrase
        .split_whitespace()
        .map(|word| {
            let mut out = String::new();
            for c in word.chars() {
                match c {
                    'i' => out.push_str("[iİ]"),
                    'ı' => out.push_str("[ıiI]"),
                    'ç' => out.push_str("[çÇ]"),
                    'ğ' => out.push_str("[ğĞ]"),
                    'ö' => out.push_str("[öÖ]"),
                    'ş' => out.push_str("[şŞ]"),
                    'ü' => out.push_str("[üÜ]"),
                    other => out.push(other),
                }
            }
            out
        })
        .collect();
    format!(r"(?i){}", words.join(r"\s+"))
}

static COURT_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    COURT_TABLE
        .iter()
        .map(|(phrase, name)| {
            let pattern = turkish_phrase_pattern(phrase);
            (Regex::new(&pattern).expect("court pattern is valid"), *name)
        })
        .collect()
});

/// Extract typed legal entities in order of appearance.
///
/// Each distinct matched text is recorded once, at its first offset.
pub fn extract_entities(text: &str) -> Vec<Entity> {
    let mut found: Vec<Entity> = Vec::new();

    for caps in LAW_PATTERN.captures_iter(text) {
        let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if let Ok(number) = number.as_str().parse::<u32>() {
            found.push(Entity {
                kind: EntityKind::Law { number },
                text: whole.as_str().to_string(),
                offset: Some(whole.start()),
            });
        }
    }

    for caps in ARTICLE_PATTERN.captures_iter(text) {
        let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if let Ok(number) = number.as_str().parse::<u32>() {
            found.push(Entity {
                kind: EntityKind::Article { number },
                text: whole.as_str().to_string(),
                offset: Some(whole.start()),
            });
        }
    }

    for caps in CASE_PATTERN.captures_iter(text) {
        let (Some(whole), Some(docket), Some(letter)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        found.push(Entity {
            kind: EntityKind::Case {
                docket: format!("{} {}", docket.as_str(), letter.as_str()),
            },
            text: whole.as_str().to_string(),
            offset: Some(whole.start()),
        });
    }

    let mut claimed: Vec<(usize, usize)> = Vec::new();
    for (pattern, name) in COURT_RULES.iter() {
        for m in pattern.find_iter(text) {
            if claimed.iter().any(|&(s, e)| m.start() < e && s < m.end()) {
                continue;
            }
            claimed.push((m.start(), m.end()));
            found.push(Entity {
                kind: EntityKind::Court {
                    name: (*name).to_string(),
                },
                text: m.as_str().to_string(),
                offset: Some(m.start()),
            });
        }
    }

    found.sort_by_key(|e| e.offset.unwrap_or(usize::MAX));

    let mut seen = HashSet::new();
    found.retain(|e| seen.insert(e.text.clone()));
    found
}

/// Canonical texts of the entities in `text`, deduplicated in order.
pub fn extract_entity_texts(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    extract_entities(text)
        .iter()
        .map(Entity::canonical)
        .filter(|c| seen.insert(c.clone()))
        .collect()
}
