//! Turkish text helpers shared by the analyzer, chunker and retriever

/// Lower-case with Turkish dotted/dotless I rules.
///
/// `str::to_lowercase` maps `İ` to `i̇` (two code points) and `I` to `i`,
/// both wrong for Turkish.
pub fn turkish_lowercase(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            'İ' => out.push('i'),
            'I' => out.push('ı'),
            _ => out.extend(c.to_lowercase()),
        }
    }
    out
}

/// Strip leading/trailing punctuation from a whitespace token and lower-case it.
pub fn normalize_token(token: &str) -> String {
    turkish_lowercase(token.trim_matches(|c: char| !c.is_alphanumeric()))
}

/// Whitespace tokens, normalized, with empty remnants dropped.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(normalize_token)
        .filter(|t| !t.is_empty())
}

/// Canonical comparison form: lower-cased, whitespace collapsed.
pub fn canonicalize(text: &str) -> String {
    turkish_lowercase(&text.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Rough token estimate for Turkish text: one token per four characters.
///
/// Not a tokenizer; Turkish agglutination makes real token counts run a
/// little higher than English at the same character length.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// Snap a byte index back to the nearest valid UTF-8 char boundary.
pub fn snap_to_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}
