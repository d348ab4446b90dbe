use super::keywords::{
    lookup_keyword, synthesize_code, FALLBACK_KEYWORDS, SYNONYMS, TREATMENT_KEYWORDS,
};
use super::similarity::closest_match;
use crate::config::DEFAULT_TOP_N;

/// Minimum similarity for a fallback keyword to borrow a table entry's code.
pub const FUZZY_CUTOFF: f64 = 0.6;

/// Detect treatment codes in OCR text, keeping at most [`DEFAULT_TOP_N`].
pub fn extract_treatments(text: &str) -> Vec<String> {
    extract_top_treatments(text, DEFAULT_TOP_N)
}

/// Detect treatment codes in OCR text.
///
/// Codes are unique and ordered by discovery: synonyms first, then main
/// keywords, both by substring match on the lower-cased text. Only when
/// neither finds anything are the fallback keywords tried, resolved through
/// the table, fuzzy matching, or a synthesized code.
pub fn extract_top_treatments(text: &str, top_n: usize) -> Vec<String> {
    let norm = normalize_text(text);
    let mut found: Vec<String> = Vec::new();

    for (alias, target) in SYNONYMS {
        if norm.contains(alias) {
            let code = lookup_keyword(target)
                .map(|t| t.code.to_string())
                .unwrap_or_else(|| synthesize_code(target));
            push_unique(&mut found, code);
        }
    }

    for (keyword, treatment) in TREATMENT_KEYWORDS {
        if norm.contains(keyword) {
            push_unique(&mut found, treatment.code.to_string());
        }
    }

    if found.is_empty() {
        for keyword in FALLBACK_KEYWORDS {
            if norm.contains(keyword) {
                push_unique(&mut found, resolve_fallback(keyword));
            }
        }
        if !found.is_empty() {
            tracing::debug!(codes = ?found, "Treatments resolved through fallback keywords");
        }
    }

    found.truncate(top_n);
    found
}

fn normalize_text(text: &str) -> String {
    text.to_lowercase()
}

fn resolve_fallback(keyword: &str) -> String {
    if let Some(treatment) = lookup_keyword(keyword) {
        return treatment.code.to_string();
    }

    let known = TREATMENT_KEYWORDS.iter().map(|(kw, _)| *kw);
    match closest_match(keyword, known, FUZZY_CUTOFF).and_then(lookup_keyword) {
        Some(treatment) => treatment.code.to_string(),
        None => synthesize_code(keyword),
    }
}

fn push_unique(found: &mut Vec<String>, code: String) {
    if !found.contains(&code) {
        found.push(code);
    }
}
