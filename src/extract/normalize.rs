//! Value-level predicates shared by the classifier and the leaf extractor

use std::collections::HashSet;
use std::hash::Hash;

/// Labels that are template boilerplate rather than facts (compared lowercase)
const NOISE_EXACT: &[&str] = &[
    "true",
    "false",
    "evaluation",
    "input data",
    "tool support",
    "evaluation method list",
    "list",
    "none",
    "null",
    "n/a",
    "entity",
    "property",
    "sub-property",
    "properties",
];

/// Boilerplate fragments that disqualify a label wherever they occur
const NOISE_CONTAINING: &[&str] = &["list of entities", "evaluation method entity"];

/// True iff `s` carries an `http://` or `https://` scheme marker (any case)
pub fn looks_like_url(s: &str) -> bool {
    let lower = s.to_lowercase();
    lower.contains("http://") || lower.contains("https://")
}

/// True for blank, very short, or boilerplate values
pub fn is_noise_value(s: &str) -> bool {
    let trimmed = s.trim();
    if trimmed.chars().count() <= 2 {
        return true;
    }

    let lower = trimmed.to_lowercase();
    NOISE_EXACT.contains(&lower.as_str()) || NOISE_CONTAINING.iter().any(|frag| lower.contains(frag))
}

/// Remove repeated items, keeping the first occurrence
pub fn dedup_preserving_order<T>(items: impl IntoIterator<Item = T>) -> Vec<T>
where
    T: Eq + Hash + Clone,
{
    let mut seen: HashSet<T> = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_detection_is_case_insensitive() {
        assert!(looks_like_url("https://github.com/org/repo"));
        assert!(looks_like_url("see HTTP://example.org"));
        assert!(!looks_like_url("ftp://example.org"));
        assert!(!looks_like_url("https:/broken"));
        assert!(!looks_like_url(""));
    }

    #[test]
    fn blank_and_short_values_are_noise() {
        assert!(is_noise_value(""));
        assert!(is_noise_value("  "));
        assert!(is_noise_value("ok"));
        assert!(is_noise_value(" ab "));
        assert!(!is_noise_value("abc"));
    }

    #[test]
    fn boilerplate_labels_are_noise() {
        assert!(is_noise_value("N/A"));
        assert!(is_noise_value("True"));
        assert!(is_noise_value("Evaluation Method List"));
        assert!(is_noise_value("  Tool support "));
        assert!(is_noise_value("Sub-Property"));
        assert!(is_noise_value("A list of entities used"));
        assert!(is_noise_value("evaluation method entity #3"));
    }

    #[test]
    fn boilerplate_words_inside_longer_labels_are_kept() {
        assert!(!is_noise_value("Self-supervised CNN"));
        assert!(!is_noise_value("Entity linking"));
        assert!(!is_noise_value("Property graph"));
        assert!(!is_noise_value("Evaluation of retrieval"));
    }

    #[test]
    fn multibyte_length_counts_characters() {
        assert!(!is_noise_value("äöü"));
        assert!(is_noise_value("äö"));
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let out = dedup_preserving_order(vec!["b", "a", "b", "c", "a"]);
        assert_eq!(out, vec!["b", "a", "c"]);
    }

    #[test]
    fn dedup_is_case_sensitive() {
        let out = dedup_preserving_order(vec!["CNN".to_string(), "cnn".to_string()]);
        assert_eq!(out.len(), 2);
    }
}
