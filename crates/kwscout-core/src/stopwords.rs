//! Stop-word filtering.
//!
//! Lists come from the `stop-words` crate and can be extended with
//! project-specific words (brand names, boilerplate like "www").

use std::collections::HashSet;

use stop_words::LANGUAGE;

use crate::config::Language;

/// Read-only set of words excluded from frequency analysis.
#[derive(Debug, Clone, Default)]
pub struct StopWordSet {
    words: HashSet<String>,
}

impl StopWordSet {
    /// Load the list for `language`.
    pub fn for_language(language: Language) -> Self {
        let words = stop_words::get(list_for(language))
            .iter()
            .map(|w| w.to_lowercase())
            .collect();
        Self { words }
    }

    /// Build a set from explicit words (lowercased).
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words.into_iter().map(|w| w.as_ref().to_lowercase()).collect(),
        }
    }

    /// Add more words to the set.
    #[must_use]
    pub fn with_extra<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words
            .extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
        self
    }

    /// Exact membership test. No prefix or partial matching.
    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    /// Drop every stop word, keeping the order of the rest.
    pub fn filter(&self, tokens: Vec<String>) -> Vec<String> {
        tokens.into_iter().filter(|t| !self.contains(t)).collect()
    }

    /// Number of words in the set.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

const fn list_for(language: Language) -> LANGUAGE {
    match language {
        Language::Turkish => LANGUAGE::Turkish,
        Language::English => LANGUAGE::English,
        Language::German => LANGUAGE::German,
        Language::French => LANGUAGE::French,
        Language::Spanish => LANGUAGE::Spanish,
        Language::Italian => LANGUAGE::Italian,
        Language::Portuguese => LANGUAGE::Portuguese,
        Language::Dutch => LANGUAGE::Dutch,
        Language::Russian => LANGUAGE::Russian,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(s: &[&str]) -> Vec<String> {
        s.iter().map(|w| (*w).to_string()).collect()
    }

    #[test]
    fn turkish_list_is_loaded() {
        let set = StopWordSet::for_language(Language::Turkish);
        assert!(!set.is_empty());
        assert!(set.contains("ve"));
    }

    #[test]
    fn english_list_is_loaded() {
        let set = StopWordSet::for_language(Language::English);
        assert!(set.contains("the"));
        assert!(!set.contains("rental"));
    }

    #[test]
    fn filter_preserves_order_and_removes_members() {
        let set = StopWordSet::from_words(["ve", "bir", "için"]);
        let filtered = set.filter(tokens(&["araba", "ve", "kiralama", "için", "bir", "fiyat"]));
        assert_eq!(filtered, vec!["araba", "kiralama", "fiyat"]);
        assert!(filtered.iter().all(|t| !set.contains(t)));
    }

    #[test]
    fn membership_is_exact() {
        let set = StopWordSet::from_words(["ve"]);
        assert!(!set.contains("vergi"));
        assert!(!set.contains("v"));
    }

    #[test]
    fn extra_words_are_lowercased() {
        let set = StopWordSet::default().with_extra(["WWW", "Com"]);
        assert_eq!(set.len(), 2);
        assert!(set.contains("www"));
        assert!(set.contains("com"));
    }
}
