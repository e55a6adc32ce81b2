//! Morphological stemming.

use rust_stemmers::{Algorithm, Stemmer};

use crate::config::Language;

/// Reduces a token to its stem.
///
/// `None` means the stemmer could not handle the token; callers keep the
/// original token in that case.
pub trait Stem: Send + Sync {
    /// Stem a single lowercase token.
    fn stem(&self, token: &str) -> Option<String>;
}

/// Snowball stemmer for one language.
pub struct SnowballStemmer {
    inner: Stemmer,
}

impl SnowballStemmer {
    /// Create a stemmer for `language`.
    pub fn new(language: Language) -> Self {
        Self {
            inner: Stemmer::create(algorithm_for(language)),
        }
    }
}

impl Stem for SnowballStemmer {
    fn stem(&self, token: &str) -> Option<String> {
        let stem = self.inner.stem(token);
        (!stem.is_empty()).then(|| stem.into_owned())
    }
}

const fn algorithm_for(language: Language) -> Algorithm {
    match language {
        Language::Turkish => Algorithm::Turkish,
        Language::English => Algorithm::English,
        Language::German => Algorithm::German,
        Language::French => Algorithm::French,
        Language::Spanish => Algorithm::Spanish,
        Language::Italian => Algorithm::Italian,
        Language::Portuguese => Algorithm::Portuguese,
        Language::Dutch => Algorithm::Dutch,
        Language::Russian => Algorithm::Russian,
    }
}
