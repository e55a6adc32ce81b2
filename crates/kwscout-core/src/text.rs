//! Text normalization.
//!
//! Turns raw snippets, titles and questions into lowercase word tokens.
//! Two tokenizers are offered because search snippets are messy in
//! different ways: [`TokenizeMode::WordRuns`] pulls every `\w+` run out of
//! the text (punctuation glued to a word is dropped), while
//! [`TokenizeMode::Whitespace`] keeps only whitespace-separated words that
//! are entirely alphanumeric (anything carrying punctuation is discarded).
//!
//! Lowercasing follows [`Casing`]: Turkish text needs its own rules for the
//! dotted and dotless `i`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::stem::Stem;

/// Maximal runs of Unicode word characters.
static WORD_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("valid regex"));

/// How raw text is split into candidate tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum TokenizeMode {
    /// Extract every run of word characters.
    #[default]
    WordRuns,
    /// Split on whitespace and keep fully alphanumeric words.
    Whitespace,
}

/// Lowercasing rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Casing {
    /// Unicode default case mapping.
    #[default]
    Unicode,
    /// `İ` lowers to `i` and `I` to `ı`.
    Turkish,
}

impl Casing {
    /// Lowercase `text` under these rules.
    pub fn lowercase(self, text: &str) -> String {
        match self {
            Self::Unicode => text.to_lowercase(),
            Self::Turkish => text
                .chars()
                .map(|c| match c {
                    'İ' => 'i',
                    'I' => 'ı',
                    other => other,
                })
                .collect::<String>()
                .to_lowercase(),
        }
    }
}

/// Split `text` into lowercase tokens without any filtering.
///
/// Empty or whitespace-only input yields an empty vector.
pub fn tokenize(text: &str, mode: TokenizeMode, casing: Casing) -> Vec<String> {
    match mode {
        TokenizeMode::WordRuns => {
            let lowered = casing.lowercase(text);
            WORD_RUN
                .find_iter(&lowered)
                .map(|m| m.as_str().to_string())
                .collect()
        }
        TokenizeMode::Whitespace => text
            .split_whitespace()
            .filter(|w| w.chars().all(char::is_alphanumeric))
            .map(|w| casing.lowercase(w))
            .collect(),
    }
}

/// Length of a token in characters, not bytes.
pub fn char_len(token: &str) -> usize {
    token.chars().count()
}

/// Tokenizer with an optional length filter and stemmer.
///
/// Stop-word removal happens between splitting and the remaining steps, so
/// the normalizer exposes them separately: [`Normalizer::split`] and
/// [`Normalizer::refine`].
pub struct Normalizer {
    mode: TokenizeMode,
    casing: Casing,
    min_word_length: usize,
    stemmer: Option<Box<dyn Stem>>,
}

impl std::fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Normalizer")
            .field("mode", &self.mode)
            .field("casing", &self.casing)
            .field("min_word_length", &self.min_word_length)
            .field("stemming", &self.stemmer.is_some())
            .finish()
    }
}

impl Normalizer {
    /// Create a normalizer without length filtering or stemming.
    pub const fn new(mode: TokenizeMode) -> Self {
        Self {
            mode,
            casing: Casing::Unicode,
            min_word_length: 0,
            stemmer: None,
        }
    }

    /// Lowercase with `casing` instead of the Unicode default.
    #[must_use]
    pub const fn with_casing(mut self, casing: Casing) -> Self {
        self.casing = casing;
        self
    }

    /// Discard tokens shorter than `min` characters.
    #[must_use]
    pub const fn with_min_word_length(mut self, min: usize) -> Self {
        self.min_word_length = min;
        self
    }

    /// Replace each surviving token with its stem.
    #[must_use]
    pub fn with_stemmer(mut self, stemmer: Box<dyn Stem>) -> Self {
        self.stemmer = Some(stemmer);
        self
    }

    /// The configured tokenizer.
    pub const fn mode(&self) -> TokenizeMode {
        self.mode
    }

    /// Lowercase and split `text` into raw tokens.
    pub fn split(&self, text: &str) -> Vec<String> {
        tokenize(text, self.mode, self.casing)
    }

    /// Apply the length filter, then stemming.
    ///
    /// A stemmer that fails or returns an empty stem leaves the token as is.
    pub fn refine(&self, tokens: Vec<String>) -> Vec<String> {
        tokens
            .into_iter()
            .filter(|t| char_len(t) >= self.min_word_length)
            .map(|t| match self.stemmer.as_deref() {
                Some(stemmer) => match stemmer.stem(&t) {
                    Some(stem) if !stem.is_empty() => stem,
                    _ => t,
                },
                None => t,
            })
            .collect()
    }

    /// Split and refine in one pass (no stop-word removal).
    pub fn normalize(&self, text: &str) -> Vec<String> {
        self.refine(self.split(text))
    }
}
