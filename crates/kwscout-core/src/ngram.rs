//! Contiguous n-gram windows over a token sequence.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Supported window sizes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum NgramSize {
    /// Single words.
    Unigram,
    /// Two-word sequences.
    Bigram,
    /// Three-word sequences.
    Trigram,
}

impl NgramSize {
    /// All sizes, smallest first.
    pub const ALL: [Self; 3] = [Self::Unigram, Self::Bigram, Self::Trigram];

    /// Number of tokens in a window.
    pub const fn as_usize(self) -> usize {
        match self {
            Self::Unigram => 1,
            Self::Bigram => 2,
            Self::Trigram => 3,
        }
    }

    /// Size for a window of `n` tokens, if supported.
    pub const fn from_len(n: usize) -> Option<Self> {
        match n {
            1 => Some(Self::Unigram),
            2 => Some(Self::Bigram),
            3 => Some(Self::Trigram),
            _ => None,
        }
    }

    /// Label used in reports and the type filter.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unigram => "single",
            Self::Bigram => "bigram",
            Self::Trigram => "trigram",
        }
    }
}

/// A window of consecutive tokens borrowed from a token sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NGram<'a> {
    tokens: &'a [String],
}

impl<'a> NGram<'a> {
    /// The tokens in this window.
    pub const fn tokens(&self) -> &'a [String] {
        self.tokens
    }

    /// Number of tokens.
    pub const fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the window is empty (never true for windows from [`ngrams`]).
    pub const fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens joined by a single space.
    pub fn render(&self) -> String {
        self.tokens.join(" ")
    }
}

impl fmt::Display for NGram<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Lazily yield every window of `n` consecutive tokens.
///
/// A sequence of length `L` produces `max(0, L - n + 1)` windows; `n == 0`
/// produces none. Calling again on the same slice restarts from the
/// beginning.
pub fn ngrams(tokens: &[String], n: usize) -> impl Iterator<Item = NGram<'_>> {
    // windows(0) panics
    let limit = if n == 0 { 0 } else { usize::MAX };
    tokens
        .windows(n.max(1))
        .take(limit)
        .map(|tokens| NGram { tokens })
}

/// Windows of `size` over each document, never crossing document boundaries.
pub fn ngrams_per_document<'a>(
    documents: &'a [Vec<String>],
    size: NgramSize,
) -> impl Iterator<Item = NGram<'a>> {
    documents
        .iter()
        .flat_map(move |doc| ngrams(doc, size.as_usize()))
}
