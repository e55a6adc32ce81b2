//! Result types produced by an analysis.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for use
//! in CLI JSON output, file export and MCP tool responses.

use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ngram::NgramSize;

/// Where a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Ranked from the analyzed text.
    Extracted,
    /// Appended from the configured synonym table.
    Synonym,
}

/// Candidate type, as shown in reports and used by the type filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    /// Single word.
    Single,
    /// Two-word sequence.
    Bigram,
    /// Three-word sequence.
    Trigram,
    /// Configured synonym phrase.
    Synonym,
}

impl CandidateKind {
    /// Lowercase label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Bigram => "bigram",
            Self::Trigram => "trigram",
            Self::Synonym => "synonym",
        }
    }
}

impl From<NgramSize> for CandidateKind {
    fn from(size: NgramSize) -> Self {
        match size {
            NgramSize::Unigram => Self::Single,
            NgramSize::Bigram => Self::Bigram,
            NgramSize::Trigram => Self::Trigram,
        }
    }
}

impl fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Occurrence count, or the marker used for synonym entries.
///
/// Serializes as a JSON number or the string `"synonym"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Count {
    /// Number of occurrences in the analyzed text.
    Occurrences(usize),
    /// Synonym entries are not counted.
    Synonym,
}

impl Count {
    /// The numeric count, if any.
    pub const fn occurrences(self) -> Option<usize> {
        match self {
            Self::Occurrences(n) => Some(n),
            Self::Synonym => None,
        }
    }
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Occurrences(n) => write!(f, "{n}"),
            Self::Synonym => f.write_str("synonym"),
        }
    }
}

impl Serialize for Count {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Occurrences(n) => serializer.serialize_u64(*n as u64),
            Self::Synonym => serializer.serialize_str("synonym"),
        }
    }
}

impl<'de> Deserialize<'de> for Count {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(usize),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(Self::Occurrences(n)),
            Raw::Text(s) if s == "synonym" => Ok(Self::Synonym),
            Raw::Text(s) => Err(serde::de::Error::custom(format!(
                "expected a count or \"synonym\", got {s:?}"
            ))),
        }
    }
}

/// A ranked or appended keyword suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CandidateKeyword {
    /// Keyword text, non-empty with no surrounding whitespace.
    pub text: String,
    /// Number of words (1 to 3).
    pub size: u8,
    /// Single, bigram, trigram or synonym.
    pub kind: CandidateKind,
    /// Occurrences, or `"synonym"`.
    #[schemars(with = "serde_json::Value")]
    pub count: Count,
    /// Purchase-intent flag, when intent detection is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<bool>,
    /// Extracted or synonym.
    pub source: Source,
}

impl CandidateKeyword {
    /// A candidate ranked from the analyzed text.
    pub fn extracted(text: impl Into<String>, size: NgramSize, count: usize) -> Self {
        Self {
            text: text.into(),
            size: size.as_usize() as u8,
            kind: size.into(),
            count: Count::Occurrences(count),
            intent: None,
            source: Source::Extracted,
        }
    }

    /// A synonym phrase. Whitespace is collapsed and the size is the word
    /// count clamped to 1..=3.
    pub fn synonym(phrase: &str) -> Self {
        let words: Vec<&str> = phrase.split_whitespace().collect();
        Self {
            text: words.join(" "),
            size: words.len().clamp(1, 3) as u8,
            kind: CandidateKind::Synonym,
            count: Count::Synonym,
            intent: None,
            source: Source::Synonym,
        }
    }
}

/// Restricts which candidate kinds are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum CandidateFilter {
    /// Every candidate.
    #[default]
    All,
    /// Single words only.
    Single,
    /// Two-word sequences only.
    Bigram,
    /// Three-word sequences only.
    Trigram,
    /// Synonym entries only.
    Synonym,
}

impl CandidateFilter {
    /// Whether `candidate` passes the filter.
    pub fn accepts(self, candidate: &CandidateKeyword) -> bool {
        match self {
            Self::All => true,
            Self::Single => candidate.kind == CandidateKind::Single,
            Self::Bigram => candidate.kind == CandidateKind::Bigram,
            Self::Trigram => candidate.kind == CandidateKind::Trigram,
            Self::Synonym => candidate.kind == CandidateKind::Synonym,
        }
    }
}

/// Everything one analysis produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisResult {
    /// The seed keyword.
    pub keyword: String,
    /// Unigrams, bigrams, trigrams, then synonyms.
    pub candidates: Vec<CandidateKeyword>,
    /// Collaborator name → payload, passed through as-is.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub auxiliary: BTreeMap<String, serde_json::Value>,
}

impl AnalysisResult {
    /// An empty result for `keyword`.
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            candidates: Vec::new(),
            auxiliary: BTreeMap::new(),
        }
    }

    /// Keep only candidates accepted by `filter`. Order is unchanged.
    #[must_use]
    pub fn filtered(mut self, filter: CandidateFilter) -> Self {
        self.candidates.retain(|c| filter.accepts(c));
        self
    }

    /// Candidates of one kind, in report order.
    pub fn of_kind(&self, kind: CandidateKind) -> impl Iterator<Item = &CandidateKeyword> {
        self.candidates.iter().filter(move |c| c.kind == kind)
    }
}
