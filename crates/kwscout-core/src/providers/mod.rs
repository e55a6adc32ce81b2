//! External data sources consulted by a live analysis.
//!
//! Each collaborator is a trait so the pipeline can run against SerpApi in
//! production and against in-memory fakes in tests. Every collaborator is
//! optional, and a failing one only removes its signal from the result.

pub mod serpapi;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::CollaboratorResult;

/// One organic search hit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OrganicResult {
    /// Page title.
    pub title: String,
    /// Result snippet.
    pub snippet: String,
    /// Target URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// A "people also ask" entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RelatedQuestion {
    /// The question text.
    pub question: String,
}

/// A related-search suggestion shown under the results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RelatedSearch {
    /// The suggested query.
    pub query: String,
}

/// Structured search results. Absent sections decode as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SearchResults {
    /// Organic hits in rank order.
    pub organic_results: Vec<OrganicResult>,
    /// Related questions.
    pub related_questions: Vec<RelatedQuestion>,
    /// Related searches.
    pub related_searches: Vec<RelatedSearch>,
}

impl SearchResults {
    /// Text documents to analyze: each organic snippet then title, then
    /// related questions, then related searches. Blank entries are skipped.
    pub fn documents(&self) -> Vec<String> {
        let organic = self
            .organic_results
            .iter()
            .flat_map(|r| [r.snippet.as_str(), r.title.as_str()]);
        let questions = self.related_questions.iter().map(|q| q.question.as_str());
        let searches = self.related_searches.iter().map(|s| s.query.as_str());

        organic
            .chain(questions)
            .chain(searches)
            .filter(|text| !text.trim().is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Whether there is nothing to analyze.
    pub fn is_empty(&self) -> bool {
        self.organic_results.is_empty()
            && self.related_questions.is_empty()
            && self.related_searches.is_empty()
    }
}

/// Scalar summary of a trend-interest time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TrendSummary {
    /// Mean interest over the timeframe, rounded to two decimals.
    pub average_interest: f64,
    /// Number of data points averaged.
    pub points: usize,
}

impl TrendSummary {
    /// Summarize a series. `None` when the series is empty.
    pub fn from_points(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        Some(Self {
            average_interest: crate::augment::round2(mean),
            points: values.len(),
        })
    }
}

/// Web search.
pub trait SearchProvider: Send + Sync {
    /// Search for `query`, asking for about `result_count` organic hits.
    fn search(&self, query: &str, result_count: usize) -> CollaboratorResult<SearchResults>;
}

/// Search-interest trends.
pub trait TrendProvider: Send + Sync {
    /// Interest summary for `phrase`. `Ok(None)` means the source has no data.
    fn interest(&self, phrase: &str) -> CollaboratorResult<Option<TrendSummary>>;
}

/// Autocomplete suggestions.
pub trait SuggestionProvider: Send + Sync {
    /// Suggestions for `phrase`, possibly empty.
    fn suggestions(&self, phrase: &str) -> CollaboratorResult<Vec<String>>;
}

/// The collaborators available to one analysis.
#[derive(Clone, Copy, Default)]
pub struct Collaborators<'a> {
    /// Search results; without it only suggestions are analyzed.
    pub search: Option<&'a dyn SearchProvider>,
    /// Trend interest for the seed keyword.
    pub trends: Option<&'a dyn TrendProvider>,
    /// Autocomplete suggestions, analyzed along with the search results.
    pub suggestions: Option<&'a dyn SuggestionProvider>,
    /// Run a `site:` search for up to this many ranking domains.
    pub competitor_limit: Option<usize>,
    /// Query trend interest for each ranked candidate as well.
    pub candidate_trends: bool,
}

impl<'a> Collaborators<'a> {
    /// No collaborators at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Use `provider` for searches.
    #[must_use]
    pub fn with_search(mut self, provider: &'a dyn SearchProvider) -> Self {
        self.search = Some(provider);
        self
    }

    /// Use `provider` for trend interest.
    #[must_use]
    pub fn with_trends(mut self, provider: &'a dyn TrendProvider) -> Self {
        self.trends = Some(provider);
        self
    }

    /// Use `provider` for autocomplete suggestions.
    #[must_use]
    pub fn with_suggestions(mut self, provider: &'a dyn SuggestionProvider) -> Self {
        self.suggestions = Some(provider);
        self
    }

    /// Look up trend interest for every extracted candidate. Needs a trend
    /// provider.
    #[must_use]
    pub fn with_candidate_trends(mut self) -> Self {
        self.candidate_trends = true;
        self
    }

    /// Analyze up to `limit` competitor domains.
    #[must_use]
    pub fn with_competitors(mut self, limit: usize) -> Self {
        self.competitor_limit = Some(limit);
        self
    }
}

impl std::fmt::Debug for Collaborators<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("search", &self.search.is_some())
            .field("trends", &self.trends.is_some())
            .field("suggestions", &self.suggestions.is_some())
            .field("competitor_limit", &self.competitor_limit)
            .field("candidate_trends", &self.candidate_trends)
            .finish()
    }
}
