//! Market signals derived from search results.

use std::collections::HashSet;
use std::fmt;

use reqwest::Url;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::providers::SearchResults;

/// Distinct ranking domains above which competition counts as high.
pub const HIGH_COMPETITION_DOMAINS: usize = 5;

/// How crowded the first results page is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionLevel {
    /// More than [`HIGH_COMPETITION_DOMAINS`] distinct domains.
    High,
    /// A few domains own the results.
    Low,
    /// No organic results to judge from.
    Unknown,
}

impl fmt::Display for CompetitionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::High => "high",
            Self::Low => "low",
            Self::Unknown => "unknown",
        })
    }
}

/// Rate competition by the number of distinct domains among organic results.
pub fn competition_level(results: &SearchResults) -> CompetitionLevel {
    if results.organic_results.is_empty() {
        return CompetitionLevel::Unknown;
    }
    let domains: HashSet<String> = results
        .organic_results
        .iter()
        .filter_map(|r| r.link.as_deref().and_then(domain_of))
        .collect();
    if domains.len() > HIGH_COMPETITION_DOMAINS {
        CompetitionLevel::High
    } else {
        CompetitionLevel::Low
    }
}

/// Host of `link` without a leading `www.`. `None` for unparsable links.
pub fn domain_of(link: &str) -> Option<String> {
    let url = Url::parse(link.trim()).ok()?;
    let host = url.host_str()?.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    (!host.is_empty()).then(|| host.to_string())
}

/// Distinct domains of the organic results in rank order, at most `limit`.
pub fn competitor_domains(results: &SearchResults, limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    results
        .organic_results
        .iter()
        .filter_map(|r| r.link.as_deref().and_then(domain_of))
        .filter(|d| seen.insert(d.clone()))
        .take(limit)
        .collect()
}

/// What one competitor ranks for the seed keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompetitorSummary {
    /// Competitor domain.
    pub domain: String,
    /// Most frequent words on the competitor's matching pages.
    pub top_keywords: Vec<String>,
    /// Percentage of those words carrying purchase intent (two decimals).
    pub intent_ratio: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::OrganicResult;

    fn results(links: &[&str]) -> SearchResults {
        SearchResults {
            organic_results: links
                .iter()
                .map(|l| OrganicResult {
                    link: Some((*l).to_string()),
                    ..OrganicResult::default()
                })
                .collect(),
            ..SearchResults::default()
        }
    }

    #[test]
    fn domain_drops_www_and_path() {
        assert_eq!(
            domain_of("https://www.Example.com.tr/kiralik?x=1").as_deref(),
            Some("example.com.tr")
        );
        assert_eq!(domain_of("http://shop.example.com").as_deref(), Some("shop.example.com"));
        assert_eq!(domain_of("not a link"), None);
    }

    #[test]
    fn no_results_is_unknown() {
        assert_eq!(competition_level(&SearchResults::default()), CompetitionLevel::Unknown);
    }

    #[test]
    fn many_domains_is_high() {
        let links: Vec<String> = (0..6).map(|i| format!("https://site{i}.com/")).collect();
        let links: Vec<&str> = links.iter().map(String::as_str).collect();
        assert_eq!(competition_level(&results(&links)), CompetitionLevel::High);
    }

    #[test]
    fn five_domains_is_low() {
        let links = [
            "https://a.com/1",
            "https://www.a.com/2",
            "https://b.com",
            "https://c.com",
            "https://d.com",
            "https://e.com",
        ];
        assert_eq!(competition_level(&results(&links)), CompetitionLevel::Low);
    }

    #[test]
    fn competitor_domains_are_distinct_and_ordered() {
        let r = results(&[
            "https://b.com/x",
            "https://www.a.com/",
            "https://b.com/y",
            "https://c.com/",
        ]);
        assert_eq!(competitor_domains(&r, 5), vec!["b.com", "a.com", "c.com"]);
        assert_eq!(competitor_domains(&r, 2), vec!["b.com", "a.com"]);
    }
}
