//! SerpApi adapter for search, trends and autocomplete.
//!
//! One blocking HTTP client serves three SerpApi engines: `google`,
//! `google_trends` and `google_autocomplete`. The API key travels as a
//! query-string parameter and is never logged.

use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::{Client, ClientBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{SearchProvider, SearchResults, SuggestionProvider, TrendProvider, TrendSummary};
use crate::config::{SerpConfig, TrendsConfig};
use crate::error::{CollaboratorError, CollaboratorResult, ConfigError, ConfigResult};

/// Upper bound on the wait between two attempts.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Blocking SerpApi client.
pub struct SerpApiClient {
    http: Client,
    endpoint: Url,
    api_key: String,
    gl: String,
    hl: String,
    geo: String,
    timeframe: String,
    max_retries: u32,
    retry_backoff: Duration,
}

impl std::fmt::Debug for SerpApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerpApiClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"<redacted>")
            .field("gl", &self.gl)
            .field("hl", &self.hl)
            .field("geo", &self.geo)
            .field("timeframe", &self.timeframe)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl SerpApiClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the API key is missing or blank,
    /// the timeout is zero, or the endpoint is not a URL.
    pub fn new(serp: &SerpConfig, trends: &TrendsConfig) -> ConfigResult<Self> {
        Self::with_builder(serp, trends, Client::builder())
    }

    fn with_builder(
        serp: &SerpConfig,
        trends: &TrendsConfig,
        builder: ClientBuilder,
    ) -> ConfigResult<Self> {
        let api_key = serp
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ConfigError::Invalid {
                field: "serp.api_key",
                reason: "missing or blank (set KWSCOUT_SERP__API_KEY or SERPAPI_API_KEY)"
                    .to_string(),
            })?
            .to_string();

        if serp.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "serp.timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }

        let endpoint = Url::parse(&serp.endpoint).map_err(|e| ConfigError::Invalid {
            field: "serp.endpoint",
            reason: e.to_string(),
        })?;

        let http = builder
            .timeout(Duration::from_secs(serp.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::Invalid {
                field: "serp",
                reason: format!("cannot build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            endpoint,
            api_key,
            gl: serp.gl.clone(),
            hl: serp.hl.clone(),
            geo: trends.geo.clone(),
            timeframe: trends.timeframe.clone(),
            max_retries: serp.max_retries,
            retry_backoff: Duration::from_millis(serp.retry_backoff_ms),
        })
    }

    /// Query one engine, retrying transient failures with exponential backoff.
    fn fetch<T: DeserializeOwned>(
        &self,
        collaborator: &'static str,
        params: &[(&str, &str)],
    ) -> CollaboratorResult<T> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(collaborator, params) {
                Ok(body) => return decode(collaborator, body),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    let delay = retry_delay(self.retry_backoff, attempt);
                    tracing::warn!(
                        collaborator,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "retrying"
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn fetch_once(
        &self,
        collaborator: &'static str,
        params: &[(&str, &str)],
    ) -> CollaboratorResult<serde_json::Value> {
        let response = self
            .http
            .get(self.endpoint.clone())
            .query(params)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .map_err(|source| CollaboratorError::Transport {
                collaborator,
                source,
            })?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|source| CollaboratorError::Transport {
                collaborator,
                source,
            })?;
        let body: Option<serde_json::Value> = serde_json::from_str(&text).ok();

        let message = body
            .as_ref()
            .and_then(|b| b.get("error"))
            .and_then(serde_json::Value::as_str);

        // Throttling and server faults stay retryable whatever the body says.
        if status.as_u16() == 429 || status.is_server_error() {
            if let Some(message) = message {
                tracing::debug!(collaborator, status = status.as_u16(), message, "service error");
            }
            return Err(CollaboratorError::Status {
                collaborator,
                status: status.as_u16(),
            });
        }
        // SerpApi explains most other failures in an `error` field, even on 4xx.
        if let Some(message) = message {
            return Err(CollaboratorError::Api {
                collaborator,
                message: message.to_string(),
            });
        }
        if !status.is_success() {
            return Err(CollaboratorError::Status {
                collaborator,
                status: status.as_u16(),
            });
        }
        body.ok_or_else(|| CollaboratorError::Malformed {
            collaborator,
            reason: "response body is not JSON".to_string(),
        })
    }
}

/// `base * 2^attempt`, capped at [`MAX_RETRY_DELAY`].
fn retry_delay(base: Duration, attempt: u32) -> Duration {
    base.checked_mul(2u32.saturating_pow(attempt))
        .map_or(MAX_RETRY_DELAY, |delay| delay.min(MAX_RETRY_DELAY))
}

fn decode<T: DeserializeOwned>(
    collaborator: &'static str,
    body: serde_json::Value,
) -> CollaboratorResult<T> {
    serde_json::from_value(body).map_err(|e| CollaboratorError::Malformed {
        collaborator,
        reason: e.to_string(),
    })
}

impl SearchProvider for SerpApiClient {
    #[tracing::instrument(skip(self))]
    fn search(&self, query: &str, result_count: usize) -> CollaboratorResult<SearchResults> {
        let num = result_count.to_string();
        let results: SearchResults = self.fetch(
            "search",
            &[
                ("engine", "google"),
                ("q", query),
                ("num", num.as_str()),
                ("gl", self.gl.as_str()),
                ("hl", self.hl.as_str()),
            ],
        )?;
        tracing::debug!(
            organic = results.organic_results.len(),
            questions = results.related_questions.len(),
            related = results.related_searches.len(),
            "search results received"
        );
        Ok(results)
    }
}

impl TrendProvider for SerpApiClient {
    #[tracing::instrument(skip(self))]
    fn interest(&self, phrase: &str) -> CollaboratorResult<Option<TrendSummary>> {
        let response: TrendsResponse = self.fetch(
            "trends",
            &[
                ("engine", "google_trends"),
                ("q", phrase),
                ("geo", self.geo.as_str()),
                ("date", self.timeframe.as_str()),
                ("data_type", "TIMESERIES"),
            ],
        )?;
        Ok(response.summary())
    }
}

impl SuggestionProvider for SerpApiClient {
    #[tracing::instrument(skip(self))]
    fn suggestions(&self, phrase: &str) -> CollaboratorResult<Vec<String>> {
        let response: AutocompleteResponse = self.fetch(
            "autocomplete",
            &[
                ("engine", "google_autocomplete"),
                ("q", phrase),
                ("gl", self.gl.as_str()),
                ("hl", self.hl.as_str()),
            ],
        )?;
        Ok(response.values())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TrendsResponse {
    interest_over_time: Option<InterestOverTime>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InterestOverTime {
    timeline_data: Vec<TimelinePoint>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TimelinePoint {
    values: Vec<TimelineValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TimelineValue {
    extracted_value: Option<f64>,
}

impl TrendsResponse {
    /// Mean of the first series; points without a value are skipped.
    fn summary(&self) -> Option<TrendSummary> {
        let points: Vec<f64> = self
            .interest_over_time
            .as_ref()?
            .timeline_data
            .iter()
            .filter_map(|p| p.values.first()?.extracted_value)
            .collect();
        TrendSummary::from_points(&points)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AutocompleteResponse {
    suggestions: Vec<AutocompleteEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AutocompleteEntry {
    value: String,
}

impl AutocompleteResponse {
    fn values(self) -> Vec<String> {
        self.suggestions
            .into_iter()
            .map(|s| s.value.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect()
    }
}
