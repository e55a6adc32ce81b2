//! Keyword analysis pipeline.
//!
//! Text flows through normalization, stop-word removal, n-gram counting and
//! augmentation:
//!
//! ```text
//! documents ─▶ split ─▶ stop words ─▶ min length ─▶ stem ─▶ n-grams ─▶ top-K ─▶ augment
//! ```
//!
//! [`KeywordAnalyzer::analyze_documents`] is pure computation over text the
//! caller already has. [`KeywordAnalyzer::analyze`] gathers that text from
//! the configured [`Collaborators`] first and attaches their signals.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::augment::{Augmenter, DEFAULT_INTENT_PHRASES, IntentDetector};
use crate::config::Language;
use crate::error::{CollaboratorResult, ConfigResult};
use crate::model::{AnalysisResult, CandidateKeyword, Source};
use crate::ngram::{NgramSize, ngrams_per_document};
use crate::providers::{Collaborators, SearchResults, TrendSummary};
use crate::rank::{FrequencyRanker, rank_top_k};
use crate::signals::{CompetitorSummary, competition_level, competitor_domains};
use crate::stem::SnowballStemmer;
use crate::stopwords::StopWordSet;
use crate::text::{Casing, Normalizer, TokenizeMode};

/// Number of top keywords reported per competitor.
const COMPETITOR_TOP_KEYWORDS: usize = 5;

/// How many candidates to keep for each n-gram size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TopK {
    /// Single words.
    pub unigrams: usize,
    /// Two-word sequences.
    pub bigrams: usize,
    /// Three-word sequences.
    pub trigrams: usize,
}

impl Default for TopK {
    fn default() -> Self {
        Self {
            unigrams: 5,
            bigrams: 3,
            trigrams: 3,
        }
    }
}

impl TopK {
    /// The limit for `size`.
    pub const fn for_size(&self, size: NgramSize) -> usize {
        match size {
            NgramSize::Unigram => self.unigrams,
            NgramSize::Bigram => self.bigrams,
            NgramSize::Trigram => self.trigrams,
        }
    }
}

/// Tokenization, ranking and augmentation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalyzerOptions {
    /// Organic results requested from the search provider.
    pub result_count: usize,
    /// Minimum token length in characters (`0` or `1` disables the filter).
    pub min_word_length: usize,
    /// Candidates kept per n-gram size.
    pub top_k: TopK,
    /// Language for stop words and stemming.
    pub language: Language,
    /// Reduce tokens to their stems before counting.
    pub stemming: bool,
    /// How raw text is split into tokens.
    pub tokenize_mode: TokenizeMode,
    /// Purchase-intent phrases. Empty disables intent detection.
    pub intent_phrases: Vec<String>,
    /// Seed keyword → synonym phrases appended to its results.
    pub synonyms: BTreeMap<String, Vec<String>>,
    /// Additional stop words on top of the language list.
    pub extra_stop_words: Vec<String>,
    /// Treat all documents as one token stream, letting n-grams span them.
    pub join_documents: bool,
    /// Number of top single words reported as suggestions.
    pub suggestion_count: usize,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            result_count: 10,
            min_word_length: 0,
            top_k: TopK::default(),
            language: Language::default(),
            stemming: false,
            tokenize_mode: TokenizeMode::default(),
            intent_phrases: DEFAULT_INTENT_PHRASES
                .iter()
                .map(|p| (*p).to_string())
                .collect(),
            synonyms: BTreeMap::new(),
            extra_stop_words: Vec::new(),
            join_documents: false,
            suggestion_count: 3,
        }
    }
}

/// Runs the extraction pipeline with fixed settings.
///
/// Stop words, the normalizer and the augmenter are built once in
/// [`KeywordAnalyzer::new`] and only read afterwards, so one analyzer can
/// serve any number of analyses.
#[derive(Debug)]
pub struct KeywordAnalyzer {
    options: AnalyzerOptions,
    stop_words: StopWordSet,
    normalizer: Normalizer,
    augmenter: Augmenter,
}

impl KeywordAnalyzer {
    /// Build an analyzer.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ConfigError::Invalid`] if the intent phrases
    /// cannot be compiled.
    pub fn new(options: AnalyzerOptions) -> ConfigResult<Self> {
        let stop_words = StopWordSet::for_language(options.language)
            .with_extra(&options.extra_stop_words);

        let casing = match options.language {
            Language::Turkish => Casing::Turkish,
            _ => Casing::Unicode,
        };
        let mut normalizer = Normalizer::new(options.tokenize_mode)
            .with_casing(casing)
            .with_min_word_length(options.min_word_length);
        if options.stemming {
            normalizer = normalizer.with_stemmer(Box::new(SnowballStemmer::new(options.language)));
        }

        let intent = IntentDetector::new(&options.intent_phrases)?;
        let augmenter = Augmenter::new(intent, options.synonyms.clone());

        tracing::debug!(
            language = %options.language,
            stop_words = stop_words.len(),
            stemming = options.stemming,
            "analyzer ready"
        );
        Ok(Self {
            options,
            stop_words,
            normalizer,
            augmenter,
        })
    }

    /// The settings this analyzer was built with.
    pub const fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    /// Normalize each document into filtered tokens.
    pub fn tokenize_documents(&self, documents: &[String]) -> Vec<Vec<String>> {
        documents
            .iter()
            .map(|doc| {
                let tokens = self.stop_words.filter(self.normalizer.split(doc));
                self.normalizer.refine(tokens)
            })
            .collect()
    }

    /// Rank keywords in text the caller already has.
    ///
    /// Candidates come out as unigrams, bigrams, trigrams (each most frequent
    /// first) followed by any synonyms of `keyword`. Empty text produces no
    /// extracted candidates.
    #[tracing::instrument(skip(self, documents), fields(documents = documents.len()))]
    pub fn analyze_documents(&self, keyword: &str, documents: &[String]) -> AnalysisResult {
        let mut tokens = self.tokenize_documents(documents);
        if self.options.join_documents {
            tokens = vec![tokens.concat()];
        }

        let mut result = AnalysisResult::new(keyword.trim());
        let mut suggestions = Vec::new();

        for size in NgramSize::ALL {
            let mut ranker = FrequencyRanker::new();
            ranker.extend(ngrams_per_document(&tokens, size).map(|g| g.render()));

            if size == NgramSize::Unigram {
                suggestions = ranker
                    .top(self.options.suggestion_count)
                    .into_iter()
                    .map(|r| r.item)
                    .collect();
            }

            result.candidates.extend(
                ranker
                    .top(self.options.top_k.for_size(size))
                    .into_iter()
                    .map(|r| CandidateKeyword::extracted(r.item, size, r.count)),
            );
        }

        self.augmenter.annotate(&mut result.candidates);
        self.augmenter.append_synonyms(keyword, &mut result.candidates);

        if !suggestions.is_empty() {
            Augmenter::attach(&mut result, "suggestions", &suggestions);
        }

        tracing::debug!(candidates = result.candidates.len(), "analysis complete");
        result
    }

    /// Rank keywords in a saved search response.
    pub fn analyze_search_results(&self, keyword: &str, results: &SearchResults) -> AnalysisResult {
        let mut result = self.analyze_documents(keyword, &results.documents());
        Augmenter::attach(&mut result, "competition", &competition_level(results));
        result
    }

    /// Run a live analysis of `keyword`.
    ///
    /// Every collaborator is optional. A collaborator that fails is logged
    /// and its signal is left out; the analysis itself always completes.
    #[tracing::instrument(skip(self, collaborators), fields(collaborators = ?collaborators))]
    pub fn analyze(&self, keyword: &str, collaborators: &Collaborators<'_>) -> AnalysisResult {
        let keyword = keyword.trim();

        let search = collaborators
            .search
            .and_then(|provider| available(provider.search(keyword, self.options.result_count)));

        let mut documents = search.as_ref().map(SearchResults::documents).unwrap_or_default();

        let autocomplete = collaborators
            .suggestions
            .and_then(|provider| available(provider.suggestions(keyword)));
        if let Some(extra) = &autocomplete {
            documents.extend(extra.iter().cloned());
        }

        let mut result = self.analyze_documents(keyword, &documents);

        if let Some(results) = &search {
            Augmenter::attach(&mut result, "competition", &competition_level(results));
        }
        if let Some(extra) = &autocomplete {
            Augmenter::attach(&mut result, "autocomplete", extra);
        }

        if let Some(provider) = collaborators.trends {
            if let Some(summary) = available(provider.interest(keyword)).flatten() {
                Augmenter::attach(&mut result, "trend", &summary);
            }
            if collaborators.candidate_trends {
                let by_candidate: BTreeMap<String, TrendSummary> = result
                    .candidates
                    .iter()
                    .filter(|c| c.source == Source::Extracted)
                    .filter_map(|c| {
                        let summary = available(provider.interest(&c.text)).flatten()?;
                        Some((c.text.clone(), summary))
                    })
                    .collect();
                if !by_candidate.is_empty() {
                    Augmenter::attach(&mut result, "trend_by_candidate", &by_candidate);
                }
            }
        }

        if let (Some(provider), Some(limit), Some(results)) =
            (collaborators.search, collaborators.competitor_limit, &search)
        {
            let competitors: Vec<CompetitorSummary> = competitor_domains(results, limit)
                .into_iter()
                .map(|domain| {
                    let query = format!("site:{domain} {keyword}");
                    let found = available(provider.search(&query, self.options.result_count))
                        .unwrap_or_default();
                    self.summarize_competitor(domain, &found)
                })
                .collect();
            if !competitors.is_empty() {
                Augmenter::attach(&mut result, "competitors", &competitors);
            }
        }

        tracing::info!(
            keyword,
            candidates = result.candidates.len(),
            signals = result.auxiliary.len(),
            "keyword analyzed"
        );
        result
    }

    /// Top words and intent ratio of one competitor's pages.
    fn summarize_competitor(&self, domain: String, results: &SearchResults) -> CompetitorSummary {
        let tokens: Vec<String> = self.tokenize_documents(&results.documents()).concat();
        let intent_ratio = self
            .augmenter
            .intent()
            .map_or(0.0, |detector| detector.ratio(&tokens));
        let top_keywords = rank_top_k(tokens, COMPETITOR_TOP_KEYWORDS)
            .into_iter()
            .map(|r| r.item)
            .collect();
        CompetitorSummary {
            domain,
            top_keywords,
            intent_ratio,
        }
    }
}

/// Log a failed collaborator call and drop its signal.
fn available<T>(result: CollaboratorResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(collaborator = e.collaborator(), error = %e, "signal dropped");
            None
        }
    }
}
