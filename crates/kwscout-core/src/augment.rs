//! Result augmentation: purchase intent, synonyms, auxiliary signals.
//!
//! The augmenter only adds information. It never removes or reorders the
//! ranked candidates it is handed.

use std::collections::BTreeMap;

use aho_corasick::AhoCorasick;
use serde::Serialize;

use crate::error::{ConfigError, ConfigResult};
use crate::model::{AnalysisResult, CandidateKeyword};

/// Phrases that signal purchase intent in Turkish search text.
pub const DEFAULT_INTENT_PHRASES: &[&str] = &[
    "satın al", "fiyat", "indirim", "ucuz", "sipariş", "kargo", "stok",
];

/// Case-insensitive substring matcher over a fixed phrase list.
#[derive(Debug, Clone)]
pub struct IntentDetector {
    matcher: AhoCorasick,
    phrases: Vec<String>,
}

impl IntentDetector {
    /// Build a detector. Blank phrases are ignored; returns `Ok(None)` when
    /// nothing is left to match.
    pub fn new<I, S>(phrases: I) -> ConfigResult<Option<Self>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let phrases: Vec<String> = phrases
            .into_iter()
            .map(|p| p.as_ref().trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        if phrases.is_empty() {
            return Ok(None);
        }
        let matcher = AhoCorasick::new(&phrases).map_err(|e| ConfigError::Invalid {
            field: "analysis.intent_phrases",
            reason: e.to_string(),
        })?;
        Ok(Some(Self { matcher, phrases }))
    }

    /// Whether `text` contains any intent phrase, ignoring case.
    pub fn matches(&self, text: &str) -> bool {
        self.matcher.is_match(&text.to_lowercase())
    }

    /// Percentage of `tokens` carrying intent, rounded to two decimals.
    /// Zero for an empty slice.
    pub fn ratio(&self, tokens: &[String]) -> f64 {
        if tokens.is_empty() {
            return 0.0;
        }
        let hits = tokens.iter().filter(|t| self.matches(t)).count();
        round2(hits as f64 / tokens.len() as f64 * 100.0)
    }

    /// The lowercased phrases being matched.
    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }
}

/// Round to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Adds intent flags, synonym entries and auxiliary payloads to results.
#[derive(Debug, Clone, Default)]
pub struct Augmenter {
    intent: Option<IntentDetector>,
    synonyms: BTreeMap<String, Vec<String>>,
}

impl Augmenter {
    /// Create an augmenter. `intent` is `None` when detection is disabled.
    pub const fn new(
        intent: Option<IntentDetector>,
        synonyms: BTreeMap<String, Vec<String>>,
    ) -> Self {
        Self { intent, synonyms }
    }

    /// The intent detector, if configured.
    pub const fn intent(&self) -> Option<&IntentDetector> {
        self.intent.as_ref()
    }

    /// Set `intent` on every candidate. No-op when detection is disabled.
    pub fn annotate(&self, candidates: &mut [CandidateKeyword]) {
        let Some(detector) = &self.intent else {
            return;
        };
        for candidate in candidates {
            candidate.intent = Some(detector.matches(&candidate.text));
        }
    }

    /// Append the configured synonyms of `keyword`, in list order.
    ///
    /// Lookup is exact after trimming. Blank synonym entries are skipped.
    pub fn append_synonyms(&self, keyword: &str, candidates: &mut Vec<CandidateKeyword>) {
        let Some(list) = self.synonyms.get(keyword.trim()) else {
            return;
        };
        let start = candidates.len();
        candidates.extend(
            list.iter()
                .filter(|s| !s.trim().is_empty())
                .map(|s| CandidateKeyword::synonym(s)),
        );
        tracing::debug!(keyword, added = candidates.len() - start, "synonyms appended");
        self.annotate(&mut candidates[start..]);
    }

    /// Store `payload` under `auxiliary[name]` as-is.
    ///
    /// A payload that cannot be represented as JSON is logged and dropped.
    pub fn attach<T: Serialize>(result: &mut AnalysisResult, name: &str, payload: &T) {
        match serde_json::to_value(payload) {
            Ok(value) => {
                result.auxiliary.insert(name.to_string(), value);
            }
            Err(e) => tracing::warn!(name, error = %e, "dropping auxiliary payload"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Count, Source};
    use crate::ngram::NgramSize;

    fn detector() -> IntentDetector {
        IntentDetector::new(DEFAULT_INTENT_PHRASES).unwrap().unwrap()
    }

    fn mavibet_table() -> BTreeMap<String, Vec<String>> {
        BTreeMap::from([(
            "mavibet".to_string(),
            vec!["bahis".to_string(), "iddaa".to_string(), "kumar".to_string()],
        )])
    }

    #[test]
    fn intent_matches_substrings_case_insensitively() {
        let d = detector();
        assert!(d.matches("ucuz uçak bileti"));
        assert!(d.matches("En UCUZ Otel"));
        assert!(d.matches("hemen satın al"));
        assert!(d.matches("fiyatları"));
        assert!(!d.matches("hava durumu"));
    }

    #[test]
    fn blank_phrases_disable_detection() {
        assert!(IntentDetector::new(["", "  "]).unwrap().is_none());
        assert!(IntentDetector::new(Vec::<String>::new()).unwrap().is_none());
    }

    #[test]
    fn ratio_is_a_rounded_percentage() {
        let d = detector();
        let tokens: Vec<String> = ["ucuz", "otel", "tatil"].iter().map(|s| s.to_string()).collect();
        assert!((d.ratio(&tokens) - 33.33).abs() < f64::EPSILON);
        assert!(d.ratio(&[]).abs() < f64::EPSILON);
    }

    #[test]
    fn synonyms_are_appended_last_in_order() {
        let augmenter = Augmenter::new(None, mavibet_table());
        let mut candidates = vec![CandidateKeyword::extracted("giriş", NgramSize::Unigram, 4)];
        augmenter.append_synonyms("mavibet", &mut candidates);

        assert_eq!(candidates.len(), 4);
        assert_eq!(candidates[0].text, "giriş");
        let synonyms: Vec<&str> = candidates[1..].iter().map(|c| c.text.as_str()).collect();
        assert_eq!(synonyms, vec!["bahis", "iddaa", "kumar"]);
        for c in &candidates[1..] {
            assert_eq!(c.source, Source::Synonym);
            assert_eq!(c.count, Count::Synonym);
        }
    }

    #[test]
    fn keyword_is_trimmed_before_lookup() {
        let augmenter = Augmenter::new(None, mavibet_table());
        let mut candidates = Vec::new();
        augmenter.append_synonyms("  mavibet ", &mut candidates);
        assert_eq!(candidates.len(), 3);
    }

    #[test]
    fn unknown_keyword_adds_nothing() {
        let augmenter = Augmenter::new(None, mavibet_table());
        let mut candidates = Vec::new();
        augmenter.append_synonyms("Mavibet", &mut candidates);
        assert!(candidates.is_empty());
    }

    #[test]
    fn annotate_sets_flags_without_reordering() {
        let augmenter = Augmenter::new(Some(detector()), BTreeMap::new());
        let mut candidates = vec![
            CandidateKeyword::extracted("araba", NgramSize::Unigram, 5),
            CandidateKeyword::extracted("ucuz araba", NgramSize::Bigram, 2),
        ];
        augmenter.annotate(&mut candidates);
        assert_eq!(candidates[0].text, "araba");
        assert_eq!(candidates[0].intent, Some(false));
        assert_eq!(candidates[1].intent, Some(true));
    }

    #[test]
    fn synonyms_get_intent_when_enabled() {
        let table = BTreeMap::from([("tv".to_string(), vec!["ucuz televizyon".to_string()])]);
        let augmenter = Augmenter::new(Some(detector()), table);
        let mut candidates = Vec::new();
        augmenter.append_synonyms("tv", &mut candidates);
        assert_eq!(candidates[0].intent, Some(true));
        assert_eq!(candidates[0].size, 2);
    }

    #[test]
    fn attach_passes_payload_through() {
        let mut result = AnalysisResult::new("k");
        Augmenter::attach(&mut result, "suggestions", &vec!["a", "b"]);
        assert_eq!(result.auxiliary["suggestions"], serde_json::json!(["a", "b"]));
    }
}
