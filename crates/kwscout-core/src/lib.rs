//! Core library for kwscout.
//!
//! This crate provides the keyword extraction pipeline used by the
//! `kwscout` CLI and any downstream consumers.
//!
//! # Modules
//!
//! - [`text`] - Tokenization, length filter, stemming hook
//! - [`stopwords`] - Per-language stop-word sets
//! - [`ngram`] - Contiguous n-gram windows
//! - [`rank`] - Frequency ranking with first-appearance tie-break
//! - [`augment`] - Purchase intent, synonyms, auxiliary signals
//! - [`pipeline`] - The analyzer that ties the stages together
//! - [`providers`] - Search, trend and autocomplete collaborators
//! - [`signals`] - Competition and competitor summaries
//! - [`render`] / [`export`] - Text, JSON and CSV output
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```no_run
//! use kwscout_core::{ConfigLoader, KeywordAnalyzer};
//!
//! let (config, _sources) = ConfigLoader::new()
//!     .with_user_config(true)
//!     .load()
//!     .expect("Failed to load configuration");
//!
//! let analyzer = KeywordAnalyzer::new(config.analysis).expect("valid options");
//! let documents = vec!["Ucuz kiralık araba fiyatları".to_string()];
//! let result = analyzer.analyze_documents("kiralık araba", &documents);
//! print!("{}", kwscout_core::render::render(&result));
//! ```
#![deny(unsafe_code)]

pub mod augment;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod ngram;
pub mod pipeline;
pub mod providers;
pub mod rank;
pub mod render;
pub mod signals;
pub mod stem;
pub mod stopwords;
pub mod text;

pub use config::{Config, ConfigLoader, ConfigSources, Language, LogLevel};
pub use error::{
    CollaboratorError, CollaboratorResult, ConfigError, ConfigResult, ExportError, ExportResult,
};
pub use model::{AnalysisResult, CandidateFilter, CandidateKeyword, CandidateKind, Count, Source};
pub use pipeline::{AnalyzerOptions, KeywordAnalyzer, TopK};
pub use providers::Collaborators;

/// Default maximum input size for offline analysis: 5 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;
