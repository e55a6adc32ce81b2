//! Command implementations.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use owo_colors::OwoColorize;

use kwscout_core::config::Language;
use kwscout_core::text::TokenizeMode;
use kwscout_core::{AnalysisResult, AnalyzerOptions, CandidateFilter, export, render};

pub mod analyze;
pub mod extract;
pub mod info;
#[cfg(feature = "mcp")]
pub mod serve;

/// Read a file and validate its size against the configured limit.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    // Preflight: check file size via metadata before reading into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = metadata.len() as usize;
        if size > max {
            anyhow::bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    let content = std::fs::read_to_string(path.as_std_path())
        .with_context(|| format!("failed to read {path}"))?;
    Ok(content)
}

/// Analysis settings that override the loaded configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct AnalysisFlags {
    /// Drop words shorter than N characters
    #[arg(long, value_name = "N")]
    pub min_length: Option<usize>,

    /// Number of single words to report
    #[arg(long, value_name = "N")]
    pub top_single: Option<usize>,

    /// Number of two-word phrases to report
    #[arg(long, value_name = "N")]
    pub top_bigram: Option<usize>,

    /// Number of three-word phrases to report
    #[arg(long, value_name = "N")]
    pub top_trigram: Option<usize>,

    /// Language for stop words and stemming
    #[arg(long, value_enum)]
    pub language: Option<Language>,

    /// Count word stems instead of surface forms
    #[arg(long)]
    pub stem: bool,

    /// How text is split into words
    #[arg(long, value_enum, value_name = "MODE")]
    pub tokenize: Option<TokenizeMode>,

    /// Let phrases span separate snippets and titles
    #[arg(long)]
    pub join_documents: bool,

    /// Only report candidates of this type
    #[arg(long, value_enum, default_value_t, value_name = "TYPE")]
    pub filter: CandidateFilter,
}

impl AnalysisFlags {
    /// Layer these flags over `options`.
    pub fn apply(&self, options: &mut AnalyzerOptions) {
        if let Some(n) = self.min_length {
            options.min_word_length = n;
        }
        if let Some(n) = self.top_single {
            options.top_k.unigrams = n;
        }
        if let Some(n) = self.top_bigram {
            options.top_k.bigrams = n;
        }
        if let Some(n) = self.top_trigram {
            options.top_k.trigrams = n;
        }
        if let Some(language) = self.language {
            options.language = language;
        }
        if let Some(mode) = self.tokenize {
            options.tokenize_mode = mode;
        }
        options.stemming |= self.stem;
        options.join_documents |= self.join_documents;
    }
}

/// Files to save results to.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Save the full result as JSON
    #[arg(long, value_name = "FILE")]
    pub json_out: Option<Utf8PathBuf>,

    /// Save the candidates as CSV
    #[arg(long, value_name = "FILE")]
    pub csv_out: Option<Utf8PathBuf>,
}

impl OutputArgs {
    /// Write `result` to the requested files.
    ///
    /// With a `position` (1-based) the keyword is worked into each file name
    /// so several analyses in one run do not overwrite each other.
    pub fn save(&self, result: &AnalysisResult, position: Option<usize>) -> anyhow::Result<()> {
        let target = |path: &Utf8PathBuf| match position {
            Some(n) => with_slug(path, &result.keyword, n),
            None => path.clone(),
        };
        if let Some(path) = self.json_out.as_ref().map(target) {
            export::write_json(result, &path).with_context(|| format!("failed to save {path}"))?;
            eprintln!("{} {}", "saved".green(), path);
        }
        if let Some(path) = self.csv_out.as_ref().map(target) {
            export::write_csv_file(result, &path)
                .with_context(|| format!("failed to save {path}"))?;
            eprintln!("{} {}", "saved".green(), path);
        }
        Ok(())
    }
}

/// `out.json` + `kiralık araba` → `out-kiralık-araba.json`.
///
/// A keyword without letters or digits becomes `keyword-<position>`.
pub fn with_slug(path: &Utf8Path, keyword: &str, position: usize) -> Utf8PathBuf {
    let mut slug: String = keyword
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        slug = format!("keyword-{position}");
    }
    let stem = path.file_stem().unwrap_or("output");
    let name = match path.extension() {
        Some(ext) => format!("{stem}-{slug}.{ext}"),
        None => format!("{stem}-{slug}"),
    };
    path.with_file_name(name)
}

/// Print results to stdout: rendered tables, or JSON with `--json`.
///
/// JSON is a single object for one result and an array for several.
pub fn print_results(results: &[AnalysisResult], json: bool) -> anyhow::Result<()> {
    if json {
        let text = match results {
            [single] => serde_json::to_string_pretty(single)?,
            many => serde_json::to_string_pretty(many)?,
        };
        println!("{text}");
        return Ok(());
    }

    for (i, result) in results.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print!("{}", render::render(result));
    }
    Ok(())
}
