//! Extract command: offline ranking of local text or a saved search response.

use anyhow::{Context, bail};
use camino::Utf8PathBuf;
use clap::Args;
use tracing::{debug, instrument};

use kwscout_core::providers::SearchResults;
use kwscout_core::{AnalysisResult, AnalyzerOptions, Config, KeywordAnalyzer};

use super::{AnalysisFlags, OutputArgs, print_results, read_input_file};

/// Arguments for the `extract` subcommand.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Text file; blank lines separate documents
    pub file: Utf8PathBuf,

    /// Seed keyword the text was gathered for
    #[arg(short, long)]
    pub keyword: String,

    /// Treat FILE as a saved SerpApi JSON response
    #[arg(long)]
    pub serp: bool,

    #[command(flatten)]
    pub analysis: AnalysisFlags,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Rank keywords in a local file without contacting any service.
#[instrument(name = "cmd_extract", skip_all, fields(file = %args.file, serp = args.serp))]
pub fn cmd_extract(
    args: ExtractArgs,
    global_json: bool,
    config: &Config,
    max_input: Option<usize>,
) -> anyhow::Result<()> {
    let keyword = args.keyword.trim();
    if keyword.is_empty() {
        bail!("--keyword must not be blank");
    }
    debug!(keyword, "executing extract command");

    let content = read_input_file(&args.file, max_input)?;

    let mut options: AnalyzerOptions = config.analysis.clone();
    args.analysis.apply(&mut options);
    let analyzer = KeywordAnalyzer::new(options).context("invalid analysis settings")?;

    let result = if args.serp {
        let results: SearchResults = serde_json::from_str(&content)
            .with_context(|| format!("{} is not a search response", args.file))?;
        analyzer.analyze_search_results(keyword, &results)
    } else {
        analyzer.analyze_documents(keyword, &split_documents(&content))
    }
    .filtered(args.analysis.filter);

    args.output.save(&result, None)?;
    print_results(std::slice::from_ref(&result), global_json)
}

/// Split text into documents at blank lines.
pub fn split_documents(text: &str) -> Vec<String> {
    let mut documents = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                documents.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        documents.push(current.join("\n"));
    }
    documents
}

/// Analyze inline text the same way `extract` does.
pub fn extract_from_text(analyzer: &KeywordAnalyzer, keyword: &str, text: &str) -> AnalysisResult {
    analyzer.analyze_documents(keyword.trim(), &split_documents(text))
}
