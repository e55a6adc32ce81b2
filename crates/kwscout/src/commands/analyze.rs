//! Analyze command: live keyword discovery through SerpApi.

use std::time::Duration;

use anyhow::{Context, bail};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, instrument};

use kwscout_core::providers::serpapi::SerpApiClient;
use kwscout_core::{AnalysisResult, Collaborators, Config, KeywordAnalyzer};

use super::{AnalysisFlags, OutputArgs, print_results};

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Seed keywords to analyze
    #[arg(required = true, value_name = "KEYWORD")]
    pub keywords: Vec<String>,

    /// Organic results to request per search
    #[arg(long, value_name = "N")]
    pub results: Option<usize>,

    /// Skip the trend-interest lookup
    #[arg(long)]
    pub no_trends: bool,

    /// Also look up trend interest for every ranked candidate (one request each)
    #[arg(long, conflicts_with = "no_trends")]
    pub candidate_trends: bool,

    /// Skip autocomplete suggestions
    #[arg(long)]
    pub no_suggestions: bool,

    /// Summarize up to N competitor domains (one search each)
    #[arg(long, value_name = "N", num_args = 0..=1, default_missing_value = "5")]
    pub competitors: Option<usize>,

    #[command(flatten)]
    pub analysis: AnalysisFlags,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Search, rank and augment each keyword in turn.
#[instrument(name = "cmd_analyze", skip_all, fields(keywords = args.keywords.len()))]
pub fn cmd_analyze(
    args: AnalyzeArgs,
    global_json: bool,
    quiet: bool,
    config: &Config,
) -> anyhow::Result<()> {
    let keywords: Vec<&str> = args
        .keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect();
    if keywords.is_empty() {
        bail!("no keyword given");
    }
    debug!(?keywords, "executing analyze command");

    let mut options = config.analysis.clone();
    args.analysis.apply(&mut options);
    if let Some(n) = args.results {
        options.result_count = n;
    }
    let analyzer = KeywordAnalyzer::new(options).context("invalid analysis settings")?;

    let client = SerpApiClient::new(&config.serp, &config.trends)
        .context("cannot reach the search provider")?;

    let mut collaborators = Collaborators::none().with_search(&client);
    if config.trends.enabled && !args.no_trends {
        collaborators = collaborators.with_trends(&client);
        if config.trends.per_candidate || args.candidate_trends {
            collaborators = collaborators.with_candidate_trends();
        }
    }
    if config.suggestions.enabled && !args.no_suggestions {
        collaborators = collaborators.with_suggestions(&client);
    }
    let competitor_limit = args.competitors.or_else(|| {
        config
            .competitors
            .enabled
            .then_some(config.competitors.max_competitors)
    });
    if let Some(limit) = competitor_limit.filter(|&n| n > 0) {
        collaborators = collaborators.with_competitors(limit);
    }

    let progress = (!quiet && !global_json).then(spinner);

    let per_keyword = keywords.len() > 1;
    let mut results: Vec<AnalysisResult> = Vec::with_capacity(keywords.len());
    for (i, keyword) in keywords.into_iter().enumerate() {
        if let Some(bar) = &progress {
            bar.set_message(format!("analyzing {keyword}"));
        }
        let result = analyzer
            .analyze(keyword, &collaborators)
            .filtered(args.analysis.filter);
        args.output.save(&result, per_keyword.then_some(i + 1))?;
        results.push(result);
    }

    if let Some(bar) = progress {
        bar.finish_and_clear();
    }

    print_results(&results, global_json)
}

fn spinner() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
