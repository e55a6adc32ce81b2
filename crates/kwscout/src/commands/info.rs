//! Info command implementation

use clap::Args;
use kwscout_core::config::{Config, ConfigSources};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    repository: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            repository: env!("CARGO_PKG_REPOSITORY"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
    language: String,
    top_k: [usize; 3],
    api_key_set: bool,
    trends: bool,
    candidate_trends: bool,
    suggestions: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    competitors: Option<usize>,
    synonym_seeds: usize,
}

impl ConfigInfo {
    fn from_config(config: &Config, sources: &ConfigSources) -> Self {
        let top_k = &config.analysis.top_k;
        Self {
            config_file: sources.primary_file().map(|p| p.to_string()),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
            language: config.analysis.language.to_string(),
            top_k: [top_k.unigrams, top_k.bigrams, top_k.trigrams],
            api_key_set: config
                .serp
                .api_key
                .as_deref()
                .is_some_and(|k| !k.trim().is_empty()),
            trends: config.trends.enabled,
            candidate_trends: config.trends.enabled && config.trends.per_candidate,
            suggestions: config.suggestions.enabled,
            competitors: config
                .competitors
                .enabled
                .then_some(config.competitors.max_competitors),
            synonym_seeds: config.analysis.synonyms.len(),
        }
    }
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
}

/// Print package information and the effective configuration.
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing info command");

    let full_info = FullInfo {
        package: PackageInfo::new(),
        config: ConfigInfo::from_config(config, sources),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&full_info)?);
        return Ok(());
    }

    let package = &full_info.package;
    println!("{} {}", package.name.bold(), package.version.green());
    if !package.description.is_empty() {
        println!("{}", package.description);
    }
    if !package.license.is_empty() {
        println!("{}: {}", "License".dimmed(), package.license);
    }
    if !package.repository.is_empty() {
        println!("{}: {}", "Repository".dimmed(), package.repository.cyan());
    }

    let cfg = &full_info.config;
    println!();
    println!("{}", "Configuration".bold().underline());
    match cfg.config_file {
        Some(ref path) => println!("{}: {}", "Config file".dimmed(), path.cyan()),
        None => println!("{}: {}", "Config file".dimmed(), "none loaded".yellow()),
    }
    println!("{}: {}", "Log level".dimmed(), cfg.log_level);
    if let Some(ref dir) = cfg.log_dir {
        println!("{}: {}", "Log directory".dimmed(), dir);
    }

    println!();
    println!("{}", "Analysis".bold().underline());
    println!("{}: {}", "Language".dimmed(), cfg.language);
    println!(
        "{}: {} single, {} bigram, {} trigram",
        "Top K".dimmed(),
        cfg.top_k[0],
        cfg.top_k[1],
        cfg.top_k[2]
    );
    println!("{}: {}", "Synonym seeds".dimmed(), cfg.synonym_seeds);

    println!();
    println!("{}", "Collaborators".bold().underline());
    if cfg.api_key_set {
        println!("{}: {}", "SerpApi key".dimmed(), "set".green());
    } else {
        println!("{}: {}", "SerpApi key".dimmed(), "missing".yellow());
    }
    print_toggle("Trends", cfg.trends);
    print_toggle("Candidate trends", cfg.candidate_trends);
    print_toggle("Suggestions", cfg.suggestions);
    match cfg.competitors {
        Some(n) => println!("{}: up to {}", "Competitors".dimmed(), n),
        None => println!("{}: {}", "Competitors".dimmed(), "off".dimmed()),
    }

    Ok(())
}

fn print_toggle(label: &str, enabled: bool) {
    if enabled {
        println!("{}: {}", label.dimmed(), "on".green());
    } else {
        println!("{}: {}", label.dimmed(), "off".dimmed());
    }
}
