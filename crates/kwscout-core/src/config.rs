//! Layered settings for the keyword pipeline and its providers.
//!
//! [`ConfigLoader`] folds several sources into one [`Config`], lowest first:
//!
//! 1. built-in defaults
//! 2. `SERPAPI_API_KEY`
//! 3. `config.<ext>` in the per-user config directory
//! 4. `.kwscout.<ext>` then `kwscout.<ext>` in the nearest directory, walking
//!    up from the search root until a `.git` directory is passed
//! 5. files handed to [`ConfigLoader::with_file`]
//! 6. `KWSCOUT_*` variables, `__` splitting nested keys
//!    (`KWSCOUT_SERP__API_KEY` sets `serp.api_key`)
//!
//! `<ext>` is `toml`, `yaml`, `yml` or `json`. Several files in one directory
//! are all merged, in that extension order.
//!
//! # Example
//! ```no_run
//! use camino::Utf8PathBuf;
//! use kwscout_core::config::{Config, ConfigLoader};
//!
//! let cwd = std::env::current_dir().unwrap();
//! let cwd = Utf8PathBuf::try_from(cwd).expect("current directory is not valid UTF-8");
//! let (config, _sources) = ConfigLoader::new()
//!     .with_project_search(&cwd)
//!     .load()
//!     .unwrap();
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::pipeline::AnalyzerOptions;

/// Natural language of the analyzed text.
///
/// Selects the stop-word list and the stemming algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Language {
    /// Turkish (the default market).
    #[default]
    Turkish,
    /// English.
    English,
    /// German.
    German,
    /// French.
    French,
    /// Spanish.
    Spanish,
    /// Italian.
    Italian,
    /// Portuguese.
    Portuguese,
    /// Dutch.
    Dutch,
    /// Russian.
    Russian,
}

impl Language {
    /// Returns the language as a lowercase name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Turkish => "turkish",
            Self::English => "english",
            Self::German => "german",
            Self::French => "french",
            Self::Spanish => "spanish",
            Self::Italian => "italian",
            Self::Portuguese => "portuguese",
            Self::Dutch => "dutch",
            Self::Russian => "russian",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings for the SerpApi collaborator.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct SerpConfig {
    /// SerpApi key. Required for live analysis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Search endpoint.
    pub endpoint: String,
    /// Country of the search (`gl`).
    pub gl: String,
    /// Interface language of the search (`hl`).
    pub hl: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Extra attempts after a transient failure. `0` disables retries.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further attempt.
    pub retry_backoff_ms: u64,
}

impl Default for SerpConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://serpapi.com/search".to_string(),
            gl: "tr".to_string(),
            hl: "tr".to_string(),
            timeout_secs: 10,
            max_retries: 0,
            retry_backoff_ms: 500,
        }
    }
}

/// Settings for the trend-interest lookup.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct TrendsConfig {
    /// Query trend interest for the seed keyword.
    pub enabled: bool,
    /// Region code (e.g. `TR`).
    pub geo: String,
    /// Timeframe expression (e.g. `today 12-m`, `today 3-m`).
    pub timeframe: String,
    /// Also look up every ranked candidate. Costs one request per candidate.
    pub per_candidate: bool,
}

impl Default for TrendsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            geo: "TR".to_string(),
            timeframe: "today 12-m".to_string(),
            per_candidate: false,
        }
    }
}

/// Settings for autocomplete suggestions.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct SuggestionsConfig {
    /// Fetch autocomplete suggestions and analyze them with the search results.
    pub enabled: bool,
}

impl Default for SuggestionsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Settings for per-competitor analysis.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct CompetitorsConfig {
    /// Run a `site:` search for each ranking domain.
    pub enabled: bool,
    /// Maximum number of domains to analyze.
    pub max_competitors: usize,
}

impl Default for CompetitorsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_competitors: 5,
        }
    }
}

/// The configuration for kwscout.
///
/// This struct is deserialized from config files found during discovery
/// (TOML, YAML, or JSON).
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Log level for the application (e.g., "debug", "info", "warn", "error").
    pub log_level: LogLevel,
    /// Directory for daily log files. No log file is written when unset.
    pub log_dir: Option<Utf8PathBuf>,
    /// Maximum input size in bytes for offline analysis (default: 5 MiB).
    ///
    /// Omit to use the default. Use `disable_input_limit` to remove the
    /// limit entirely.
    pub max_input_bytes: Option<usize>,
    /// Disable the input size limit entirely.
    #[serde(default)]
    pub disable_input_limit: bool,
    /// Tokenization, ranking and augmentation settings.
    pub analysis: AnalyzerOptions,
    /// Search provider settings.
    pub serp: SerpConfig,
    /// Trend-interest settings.
    pub trends: TrendsConfig,
    /// Autocomplete settings.
    pub suggestions: SuggestionsConfig,
    /// Competitor analysis settings.
    pub competitors: CompetitorsConfig,
}

/// Log level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose output for debugging and development.
    Debug,
    /// Standard operational information (default).
    #[default]
    Info,
    /// Warnings about potential issues.
    Warn,
    /// Errors that indicate failures.
    Error,
}

impl LogLevel {
    /// Returns the log level as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// The files that fed a [`Config`], as reported by `kwscout info`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigSources {
    /// Files from the nearest project directory, weakest first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub project_files: Vec<Utf8PathBuf>,
    /// Per-user config file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_file: Option<Utf8PathBuf>,
    /// Files passed with `--config`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigSources {
    /// The file whose values win: last explicit, else nearest project, else user.
    pub fn primary_file(&self) -> Option<&Utf8Path> {
        self.explicit_files
            .last()
            .map(Utf8PathBuf::as_path)
            .or_else(|| self.project_files.last().map(Utf8PathBuf::as_path))
            .or(self.user_file.as_deref())
    }
}

/// Extensions tried, weakest first.
const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Stem of project config file names and the user config directory.
const APP_NAME: &str = "kwscout";

/// Prefix for environment overrides.
const ENV_PREFIX: &str = "KWSCOUT_";

/// Collects the sources for one configuration load.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    project_search_root: Option<Utf8PathBuf>,
    include_user_config: bool,
    /// Directory entry that ends the upward walk.
    boundary_marker: Option<String>,
    explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigLoader {
    /// Loader that reads the user config and stops at `.git`.
    pub fn new() -> Self {
        Self {
            project_search_root: None,
            include_user_config: true,
            boundary_marker: Some(".git".to_string()),
            explicit_files: Vec::new(),
        }
    }

    /// Look for project files starting in `path`.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.project_search_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set whether to include user config from `~/.config/kwscout/`.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.include_user_config = include;
        self
    }

    /// Walk all the way to the filesystem root.
    pub fn without_boundary_marker(mut self) -> Self {
        self.boundary_marker = None;
        self
    }

    /// Merge `path` above every discovered file. Later calls win.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.explicit_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration, merging all discovered sources.
    ///
    /// Precedence (highest to lowest):
    /// 1. `KWSCOUT_*` environment variables
    /// 2. Explicit files (in order added via `with_file`)
    /// 3. Project config (closest to search root)
    /// 4. User config (`~/.config/kwscout/config.<ext>`)
    /// 5. `SERPAPI_API_KEY`
    /// 6. Default values
    #[tracing::instrument(skip(self), fields(search_root = ?self.project_search_root))]
    pub fn load(self) -> ConfigResult<(Config, ConfigSources)> {
        tracing::debug!("loading configuration");
        let mut figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(
                Env::raw()
                    .only(&["SERPAPI_API_KEY"])
                    .map(|_| "serp.api_key".into()),
            );
        let mut sources = ConfigSources::default();

        if self.include_user_config
            && let Some(user_config) = self.find_user_config()
        {
            figment = Self::merge_file(figment, &user_config);
            sources.user_file = Some(user_config);
        }

        if let Some(ref root) = self.project_search_root {
            let project_configs = self.find_project_configs(root);
            for pc in &project_configs {
                figment = Self::merge_file(figment, pc);
            }
            sources.project_files = project_configs;
        }

        for file in &self.explicit_files {
            figment = Self::merge_file(figment, file);
        }
        sources.explicit_files = self.explicit_files;

        // KWSCOUT_ANALYSIS__LANGUAGE=english, KWSCOUT_LOG_LEVEL=debug, etc.
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        tracing::info!(
            log_level = config.log_level.as_str(),
            language = %config.analysis.language,
            has_api_key = config.serp.api_key.is_some(),
            "configuration loaded"
        );
        Ok((config, sources))
    }

    /// Find project config files by walking up from the given directory.
    ///
    /// Returns all matching config files from the closest directory that has
    /// any match, dotfiles before regular files.
    fn find_project_configs(&self, start: &Utf8Path) -> Vec<Utf8PathBuf> {
        let mut current = Some(start.to_path_buf());

        while let Some(dir) = current {
            let mut found = Vec::new();

            for ext in CONFIG_EXTENSIONS {
                let dotfile = dir.join(format!(".{APP_NAME}.{ext}"));
                if dotfile.is_file() {
                    found.push(dotfile);
                }
            }
            for ext in CONFIG_EXTENSIONS {
                let regular = dir.join(format!("{APP_NAME}.{ext}"));
                if regular.is_file() {
                    found.push(regular);
                }
            }

            if !found.is_empty() {
                return found;
            }

            // Checked after the config files so a config next to the marker is found.
            if let Some(ref marker) = self.boundary_marker
                && dir.join(marker).exists()
                && dir != start
            {
                break;
            }

            current = dir.parent().map(Utf8Path::to_path_buf);
        }

        Vec::new()
    }

    /// First `config.<ext>` in the user config directory.
    fn find_user_config(&self) -> Option<Utf8PathBuf> {
        let config_dir = user_config_dir()?;

        for ext in CONFIG_EXTENSIONS {
            let config_path = config_dir.join(format!("config.{ext}"));
            if config_path.is_file() {
                return Some(config_path);
            }
        }

        None
    }

    /// Unknown extensions are read as TOML.
    fn merge_file(figment: Figment, path: &Utf8Path) -> Figment {
        match path.extension() {
            Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
            Some("json") => figment.merge(Json::file_exact(path.as_str())),
            _ => figment.merge(Toml::file_exact(path.as_str())),
        }
    }
}

/// Per-user config directory: `~/.config/kwscout` on Linux,
/// `~/Library/Application Support/kwscout` on macOS.
///
/// `None` when there is no home directory or it is not UTF-8.
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", APP_NAME)?;
    Utf8PathBuf::from_path_buf(dirs.config_dir().to_path_buf()).ok()
}
