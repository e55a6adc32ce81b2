//! Logging setup: stderr output plus an optional log file.
//!
//! Stdout is reserved for command output (and the MCP protocol under
//! `serve`), so every log line goes to stderr or to a file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

const LOG_PATH_ENV: &str = "KWSCOUT_LOG_PATH";
const LOG_DIR_ENV: &str = "KWSCOUT_LOG_DIR";
const LOG_FILE_PREFIX: &str = "kwscout.log";

/// Where log files go, if anywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Exact file to append to. Wins over `log_dir`.
    pub log_path: Option<PathBuf>,
    /// Directory for daily-rotated files.
    pub log_dir: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Read `KWSCOUT_LOG_PATH` / `KWSCOUT_LOG_DIR`, falling back to the
    /// configured directory when neither is set.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        Self::from_values(
            std::env::var_os(LOG_PATH_ENV).map(PathBuf::from),
            std::env::var_os(LOG_DIR_ENV).map(PathBuf::from),
            config_log_dir,
        )
    }

    fn from_values(
        log_path: Option<PathBuf>,
        env_log_dir: Option<PathBuf>,
        config_log_dir: Option<PathBuf>,
    ) -> Self {
        let nonempty = |p: PathBuf| (!p.as_os_str().is_empty()).then_some(p);
        Self {
            log_path: log_path.and_then(nonempty),
            log_dir: env_log_dir.and_then(nonempty).or(config_log_dir),
        }
    }
}

/// Build the filter. `RUST_LOG` always wins; otherwise `--quiet` and
/// `-v` adjust the configured level for this tool's own crates.
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(filter_directive(quiet, verbose, default_level))
}

fn filter_directive(quiet: bool, verbose: u8, default_level: &str) -> String {
    if quiet {
        return "error".to_string();
    }
    match verbose {
        0 => default_level.to_string(),
        1 => "warn,kwscout=debug,kwscout_core=debug".to_string(),
        _ => "warn,kwscout=trace,kwscout_core=trace".to_string(),
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop; keep it alive
/// for the life of the process.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    let (file_layer, guard) = match file_appender(config)? {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    Ok(guard)
}

fn file_appender(
    config: &ObservabilityConfig,
) -> anyhow::Result<Option<tracing_appender::rolling::RollingFileAppender>> {
    if let Some(path) = &config.log_path {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .with_context(|| format!("log path has no file name: {}", path.display()))?;
        ensure_dir(dir)?;
        return Ok(Some(tracing_appender::rolling::never(dir, name)));
    }
    if let Some(dir) = &config.log_dir {
        ensure_dir(dir)?;
        return Ok(Some(tracing_appender::rolling::daily(
            dir,
            LOG_FILE_PREFIX,
        )));
    }
    Ok(None)
}

fn ensure_dir(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_env_dir_beats_config() {
        let cfg = ObservabilityConfig::from_values(
            None,
            Some(PathBuf::from("/env/logs")),
            Some(PathBuf::from("/cfg/logs")),
        );
        assert_eq!(cfg.log_dir, Some(PathBuf::from("/env/logs")));
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let cfg = ObservabilityConfig::from_values(
            Some(PathBuf::new()),
            Some(PathBuf::new()),
            Some(PathBuf::from("/cfg/logs")),
        );
        assert_eq!(cfg.log_path, None);
        assert_eq!(cfg.log_dir, Some(PathBuf::from("/cfg/logs")));
    }

    #[test]
    fn quiet_and_verbose_directives() {
        assert_eq!(filter_directive(true, 2, "info"), "error");
        assert_eq!(filter_directive(false, 0, "warn"), "warn");
        assert!(filter_directive(false, 1, "info").contains("kwscout_core=debug"));
        assert!(filter_directive(false, 3, "info").contains("kwscout=trace"));
    }

    #[test]
    fn no_file_without_a_location() {
        let appender = file_appender(&ObservabilityConfig::default()).unwrap();
        assert!(appender.is_none());
    }
}
