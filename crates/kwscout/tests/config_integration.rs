//! Configuration integration tests.
//!
//! These tests verify config discovery, format parsing, and precedence
//! from an end-to-end perspective using the compiled binary. Tests use
//! `info --json` to assert actual config values, not just process success.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Returns a Command configured to run our binary, isolated from the
/// caller's home directory and environment overrides.
#[allow(deprecated)]
fn cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("SERPAPI_API_KEY")
        .env_remove("KWSCOUT_SERP__API_KEY")
        .env_remove("KWSCOUT_ANALYSIS__LANGUAGE")
        .env_remove("KWSCOUT_LOG_LEVEL")
        .env_remove("RUST_LOG");
    cmd
}

/// Run `info --json` from a directory and parse the JSON output.
fn info_json_with(dir: &Path, home: &Path, env: &[(&str, &str)]) -> Value {
    let mut command = cmd(home);
    command.args(["-C", dir.to_str().unwrap(), "info", "--json"]);
    for (key, value) in env {
        command.env(key, value);
    }
    let output = command.output().expect("failed to run command");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("invalid JSON output")
}

fn info_json(dir: &Path) -> Value {
    let home = TempDir::new().unwrap();
    info_json_with(dir, home.path(), &[])
}

// =============================================================================
// Config File Discovery
// =============================================================================

#[test]
fn runs_without_config_file() {
    let tmp = TempDir::new().unwrap();
    let json = info_json(tmp.path());

    assert_eq!(json["config"]["log_level"], "info");
    assert_eq!(json["config"]["language"], "turkish");
    assert_eq!(json["config"]["top_k"], serde_json::json!([5, 3, 3]));
    assert_eq!(json["config"]["api_key_set"], false);
    assert!(
        json["config"]["config_file"].is_null(),
        "no config file should be reported"
    );
}

#[test]
fn discovers_dotfile_config_in_current_dir() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".kwscout.toml"),
        "[analysis]\nlanguage = \"english\"\n",
    )
    .unwrap();

    let json = info_json(tmp.path());

    assert_eq!(json["config"]["language"], "english");
    let reported = json["config"]["config_file"].as_str().unwrap();
    assert!(
        reported.ends_with(".kwscout.toml"),
        "should report dotfile: {reported}"
    );
}

#[test]
fn discovers_config_in_parent_directory() {
    let tmp = TempDir::new().unwrap();
    let sub_dir = tmp.path().join("campaigns").join("spring");
    fs::create_dir_all(&sub_dir).unwrap();
    fs::write(tmp.path().join("kwscout.toml"), r#"log_level = "debug""#).unwrap();

    let json = info_json(&sub_dir);

    assert_eq!(json["config"]["log_level"], "debug");
    assert!(json["config"]["config_file"].as_str().is_some());
}

#[test]
fn regular_name_overrides_dotfile() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".kwscout.toml"),
        "[analysis.top_k]\nunigrams = 8\nbigrams = 4\n",
    )
    .unwrap();
    fs::write(
        tmp.path().join("kwscout.toml"),
        "[analysis.top_k]\nunigrams = 10\n",
    )
    .unwrap();

    let json = info_json(tmp.path());

    // Tables merge key by key: unigrams from the regular file, bigrams
    // from the dotfile, trigrams from the defaults.
    assert_eq!(json["config"]["top_k"], serde_json::json!([10, 4, 3]));
}

#[cfg(target_os = "linux")]
#[test]
fn user_config_is_lowest_file_precedence() {
    let home = TempDir::new().unwrap();
    let user_dir = home.path().join(".config").join("kwscout");
    fs::create_dir_all(&user_dir).unwrap();
    fs::write(
        user_dir.join("config.toml"),
        "log_level = \"warn\"\n[competitors]\nenabled = true\nmax_competitors = 2\n",
    )
    .unwrap();

    let project = TempDir::new().unwrap();
    fs::write(project.path().join(".kwscout.toml"), r#"log_level = "error""#).unwrap();

    let json = info_json_with(project.path(), home.path(), &[]);

    assert_eq!(json["config"]["log_level"], "error");
    assert_eq!(json["config"]["competitors"], 2);
}

// =============================================================================
// Config Format Parsing
// =============================================================================

#[test]
fn parses_yaml_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".kwscout.yaml"),
        "analysis:\n  language: german\ntrends:\n  enabled: false\n",
    )
    .unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["language"], "german");
    assert_eq!(json["config"]["trends"], false);
}

#[test]
fn parses_yml_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".kwscout.yml"), "log_level: debug\n").unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["log_level"], "debug");
}

#[test]
fn parses_json_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".kwscout.json"),
        r#"{"analysis": {"synonyms": {"otel": ["pansiyon", "konaklama"]}}, "suggestions": {"enabled": false}}"#,
    )
    .unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["synonym_seeds"], 1);
    assert_eq!(json["config"]["suggestions"], false);
}

// =============================================================================
// Config Precedence
// =============================================================================

#[test]
fn closer_config_takes_precedence() {
    let tmp = TempDir::new().unwrap();
    let sub_dir = tmp.path().join("project");
    fs::create_dir_all(&sub_dir).unwrap();

    fs::write(
        tmp.path().join(".kwscout.toml"),
        "[analysis]\nlanguage = \"french\"\n",
    )
    .unwrap();
    fs::write(
        sub_dir.join(".kwscout.toml"),
        "[analysis]\nlanguage = \"spanish\"\n",
    )
    .unwrap();

    let json = info_json(&sub_dir);

    assert_eq!(json["config"]["language"], "spanish", "closer config should win");
}

#[test]
fn explicit_config_overrides_discovered() {
    let tmp = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    fs::write(tmp.path().join(".kwscout.toml"), r#"log_level = "debug""#).unwrap();
    let explicit = tmp.path().join("override.toml");
    fs::write(&explicit, r#"log_level = "error""#).unwrap();

    let output = cmd(home.path())
        .args([
            "-C",
            tmp.path().to_str().unwrap(),
            "--config",
            explicit.to_str().unwrap(),
            "info",
            "--json",
        ])
        .output()
        .expect("failed to run command");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["config"]["log_level"], "error");
    let reported = json["config"]["config_file"].as_str().unwrap();
    assert!(
        reported.ends_with("override.toml"),
        "--config path should be reported: {reported}"
    );
}

#[test]
fn environment_overrides_files() {
    let tmp = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".kwscout.toml"),
        "[analysis]\nlanguage = \"english\"\n",
    )
    .unwrap();

    let json = info_json_with(
        tmp.path(),
        home.path(),
        &[("KWSCOUT_ANALYSIS__LANGUAGE", "dutch")],
    );
    assert_eq!(json["config"]["language"], "dutch");
}

#[test]
fn candidate_trends_are_off_until_enabled() {
    let tmp = TempDir::new().unwrap();
    let json = info_json(tmp.path());
    assert_eq!(json["config"]["candidate_trends"], false);

    fs::write(
        tmp.path().join(".kwscout.toml"),
        "[trends]\nper_candidate = true\n",
    )
    .unwrap();
    let json = info_json(tmp.path());
    assert_eq!(json["config"]["trends"], true);
    assert_eq!(json["config"]["candidate_trends"], true);
}

#[test]
fn serpapi_key_variable_is_honored_but_never_printed() {
    let tmp = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();

    let output = cmd(home.path())
        .args(["-C", tmp.path().to_str().unwrap(), "info", "--json"])
        .env("SERPAPI_API_KEY", "sk-test-not-a-real-key")
        .output()
        .expect("failed to run command");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("sk-test-not-a-real-key"));
    let json: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["config"]["api_key_set"], true);
}

// =============================================================================
// Error Cases
// =============================================================================

#[test]
fn invalid_toml_config_shows_error() {
    let tmp = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    fs::write(tmp.path().join(".kwscout.toml"), "this is not valid toml [[[").unwrap();

    cmd(home.path())
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn invalid_json_config_shows_error() {
    let tmp = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    fs::write(tmp.path().join(".kwscout.json"), "{not valid json}").unwrap();

    cmd(home.path())
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .failure();
}

#[test]
fn unknown_language_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".kwscout.toml"),
        "[analysis]\nlanguage = \"klingon\"\n",
    )
    .unwrap();

    cmd(home.path())
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("klingon"));
}

#[test]
fn unknown_config_field_is_ignored() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".kwscout.toml"),
        "log_level = \"info\"\nunknown_field = \"should be ignored\"\n",
    )
    .unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["log_level"], "info");
}

// =============================================================================
// Boundary Marker Tests
// =============================================================================

#[test]
fn git_boundary_stops_config_search() {
    let tmp = TempDir::new().unwrap();

    // parent/.kwscout.toml + parent/repo/.git/ + parent/repo/src/
    let parent = tmp.path().join("parent");
    let repo = parent.join("repo");
    let src = repo.join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(parent.join(".kwscout.toml"), r#"log_level = "error""#).unwrap();
    fs::create_dir(repo.join(".git")).unwrap();

    let json = info_json(&src);

    assert_eq!(json["config"]["log_level"], "info");
    assert!(
        json["config"]["config_file"].is_null(),
        "should not find config beyond boundary"
    );
}

#[test]
fn config_in_same_dir_as_git_is_found() {
    let tmp = TempDir::new().unwrap();
    let repo = tmp.path().join("repo");
    let src = repo.join("src");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir(repo.join(".git")).unwrap();
    fs::write(repo.join(".kwscout.toml"), r#"log_level = "debug""#).unwrap();

    let json = info_json(&src);

    assert_eq!(json["config"]["log_level"], "debug");
}
