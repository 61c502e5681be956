//! Tests for config module

#[path = "common/mod.rs"]
mod common;

use chrono::NaiveDate;
use common::*;
use placsp_sync::config::ResolvedConfig;
use placsp_sync::sync::run_sync;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_config_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("placsp.toml");

    let config_content = r#"
start_year = 2019
active_only = false
output_dir = "custom/data"
full_history_file = "historico.ndjson"
active_file = "abiertas.json"
base_url = "https://mirror.example.org/sindicacion_643"
user_agent = "mirror-sync/2.0"
probe_timeout_secs = 5
fetch_timeout_secs = 60
"#;
    fs::write(&config_path, config_content).unwrap();

    let config = ResolvedConfig::from_toml_file(&config_path).unwrap();

    assert_eq!(config.start_year, 2019);
    assert!(!config.active_only);
    assert_eq!(
        config.full_history_path(),
        std::path::PathBuf::from("custom/data/historico.ndjson")
    );
    assert_eq!(
        config.base_url().unwrap().as_str(),
        "https://mirror.example.org/sindicacion_643/"
    );
    assert_eq!(config.user_agent, "mirror-sync/2.0");
    assert_eq!(config.probe_timeout_secs, 5);
    assert_eq!(config.fetch_timeout_secs, 60);
}

#[test]
fn test_config_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let result = ResolvedConfig::from_toml_file(&temp_dir.path().join("missing.toml"));
    assert!(result.is_err());
}

#[test]
fn test_config_invalid_base_url() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("placsp.toml");
    fs::write(&config_path, "base_url = \"not a url\"\n").unwrap();

    assert!(ResolvedConfig::from_toml_file(&config_path).is_err());
}

#[tokio::test]
async fn test_file_names_from_config_are_used_for_outputs() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");
    let config_path = temp_dir.path().join("placsp.toml");
    fs::write(
        &config_path,
        format!(
            "start_year = 2024\noutput_dir = {:?}\nfull_history_file = \"all.ndjson\"\nactive_file = \"open.json\"\nbase_url = \"{BASE_URL}\"\n",
            out_dir.display().to_string()
        ),
    )
    .unwrap();
    let config = ResolvedConfig::from_toml_file(&config_path).unwrap();

    let feed = FakeFeed::new().publish(
        archive_url(2024, 1, 0),
        build_zip(&[(
            "feed.atom",
            &atom_feed(&[atom_entry("Obra", "", "Identificador: 1")], None),
        )]),
    );
    let today = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();

    let report = run_sync(&feed, &config, today).await.unwrap();

    assert_eq!(report.outputs.full_history, 1);
    assert!(out_dir.join("all.ndjson").exists());
    assert!(out_dir.join("open.json").exists());
}
