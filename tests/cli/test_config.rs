//! Tests for the show-config CLI command
//!
//! - Config file discovery through environment variables
//! - Secret redaction in both formats

use crate::cli::test_helpers::keyless_services;
use cvrag::cli::commands::config::{build_response, execute, ConfigArgs};
use cvrag::cli::OutputFormat;
use cvrag::core::config::{Config, Credentials};
use serial_test::serial;
use std::env;
use tempfile::TempDir;

/// Test configuration from CVRAG_CONFIG with an env override on top
#[test]
#[serial]
fn test_config_file_and_env_override() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cvrag.toml");
    std::fs::write(
        &path,
        "[chunking]\nchunk_size = 300\noverlap = 30\n\n[index]\nname = \"people\"\n",
    )
    .unwrap();

    env::set_var("CVRAG_CONFIG", &path);
    env::set_var("CVRAG_TOP_K", "5");
    let config = Config::load();
    env::remove_var("CVRAG_CONFIG");
    env::remove_var("CVRAG_TOP_K");

    let config = config.unwrap();
    assert_eq!(config.chunking.chunk_size, 300);
    assert_eq!(config.chunking.overlap, 30);
    assert_eq!(config.index.name, "people");
    assert_eq!(config.index.namespace, "cv-namespace");
    assert_eq!(config.retrieval.top_k, 5);
}

/// Test an invalid config file is rejected
#[test]
#[serial]
fn test_invalid_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cvrag.toml");
    std::fs::write(&path, "[chunking]\nchunk_size = 100\noverlap = 100\n").unwrap();

    env::set_var("CVRAG_CONFIG", &path);
    let result = Config::load();
    env::remove_var("CVRAG_CONFIG");

    assert!(result.is_err());
}

/// Test the reported config file follows CVRAG_CONFIG_DIR
#[test]
#[serial]
fn test_response_config_file_path() {
    let dir = TempDir::new().unwrap();
    env::set_var("CVRAG_CONFIG_DIR", dir.path());
    let response = build_response(&Config::default(), &Credentials::default());
    env::remove_var("CVRAG_CONFIG_DIR");

    assert_eq!(
        response.config_file,
        dir.path().join("config.toml").to_string_lossy()
    );
    assert_eq!(response.credentials.pinecone_api_key, "(not set)");
}

/// Test secrets never appear in the output
#[test]
fn test_response_redacts_keys() {
    let credentials = Credentials {
        pinecone_api_key: Some("pcsk_secretsecretsecret".to_string()),
        groq_api_key: Some("gsk_secretsecretsecret".to_string()),
    };

    let response = build_response(&Config::default(), &credentials);
    let json = serde_json::to_string(&response).unwrap();

    assert!(!json.contains("secretsecretsecret"));
    assert_eq!(response.config.index.name, "cv-index");
}

/// Test both output formats, with and without --all
#[tokio::test]
async fn test_config_execute_formats() {
    let services = keyless_services();

    for (format, all) in [
        (OutputFormat::Human, false),
        (OutputFormat::Human, true),
        (OutputFormat::Json, false),
    ] {
        let result = execute(
            ConfigArgs { all },
            &services,
            &Credentials::default(),
            format,
        )
        .await;
        assert!(result.is_ok(), "show-config should succeed: {:?}", result.err());
    }
}
