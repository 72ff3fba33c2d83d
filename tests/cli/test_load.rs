//! Tests for the load CLI command
//!
//! - Loading into the in-memory catalog
//! - Flag overrides for index, namespace and chunking
//! - Validation before any client is needed

use crate::cli::test_helpers::{create_cli_test_services, keyless_services};
use crate::common::CvSet;
use cvrag::cli::commands::load::{execute, load, LoadArgs};
use cvrag::cli::OutputFormat;
use cvrag::core::config::Config;
use std::path::Path;

fn args(path: &Path) -> LoadArgs {
    LoadArgs {
        path: path.to_path_buf(),
        index: None,
        namespace: None,
        category: None,
        size: None,
        overlap: None,
        no_settle: true,
    }
}

/// Test overrides are applied on top of the configuration
#[test]
fn test_apply_overrides() {
    let mut config = Config::default();
    config.loading.settle_secs = 10;

    let mut load_args = args(Path::new("cvs"));
    load_args.index = Some("people".to_string());
    load_args.size = Some(200);
    load_args.overlap = Some(20);

    let applied = load_args.apply(&config);
    assert_eq!(applied.index.name, "people");
    assert_eq!(applied.index.namespace, "cv-namespace");
    assert_eq!(applied.chunking.chunk_size, 200);
    assert_eq!(applied.chunking.overlap, 20);
    assert_eq!(applied.loading.settle_secs, 0);
}

/// Test loading a directory into the default index
#[tokio::test]
async fn test_load_directory() {
    let test = create_cli_test_services(&[]);
    let cvs = CvSet::standard();

    let stats = load(&args(cvs.path()), &test.services).await.unwrap();

    assert_eq!(stats.documents_loaded, 2);
    assert_eq!(stats.index, "cv-index");
    let index = test.catalog.get("cv-index").await.unwrap();
    assert_eq!(
        index.records("cv-namespace").await.len(),
        stats.chunks_upserted
    );
}

/// Test index and namespace flags
#[tokio::test]
async fn test_load_into_named_index() {
    let test = create_cli_test_services(&[]);
    let cvs = CvSet::standard();
    let mut load_args = args(cvs.path());
    load_args.index = Some("cv-alice".to_string());
    load_args.namespace = Some("alice".to_string());

    let stats = load(&load_args, &test.services).await.unwrap();

    assert_eq!(stats.namespace, "alice");
    assert_eq!(test.catalog.created().await, ["cv-alice"]);
}

/// Test invalid chunking fails before the missing key is noticed
#[tokio::test]
async fn test_load_validates_before_client() {
    let services = keyless_services();
    let mut load_args = args(Path::new("cvs"));
    load_args.size = Some(10);
    load_args.overlap = Some(10);

    let err = load(&load_args, &services).await.unwrap_err();
    assert!(err.is_bad_request(), "unexpected error: {err}");
}

/// Test the missing API key is reported
#[tokio::test]
async fn test_load_without_pinecone_key() {
    let services = keyless_services();
    let cvs = CvSet::standard();

    let err = load(&args(cvs.path()), &services).await.unwrap_err();
    assert!(err.to_string().contains("PINECONE_API_KEY"));
}

/// Test both output formats
#[tokio::test]
async fn test_load_execute_formats() {
    let test = create_cli_test_services(&[]);
    let cvs = CvSet::standard();

    for format in [OutputFormat::Human, OutputFormat::Json] {
        let result = execute(args(cvs.path()), &test.services, format).await;
        assert!(result.is_ok(), "load should succeed: {:?}", result.err());
    }
}
