//! Tests for the search CLI command
//!
//! - One-shot queries in both formats
//! - Interactive loop termination and error recovery
//! - Index not found errors

use crate::cli::test_helpers::{create_cli_test_services, loaded_services};
use cvrag::cli::commands::search::{execute, interactive, SearchArgs, Searcher};
use cvrag::cli::OutputFormat;

fn args(query: Option<&str>, limit: Option<usize>) -> SearchArgs {
    SearchArgs {
        query: query.map(str::to_string),
        index: None,
        namespace: None,
        limit,
    }
}

/// Test the best hit comes from the matching CV
#[tokio::test]
async fn test_search_ranks_matching_cv_first() {
    let test = loaded_services(&[]).await;
    let searcher = Searcher::open(&args(None, None), &test.services)
        .await
        .unwrap();

    let output = searcher.search("  rust firmware  ").await.unwrap();

    assert_eq!(output.query, "rust firmware");
    assert_eq!(output.index, "cv-index");
    assert_eq!(output.namespace, "cv-namespace");
    assert_eq!(output.results[0].id, "alice_chunk_1");
    assert_eq!(output.total_results, output.results.len());
}

/// Test the limit flag caps the number of hits
#[tokio::test]
async fn test_search_respects_limit() {
    let test = loaded_services(&[]).await;
    let searcher = Searcher::open(&args(None, Some(1)), &test.services)
        .await
        .unwrap();

    let output = searcher.search("and").await.unwrap();
    assert_eq!(output.total_results, 1);
}

/// Test searching an index that does not exist
#[tokio::test]
async fn test_search_missing_index() {
    let test = create_cli_test_services(&[]);
    let mut search_args = args(Some("rust"), None);
    search_args.index = Some("nope".to_string());

    let err = Searcher::open(&search_args, &test.services)
        .await
        .err()
        .unwrap();
    assert!(err.is_not_found());
}

/// Test one-shot execution in both formats
#[tokio::test]
async fn test_search_execute_formats() {
    let test = loaded_services(&[]).await;

    for format in [OutputFormat::Human, OutputFormat::Json] {
        let result = execute(args(Some("marketing"), None), &test.services, format).await;
        assert!(result.is_ok(), "search should succeed: {:?}", result.err());
    }
}

/// Test the interactive loop stops at the first empty line
#[tokio::test]
async fn test_interactive_stops_at_empty_line() {
    let test = loaded_services(&[]).await;
    let searcher = Searcher::open(&args(None, None), &test.services)
        .await
        .unwrap();

    let input = &b"rust\nmarketing\n\nnever searched\n"[..];
    let queries = interactive(&searcher, input, OutputFormat::Json)
        .await
        .unwrap();
    assert_eq!(queries, 2);
}

/// Test the interactive loop ends at EOF
#[tokio::test]
async fn test_interactive_stops_at_eof() {
    let test = loaded_services(&[]).await;
    let searcher = Searcher::open(&args(None, None), &test.services)
        .await
        .unwrap();

    let queries = interactive(&searcher, &b"french"[..], OutputFormat::Human)
        .await
        .unwrap();
    assert_eq!(queries, 1);
}

/// Test failed queries are reported without ending the loop
#[tokio::test]
async fn test_interactive_continues_after_error() {
    let test = loaded_services(&[]).await;
    let searcher = Searcher::open(&args(None, Some(0)), &test.services)
        .await
        .unwrap();

    let queries = interactive(&searcher, &b"rust\nfrench\n"[..], OutputFormat::Json)
        .await
        .unwrap();
    assert_eq!(queries, 0);
}
