// Loading pipeline tests against the in-memory index

use crate::common::{assert_valid_stats, load_into, test_config, CvSet, ALICE_CV};
use cvrag::core::error::CvragError;
use cvrag::core::indexer::LoadingPipeline;
use cvrag::core::providers::{IndexCatalog, MemoryCatalog, MemoryIndex};

#[tokio::test]
async fn test_load_standard_set() {
    let cvs = CvSet::standard();
    let catalog = MemoryCatalog::new();

    let stats = load_into(&catalog, &test_config(), cvs.path()).await;

    assert_valid_stats(&stats);
    // notes.json is not matched by the default include patterns
    assert_eq!(stats.documents_loaded, 2);
    assert_eq!(stats.namespace, "cv-namespace");

    let index = catalog.get("cv-index").await.unwrap();
    let records = index.records("cv-namespace").await;
    assert_eq!(records.len(), stats.chunks_upserted);
    assert!(records.iter().any(|r| r.id == "alice_chunk_1" && r.text == ALICE_CV));
    assert!(records.iter().all(|r| r.category == "cv"));
}

#[tokio::test]
async fn test_record_ids_are_one_based_per_document() {
    let cvs = CvSet::with_files(&[("carol.txt", "abcdefghij")]);
    let catalog = MemoryCatalog::new();
    let mut config = test_config();
    config.chunking.chunk_size = 4;
    config.chunking.overlap = 2;

    load_into(&catalog, &config, cvs.path()).await;

    let index = catalog.get("cv-index").await.unwrap();
    let records = index.records("cv-namespace").await;
    let pairs: Vec<(&str, &str)> = records
        .iter()
        .map(|r| (r.id.as_str(), r.text.as_str()))
        .collect();
    assert_eq!(
        pairs,
        [
            ("carol_chunk_1", "abcd"),
            ("carol_chunk_2", "cdef"),
            ("carol_chunk_3", "efgh"),
            ("carol_chunk_4", "ghij"),
            ("carol_chunk_5", "ij"),
        ]
    );
}

#[tokio::test]
async fn test_existing_index_is_reused() {
    let catalog = MemoryCatalog::new();
    catalog.insert(MemoryIndex::new("cv-index")).await;
    let cvs = CvSet::standard();

    load_into(&catalog, &test_config(), cvs.path()).await;

    assert!(catalog.created().await.is_empty());
    assert_eq!(catalog.list_indexes().await.unwrap(), ["cv-index"]);
}

#[tokio::test]
async fn test_reload_is_idempotent() {
    let cvs = CvSet::standard();
    let catalog = MemoryCatalog::new();
    let config = test_config();

    let first = load_into(&catalog, &config, cvs.path()).await;
    let second = load_into(&catalog, &config, cvs.path()).await;

    assert_eq!(first.chunks_upserted, second.chunks_upserted);
    let index = catalog.get("cv-index").await.unwrap();
    assert_eq!(index.records("cv-namespace").await.len(), first.chunks_upserted);
}

#[tokio::test]
async fn test_binary_files_are_skipped() {
    let mut cvs = CvSet::standard();
    cvs.add_bytes("scan.txt", &[0x89, 0x50, 0x4e, 0x47, 0xff, 0xfe]);
    let catalog = MemoryCatalog::new();

    let stats = load_into(&catalog, &test_config(), cvs.path()).await;

    assert_eq!(stats.documents_loaded, 2);
    assert_eq!(stats.documents_skipped, 1);
}

#[tokio::test]
async fn test_single_file_target() {
    let cvs = CvSet::standard();
    let catalog = MemoryCatalog::new();

    let stats = load_into(&catalog, &test_config(), &cvs.files[0]).await;

    assert_eq!(stats.documents_loaded, 1);
    let index = catalog.get("cv-index").await.unwrap();
    assert!(index
        .records("cv-namespace")
        .await
        .iter()
        .all(|r| r.id.starts_with("alice_chunk_")));
}

#[tokio::test]
async fn test_configured_index_and_namespace() {
    let cvs = CvSet::standard();
    let catalog = MemoryCatalog::new();
    let mut config = test_config();
    config.index.name = "cv-alice".to_string();
    config.index.namespace = "alice".to_string();
    config.index.category = "resume".to_string();

    let stats = load_into(&catalog, &config, cvs.path()).await;

    assert_eq!(stats.index, "cv-alice");
    let index = catalog.get("cv-alice").await.unwrap();
    let records = index.records("alice").await;
    assert!(!records.is_empty());
    assert!(records.iter().all(|r| r.category == "resume"));
}

#[test]
fn test_invalid_patterns_fail_before_io() {
    let mut config = test_config();
    config.loading.include_patterns = vec!["[".to_string()];

    let err = LoadingPipeline::new(&config).err().unwrap();
    assert!(matches!(err, CvragError::ConfigError(_)));
}
