//! Retrieval tests: search validation and context assembly

use crate::common::{load_into, test_config, CvSet};
use cvrag::core::config::RetrievalConfig;
use cvrag::core::providers::{IndexCatalog, MemoryCatalog};
use cvrag::core::retrieval::{format_hit, ContextBuilder, Retriever, NO_CONTEXT};

#[tokio::test]
async fn test_search_after_load() {
    let cvs = CvSet::standard();
    let catalog = MemoryCatalog::new();
    let config = test_config();
    load_into(&catalog, &config, cvs.path()).await;

    let index = catalog.open_index("cv-index").await.unwrap();
    let retriever = Retriever::new(&config.retrieval);

    let hits = retriever
        .search_similar(index.as_ref(), "cv-namespace", "rust firmware", 3)
        .await
        .unwrap();

    assert_eq!(hits[0].id, "alice_chunk_1");
    assert!(hits[0].score > 0.0);
    assert_eq!(hits[0].category, "cv");
}

#[tokio::test]
async fn test_search_rejects_blank_query() {
    let catalog = MemoryCatalog::new();
    let index = catalog
        .ensure_index(&test_config().index.spec())
        .await
        .unwrap();
    let retriever = Retriever::new(&RetrievalConfig::default());

    let err = retriever
        .search_similar(index.as_ref(), "cv-namespace", " \n\t ", 3)
        .await
        .unwrap_err();
    assert!(err.is_bad_request());
}

#[tokio::test]
async fn test_search_unknown_namespace_is_empty() {
    let cvs = CvSet::standard();
    let catalog = MemoryCatalog::new();
    load_into(&catalog, &test_config(), cvs.path()).await;
    let index = catalog.open_index("cv-index").await.unwrap();

    let hits = Retriever::new(&RetrievalConfig::default())
        .search_similar(index.as_ref(), "other", "rust", 3)
        .await
        .unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn test_context_from_hits() {
    let cvs = CvSet::with_files(&[
        ("a.txt", "Rust developer"),
        ("b.txt", "Rust and Go developer"),
    ]);
    let catalog = MemoryCatalog::new();
    let config = test_config();
    load_into(&catalog, &config, cvs.path()).await;
    let index = catalog.open_index("cv-index").await.unwrap();

    let hits = Retriever::new(&config.retrieval)
        .search_similar(index.as_ref(), "cv-namespace", "rust developer", 3)
        .await
        .unwrap();
    let context = ContextBuilder::new(&config.retrieval).build(&hits);

    assert_eq!(context, "Rust developer\n- Rust and Go developer");
    assert_eq!(ContextBuilder::new(&config.retrieval).build(&[]), NO_CONTEXT);

    let line = format_hit(&hits[0]);
    assert!(line.contains("score: 1.00"));
}
