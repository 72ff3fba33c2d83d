// Test helper functions

use cvrag::core::config::Config;
use cvrag::core::indexer::LoadingPipeline;
use cvrag::core::providers::{MemoryCatalog, MemoryIndex, ScriptedChatModel};
use cvrag::core::services::Services;
use cvrag::core::types::LoadStats;
use std::path::Path;
use std::sync::Arc;

use super::fixtures::{ALICE_CV, BOB_CV};

/// Default configuration without waits
#[allow(dead_code)] // Used in integration tests
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.loading.settle_secs = 0;
    config.retrieval.search_delay_ms = 0;
    config
}

/// Services backed by in-memory providers
#[allow(dead_code)] // Used in integration tests
pub fn create_test_services(
    catalog: Arc<MemoryCatalog>,
    model: Arc<ScriptedChatModel>,
) -> Arc<Services> {
    Arc::new(Services::with_providers(test_config(), catalog, model))
}

/// Catalog with one index per CV, each in the default namespace
#[allow(dead_code)] // Used in integration tests
pub async fn cv_catalog() -> Arc<MemoryCatalog> {
    let catalog = MemoryCatalog::new();
    for (name, id, text) in [
        ("cv-alice", "alice_chunk_1", ALICE_CV),
        ("cv-bob", "bob_chunk_1", BOB_CV),
    ] {
        catalog
            .insert(MemoryIndex::with_records(name, "cv-namespace", &[(id, text)]).await)
            .await;
    }
    Arc::new(catalog)
}

/// Load `path` into `catalog` with the given config
#[allow(dead_code)] // Used in integration tests
pub async fn load_into(catalog: &MemoryCatalog, config: &Config, path: &Path) -> LoadStats {
    LoadingPipeline::new(config)
        .expect("Pipeline creation should succeed")
        .load(catalog, path)
        .await
        .expect("Loading should succeed")
}

/// Assert that load stats are consistent
#[allow(dead_code)] // Used in integration tests
pub fn assert_valid_stats(stats: &LoadStats) {
    assert!(
        stats.documents_loaded > 0,
        "Expected documents_loaded > 0, got {}",
        stats.documents_loaded
    );
    assert!(
        stats.chunks_upserted >= stats.documents_loaded,
        "Expected chunks_upserted ({}) >= documents_loaded ({})",
        stats.chunks_upserted,
        stats.documents_loaded
    );
}
