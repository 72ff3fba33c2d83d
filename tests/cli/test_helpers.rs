//! CLI test helpers
//!
//! Provides utilities for testing CLI commands including:
//! - Services backed by the in-memory catalog and a scripted model
//! - Services with CVs already loaded
//! - Services with no clients configured

use crate::common::{create_test_services, load_into, test_config, CvSet};
use cvrag::core::config::{Config, Credentials};
use cvrag::core::providers::{MemoryCatalog, ScriptedChatModel};
use cvrag::core::services::Services;
use std::sync::Arc;

/// In-memory services plus handles for inspecting them
pub struct TestServices {
    pub services: Arc<Services>,
    pub catalog: Arc<MemoryCatalog>,
    pub model: Arc<ScriptedChatModel>,
}

/// Create empty in-memory services that reply with `replies` in order
pub fn create_cli_test_services(replies: &[&str]) -> TestServices {
    let catalog = Arc::new(MemoryCatalog::new());
    let model = Arc::new(ScriptedChatModel::new(replies.iter().copied()));
    let services = create_test_services(catalog.clone(), model.clone());
    TestServices {
        services,
        catalog,
        model,
    }
}

/// Services whose default index already holds the standard CV set
pub async fn loaded_services(replies: &[&str]) -> TestServices {
    let test = create_cli_test_services(replies);
    let cvs = CvSet::standard();
    load_into(&test.catalog, &test_config(), cvs.path()).await;
    test
}

/// Services with neither API key configured
pub fn keyless_services() -> Arc<Services> {
    Arc::new(
        Services::from_config(Config::default(), &Credentials::default())
            .expect("Services without keys should build"),
    )
}
