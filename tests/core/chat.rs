//! Chat session and CV agent tests with scripted model replies

use crate::common::{cv_catalog, load_into, test_config, CvSet};
use cvrag::core::chat::{ChatSession, CvChatAgent, GENERATION_FAILED, NO_CV_FOUND};
use cvrag::core::error::CvragError;
use cvrag::core::providers::{IndexCatalog, MemoryCatalog, ScriptedChatModel};
use cvrag::core::types::Role;
use std::sync::Arc;

#[tokio::test]
async fn test_session_history_grows_per_turn() {
    let cvs = CvSet::standard();
    let catalog = MemoryCatalog::new();
    let config = test_config();
    load_into(&catalog, &config, cvs.path()).await;

    let model = Arc::new(ScriptedChatModel::new([
        "Alice writes Rust firmware.",
        "She speaks French.",
    ]));
    let index = catalog.open_index("cv-index").await.unwrap();
    let mut session = ChatSession::new(Arc::new(config), index, model.clone());

    let mut streamed = Vec::new();
    session
        .chat("Who writes Rust?", |d| streamed.push(d.to_string()))
        .await
        .unwrap();
    session.chat("Which languages does she speak?", |_| {}).await.unwrap();

    assert!(streamed.len() > 1, "reply should arrive in several deltas");
    let history = session.history();
    assert_eq!(history.len(), 4);
    assert_eq!(history[0].role, Role::User);
    assert!(history[0].content.starts_with("Who writes Rust?\n\nContext: "));
    assert!(history[0].content.contains("Rust firmware"));
    assert_eq!(history[3].content, "She speaks French.");

    // The second request carries the whole conversation
    let requests = model.requests().await;
    assert_eq!(requests[1].messages.len(), 3);
}

#[tokio::test]
async fn test_session_clear() {
    let catalog = cv_catalog().await;
    let model = Arc::new(ScriptedChatModel::new(["ok"]));
    let index = catalog.open_index("cv-alice").await.unwrap();
    let mut session = ChatSession::new(Arc::new(test_config()), index, model);

    session.chat("rust", |_| {}).await.unwrap();
    session.clear();
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn test_agent_routes_to_matching_cv() {
    let catalog = cv_catalog().await;
    let model = Arc::new(ScriptedChatModel::new(["cv-bob", "Bob ran growth campaigns."]));
    let mut agent = CvChatAgent::new(&test_config(), catalog, model.clone());

    let reply = agent
        .chat("Who has marketing experience?", |_| {})
        .await
        .unwrap();
    assert_eq!(reply, "Bob ran growth campaigns.");

    let requests = model.requests().await;
    let selector_prompt = &requests[0].messages[0].content;
    assert!(selector_prompt.contains("- Index: cv-alice"));
    assert!(selector_prompt.contains("- Index: cv-bob"));

    let user_turn = &agent.history()[1].content;
    assert!(user_turn.contains("Selected index: cv-bob"));
    assert!(user_turn.contains("Marketing Lead"));
}

#[tokio::test]
async fn test_agent_fallback_for_unknown_selection() {
    let catalog = cv_catalog().await;
    let model = Arc::new(ScriptedChatModel::new(["The best index is cv-bob"]));
    let mut agent = CvChatAgent::new(&test_config(), catalog, model.clone());

    let reply = agent.chat("marketing", |_| {}).await.unwrap();

    assert_eq!(reply, NO_CV_FOUND);
    assert!(agent.history().is_empty());
    assert_eq!(model.requests().await.len(), 1);
}

#[tokio::test]
async fn test_agent_apologizes_when_generation_fails() {
    let catalog = cv_catalog().await;
    let model = Arc::new(ScriptedChatModel::new(["cv-alice"]));
    model
        .push_error(CvragError::Auth {
            service: "groq".to_string(),
        })
        .await;
    let mut agent = CvChatAgent::new(&test_config(), catalog, model);

    let reply = agent.chat("rust", |_| {}).await.unwrap();

    assert_eq!(reply, GENERATION_FAILED);
    assert_eq!(agent.history().last().unwrap().content, GENERATION_FAILED);
}
