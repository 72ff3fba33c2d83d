//! CLI command implementations
//!
//! Each command module handles argument parsing and execution for a
//! specific CLI command.

pub mod agent;
pub mod chat;
pub mod chunk;
pub mod completions;
pub mod config;
pub mod load;
pub mod search;

// Re-export argument types for use in mod.rs
pub use agent::AgentArgs;
pub use chat::ChatArgs;
pub use chunk::ChunkArgs;
pub use completions::CompletionsArgs;
pub use config::ConfigArgs;
pub use load::LoadArgs;
pub use search::SearchArgs;
