//! Conversational front ends over the retrieval pipeline.
//!
//! - [`ChatSession`]: chat grounded in one configured index
//! - [`CvChatAgent`]: picks the best CV index per question first

pub mod agent;
pub mod session;

pub use agent::{
    selection_prompt, CvChatAgent, CvRetriever, CvSelector, LlmResponder, GENERATION_FAILED,
    NO_CV_FOUND, NO_MATCHES,
};
pub use session::ChatSession;
