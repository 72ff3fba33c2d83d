//! Retrieval-augmented chat over a single index.

use futures::StreamExt;
use std::sync::Arc;

use crate::core::config::Config;
use crate::core::error::{CvragError, Result};
use crate::core::providers::{ChatModel, VectorIndex};
use crate::core::retrieval::{ContextBuilder, Retriever};
use crate::core::types::{ChatRequest, Message};

/// Multi-turn chat that grounds each turn in retrieved chunks
pub struct ChatSession {
    config: Arc<Config>,
    index: Arc<dyn VectorIndex>,
    llm: Arc<dyn ChatModel>,
    retriever: Retriever,
    context: ContextBuilder,
    history: Vec<Message>,
}

impl ChatSession {
    pub fn new(config: Arc<Config>, index: Arc<dyn VectorIndex>, llm: Arc<dyn ChatModel>) -> Self {
        Self {
            retriever: Retriever::new(&config.retrieval),
            context: ContextBuilder::new(&config.retrieval),
            config,
            index,
            llm,
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Forget all previous turns
    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Run one turn, passing each streamed delta to `on_delta`.
    ///
    /// Returns the full reply. On failure the history is left as it
    /// was before the call.
    pub async fn chat<F>(&mut self, user_message: &str, mut on_delta: F) -> Result<String>
    where
        F: FnMut(&str),
    {
        let user_message = user_message.trim();
        if user_message.is_empty() {
            return Err(CvragError::InvalidQuery("message is empty".to_string()));
        }

        let hits = self
            .retriever
            .search_similar(
                self.index.as_ref(),
                &self.config.index.namespace,
                user_message,
                self.config.retrieval.top_k,
            )
            .await?;
        let context = self.context.build(&hits);

        self.history.push(Message::user(format!(
            "{user_message}\n\nContext: {context}"
        )));

        match self.generate(&mut on_delta).await {
            Ok(reply) => {
                self.history.push(Message::assistant(reply.clone()));
                Ok(reply)
            }
            Err(e) => {
                self.history.pop();
                Err(e)
            }
        }
    }

    async fn generate(&self, on_delta: &mut impl FnMut(&str)) -> Result<String> {
        let llm = &self.config.llm;
        let request = ChatRequest {
            messages: self.history.clone(),
            temperature: llm.temperature,
            max_tokens: llm.max_completion_tokens,
            top_p: llm.top_p,
            stop: llm.stop.clone(),
        };

        let mut stream = self.llm.stream(&request).await?;
        let mut reply = String::new();
        while let Some(delta) = stream.next().await {
            let delta = delta?;
            on_delta(&delta);
            reply.push_str(&delta);
        }

        tracing::debug!("Reply of {} characters", reply.chars().count());
        Ok(reply)
    }
}
