//! CV agent: routes each question to the most relevant CV index.
//!
//! Every CV lives in its own index. A turn runs three tools in
//! order: the [`CvSelector`] asks the model which index fits the
//! question, the [`CvRetriever`] pulls context from it, and the
//! [`LlmResponder`] streams the grounded answer.

use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::providers::{ChatModel, IndexCatalog};
use crate::core::retrieval::{ContextBuilder, Retriever};
use crate::core::types::{ChatRequest, Message, SearchHit};

/// Shown to the user when no index matches the question
pub const NO_CV_FOUND: &str = "No relevant CV found for your query.";

/// Returned in place of an answer when generation fails
pub const GENERATION_FAILED: &str = "An error occurred while generating the response.";

/// Stands in for an index with no matching chunks
pub const NO_MATCHES: &str = "(no relevant matches)";

const SELECTOR_MAX_TOKENS: u32 = 50;
const SNIPPETS_PER_INDEX: usize = 3;

const GROUNDING_PROMPT: &str = "You are an assistant that answers questions based EXCLUSIVELY \
     on the provided context. If the context does not contain the answer, acknowledge the \
     limitation and suggest rephrasing the question.";

/// Picks the index whose content best matches a question
pub struct CvSelector {
    catalog: Arc<dyn IndexCatalog>,
    llm: Arc<dyn ChatModel>,
    retriever: Retriever,
    namespace: String,
    top_k: usize,
    delay: Duration,
}

impl CvSelector {
    pub fn new(config: &Config, catalog: Arc<dyn IndexCatalog>, llm: Arc<dyn ChatModel>) -> Self {
        Self {
            catalog,
            llm,
            retriever: Retriever::new(&config.retrieval),
            namespace: config.index.namespace.clone(),
            top_k: config.retrieval.selector_top_k,
            delay: Duration::from_millis(config.retrieval.search_delay_ms),
        }
    }

    /// Name of the chosen index, or `None` if nothing fits.
    ///
    /// Indexes that cannot be opened or searched are left out of the
    /// candidate list. A model failure yields `None`.
    pub async fn select(&self, query: &str) -> Result<Option<String>> {
        let indexes = self.catalog.list_indexes().await?;
        if indexes.is_empty() {
            tracing::warn!("No indexes available");
            return Ok(None);
        }

        let mut candidates: Vec<(String, Vec<String>)> = Vec::with_capacity(indexes.len());
        for (i, name) in indexes.into_iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            tracing::info!("Searching index {}", name);
            match self.sample(&name, query).await {
                Ok(texts) => candidates.push((name, texts)),
                Err(e) => tracing::error!("Skipping index {}: {}", name, e),
            }
        }

        if candidates.is_empty() {
            return Ok(None);
        }

        let request = ChatRequest {
            messages: vec![
                Message::system(selection_prompt(&candidates)),
                Message::user(query),
            ],
            temperature: 0.0,
            max_tokens: SELECTOR_MAX_TOKENS,
            top_p: 1.0,
            stop: None,
        };

        let answer = match self.llm.complete(&request).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!("Index selection failed: {}", e);
                return Ok(None);
            }
        };

        let answer = answer.trim();
        if candidates.iter().any(|(name, _)| name == answer) {
            tracing::info!("Selected index {}", answer);
            Ok(Some(answer.to_string()))
        } else {
            tracing::warn!("Model answered with unknown index {:?}", answer);
            Ok(None)
        }
    }

    async fn sample(&self, name: &str, query: &str) -> Result<Vec<String>> {
        let index = self.catalog.open_index(name).await?;
        let hits = self
            .retriever
            .search_similar(index.as_ref(), &self.namespace, query, self.top_k)
            .await?;

        let texts: Vec<String> = hits
            .into_iter()
            .map(|hit| hit.text)
            .filter(|text| !text.is_empty())
            .collect();

        if texts.is_empty() {
            Ok(vec![NO_MATCHES.to_string()])
        } else {
            Ok(texts)
        }
    }
}

/// System prompt listing each candidate index with a few snippets
pub fn selection_prompt(candidates: &[(String, Vec<String>)]) -> String {
    let mut prompt = String::from("You have these indexes with their most relevant content:\n");
    for (name, texts) in candidates {
        let snippets: Vec<&str> = texts
            .iter()
            .take(SNIPPETS_PER_INDEX)
            .map(String::as_str)
            .collect();
        prompt.push_str(&format!(
            "- Index: {name}\n  Content: {}\n",
            snippets.join(" | ")
        ));
    }
    prompt.push_str(
        "\nInstruction: Given the user's query, answer ONLY with the EXACT NAME \
         of the most relevant index. Do not include any additional text.",
    );
    prompt
}

/// Fetches context from a chosen index
pub struct CvRetriever {
    catalog: Arc<dyn IndexCatalog>,
    retriever: Retriever,
    namespace: String,
    top_k: usize,
}

impl CvRetriever {
    pub fn new(config: &Config, catalog: Arc<dyn IndexCatalog>) -> Self {
        Self {
            catalog,
            retriever: Retriever::new(&config.retrieval),
            namespace: config.index.namespace.clone(),
            top_k: config.retrieval.top_k,
        }
    }

    /// Hits for `query` from `index_name`.
    ///
    /// Failures are logged and yield no hits, so the answer falls back
    /// to the no-context placeholder.
    pub async fn retrieve(&self, index_name: &str, query: &str) -> Vec<SearchHit> {
        match self.search(index_name, query).await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::error!("Retrieval from {} failed: {}", index_name, e);
                Vec::new()
            }
        }
    }

    async fn search(&self, index_name: &str, query: &str) -> Result<Vec<SearchHit>> {
        let index = self.catalog.open_index(index_name).await?;
        self.retriever
            .search_similar(index.as_ref(), &self.namespace, query, self.top_k)
            .await
    }
}

/// Streams the final answer
pub struct LlmResponder {
    llm: Arc<dyn ChatModel>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
}

impl LlmResponder {
    pub fn new(config: &Config, llm: Arc<dyn ChatModel>) -> Self {
        Self {
            llm,
            temperature: config.llm.agent_temperature,
            max_tokens: config.llm.max_completion_tokens,
            top_p: config.llm.top_p,
        }
    }

    /// Stream a reply to `messages`.
    ///
    /// Never fails: a generation error is logged and replaced by
    /// [`GENERATION_FAILED`]. If the stream breaks after some text went
    /// out, the apology is passed to `on_delta` on a new line.
    pub async fn respond<F>(&self, messages: &[Message], mut on_delta: F) -> String
    where
        F: FnMut(&str),
    {
        let request = ChatRequest {
            messages: messages.to_vec(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            top_p: self.top_p,
            stop: None,
        };

        let mut stream = match self.llm.stream(&request).await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::error!("Response generation failed: {}", e);
                return GENERATION_FAILED.to_string();
            }
        };

        let mut reply = String::new();
        while let Some(delta) = stream.next().await {
            match delta {
                Ok(delta) => {
                    on_delta(&delta);
                    reply.push_str(&delta);
                }
                Err(e) => {
                    tracing::error!("Response stream failed: {}", e);
                    if !reply.is_empty() {
                        on_delta(&format!("\n{GENERATION_FAILED}"));
                    }
                    return GENERATION_FAILED.to_string();
                }
            }
        }
        reply
    }
}

/// Agent combining selection, retrieval and response
pub struct CvChatAgent {
    selector: CvSelector,
    retriever: CvRetriever,
    responder: LlmResponder,
    context: ContextBuilder,
    history: Vec<Message>,
}

impl CvChatAgent {
    pub fn new(config: &Config, catalog: Arc<dyn IndexCatalog>, llm: Arc<dyn ChatModel>) -> Self {
        Self {
            selector: CvSelector::new(config, Arc::clone(&catalog), Arc::clone(&llm)),
            retriever: CvRetriever::new(config, catalog),
            responder: LlmResponder::new(config, llm),
            context: ContextBuilder::new(&config.retrieval),
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Answer one question, streaming the reply through `on_delta`
    pub async fn chat<F>(&mut self, user_message: &str, on_delta: F) -> Result<String>
    where
        F: FnMut(&str),
    {
        let Some(index_name) = self.selector.select(user_message).await? else {
            tracing::warn!("Could not identify a CV for the query");
            return Ok(NO_CV_FOUND.to_string());
        };

        let hits = self.retriever.retrieve(&index_name, user_message).await;
        let context = self.context.build(&hits);

        if self.history.is_empty() {
            self.history.push(Message::system(GROUNDING_PROMPT));
        }
        self.history.push(Message::user(format!(
            "Query: {user_message}\n\n\
             Selected index: {index_name}\n\
             Context (snippets):\n- {context}\n\n\
             Answer concisely and helpfully."
        )));

        let reply = self.responder.respond(&self.history, on_delta).await;
        self.history.push(Message::assistant(reply.clone()));
        Ok(reply)
    }
}
