//! Chat completions client for Groq (OpenAI-compatible API).

use async_trait::async_trait;
use futures::{stream, StreamExt};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::core::config::LlmConfig;
use crate::core::error::{CvragError, Result};
use crate::core::providers::sse::{SseDecoder, SseEvent};
use crate::core::providers::{check_status, ChatModel, TokenStream};
use crate::core::types::ChatRequest;

const SERVICE: &str = "groq";

pub struct GroqClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GroqClient {
    pub fn new(api_key: String, config: &LlmConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn body(&self, request: &ChatRequest, stream: bool) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": request.messages,
            "temperature": request.temperature,
            "max_completion_tokens": request.max_tokens,
            "top_p": request.top_p,
            "stream": stream,
        });
        if let Some(stop) = &request.stop {
            body["stop"] = json!(stop);
        }
        body
    }

    async fn send(&self, body: &Value) -> Result<reqwest::Response> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!("Chat completion request to {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        check_status(response, SERVICE).await
    }
}

/// Pull `choices[0].delta.content` out of one streamed chunk
fn delta_content(data: &str) -> Result<Option<String>> {
    let chunk: Value = serde_json::from_str(data)
        .map_err(|e| CvragError::Parse(format!("invalid stream chunk: {e}")))?;

    if let Some(message) = chunk.get("error").and_then(|e| e["message"].as_str()) {
        return Err(CvragError::Api {
            status: 200,
            body: message.to_string(),
        });
    }

    Ok(chunk["choices"][0]["delta"]["content"]
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string))
}

#[async_trait]
impl ChatModel for GroqClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let response = self.send(&self.body(request, false)).await?;

        let resp: Value = response.json().await?;
        let content = resp["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| CvragError::Parse("missing choices[0].message.content".into()))?;

        Ok(content.to_string())
    }

    async fn stream(&self, request: &ChatRequest) -> Result<TokenStream> {
        let response = self.send(&self.body(request, true)).await?;

        struct State {
            bytes: std::pin::Pin<
                Box<dyn futures::Stream<Item = reqwest::Result<bytes::Bytes>> + Send>,
            >,
            decoder: SseDecoder,
            pending: std::collections::VecDeque<SseEvent>,
            finished: bool,
        }

        let state = State {
            bytes: Box::pin(response.bytes_stream()),
            decoder: SseDecoder::new(),
            pending: Default::default(),
            finished: false,
        };

        let deltas = stream::unfold(state, |mut state| async move {
            loop {
                if state.finished {
                    return None;
                }

                match state.pending.pop_front() {
                    Some(SseEvent::Done) => {
                        state.finished = true;
                        return None;
                    }
                    Some(SseEvent::Data(data)) => match delta_content(&data) {
                        Ok(Some(delta)) => return Some((Ok(delta), state)),
                        Ok(None) => continue,
                        Err(e) => {
                            state.finished = true;
                            return Some((Err(e), state));
                        }
                    },
                    None => {}
                }

                match state.bytes.next().await {
                    Some(Ok(chunk)) => state.pending.extend(state.decoder.push(&chunk)),
                    Some(Err(e)) => {
                        state.finished = true;
                        return Some((Err(e.into()), state));
                    }
                    None => match state.decoder.finish() {
                        Some(event) => state.pending.push_back(event),
                        None => {
                            state.finished = true;
                            return None;
                        }
                    },
                }
            }
        });

        Ok(Box::pin(deltas))
    }
}
