use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::Mutex;

use crate::config::OpenAiConfig;
use crate::entities::Embedding;
use crate::external::error::ExternalError;
use crate::external::llm::{ChatMessage, LlmClient, LlmResult};

/// Client for the hosted OpenAI API (or any OpenAI-compatible server via
/// `OPENAI_BASE_URL`).
pub struct OpenAiClient {
    http: reqwest::Client,
    config: OpenAiConfig,
    // Conversation state: chat completions carry history client-side, the
    // Responses API threads context through the previous response id.
    history: Mutex<Vec<ChatMessage>>,
    previous_response_id: Mutex<Option<String>>,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self, ExternalError> {
        if config.api_key.is_empty() {
            return Err(ExternalError::Config(
                "`OPENAI_API_KEY` must be provided".to_string(),
            ));
        }
        if config.model.is_empty() {
            return Err(ExternalError::Config(
                "`OPENAI_MODEL` must be provided".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            http,
            config,
            history: Mutex::new(Vec::new()),
            previous_response_id: Mutex::new(None),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Hosted endpoints take instructions under the `developer` role; local
    /// OpenAI-compatible servers only know `system`.
    fn instruction_role(&self) -> &'static str {
        if self.config.is_hosted() {
            "developer"
        } else {
            "system"
        }
    }

    async fn post_json<T: Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<serde_json::Value, ExternalError> {
        let response = self
            .http
            .post(self.endpoint(path))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ExternalError::Api(format!("HTTP {}: {}", status, body)));
        }

        Ok(response.json().await?)
    }
}

#[derive(Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    instructions: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    previous_response_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<serde_json::Value>>,
}

#[derive(Deserialize)]
struct ResponsesResponse {
    id: String,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Deserialize)]
struct OutputItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Deserialize)]
struct OutputContent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

/// Collect the output text of a Responses API reply.
fn extract_output_text(response: &ResponsesResponse) -> Result<String, ExternalError> {
    let mut text = String::new();
    for item in &response.output {
        if item.kind != "message" {
            continue;
        }
        for content in &item.content {
            if content.kind == "output_text" {
                text.push_str(&content.text);
            }
        }
    }
    if text.is_empty() {
        return Err(ExternalError::Api(
            "response contained no output text".to_string(),
        ));
    }
    Ok(text)
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, instructions: &str, prompt: &str) -> LlmResult<String> {
        let previous = self.previous_response_id.lock().await.clone();
        tracing::debug!(model = %self.config.model, "calling responses API");

        let request = ResponsesRequest {
            model: &self.config.model,
            input: prompt,
            instructions: Some(instructions),
            previous_response_id: previous,
            tools: None,
        };

        let value = self.post_json("v1/responses", &request).await?;
        let response: ResponsesResponse =
            serde_json::from_value(value).map_err(|e| ExternalError::Api(e.to_string()))?;

        *self.previous_response_id.lock().await = Some(response.id.clone());
        extract_output_text(&response)
    }

    async fn chat(&self, instructions: &str, prompt: &str) -> LlmResult<String> {
        #[derive(Serialize)]
        struct ChatRequest<'a> {
            model: &'a str,
            messages: &'a [ChatMessage],
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<ChatChoice>,
        }

        #[derive(Deserialize)]
        struct ChatChoice {
            message: ChatMessage,
        }

        let mut history = self.history.lock().await;
        if history.is_empty() {
            history.push(ChatMessage::new(self.instruction_role(), instructions));
        }
        history.push(ChatMessage::user(prompt));

        tracing::debug!(model = %self.config.model, turns = history.len(), "calling chat completions API");

        let request = ChatRequest {
            model: &self.config.model,
            messages: history.as_slice(),
        };

        let value = self.post_json("v1/chat/completions", &request).await?;
        let response: ChatResponse =
            serde_json::from_value(value).map_err(|e| ExternalError::Api(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ExternalError::Api("no choices in chat response".to_string()))?;

        history.push(ChatMessage::assistant(content.clone()));
        Ok(content)
    }

    async fn embed(&self, inputs: &[String]) -> LlmResult<Vec<Embedding>> {
        #[derive(Serialize)]
        struct EmbedRequest<'a> {
            model: &'a str,
            input: &'a [String],
            encoding_format: &'a str,
        }

        #[derive(Deserialize)]
        struct EmbedResponse {
            data: Vec<EmbedData>,
        }

        #[derive(Deserialize)]
        struct EmbedData {
            embedding: Vec<f32>,
            index: u32,
        }

        tracing::debug!(
            model = %self.config.embedding_model,
            inputs = inputs.len(),
            "calling embeddings API"
        );

        let request = EmbedRequest {
            model: &self.config.embedding_model,
            input: inputs,
            encoding_format: "float",
        };

        let value = self.post_json("v1/embeddings", &request).await?;
        let response: EmbedResponse =
            serde_json::from_value(value).map_err(|e| ExternalError::Api(e.to_string()))?;

        Ok(response
            .data
            .into_iter()
            .map(|d| Embedding::new(d.embedding, d.index))
            .collect())
    }

    async fn web_search(&self, query: &str) -> LlmResult<String> {
        tracing::debug!(model = %self.config.model, "calling responses API with web search tool");

        let request = ResponsesRequest {
            model: &self.config.model,
            input: query,
            instructions: None,
            previous_response_id: None,
            tools: Some(vec![serde_json::json!({"type": "web_search"})]),
        };

        let value = self.post_json("v1/responses", &request).await?;
        let response: ResponsesResponse =
            serde_json::from_value(value).map_err(|e| ExternalError::Api(e.to_string()))?;
        extract_output_text(&response)
    }
}
