use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::external::error::ExternalError;
use crate::external::llm::LlmClient;

const TAVILY_URL: &str = "https://api.tavily.com/search";

/// Standalone web-search backend.
#[async_trait]
pub trait WebSearchClient: Send + Sync {
    async fn search(&self, query: &str) -> Result<String, ExternalError>;
}

#[derive(Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Deserialize)]
struct TavilyResult {
    content: String,
}

/// Tavily search API client. Returns the content of the top result.
pub struct TavilyClient {
    http: reqwest::Client,
    api_key: String,
}

impl TavilyClient {
    pub fn new(api_key: String) -> Result<Self, ExternalError> {
        if api_key.is_empty() {
            return Err(ExternalError::Config(
                "`TAVILY_API_KEY` must be provided".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { http, api_key })
    }

    fn top_result(response: TavilyResponse) -> String {
        response
            .results
            .into_iter()
            .next()
            .map(|r| r.content)
            .unwrap_or_else(|| "No results found.".to_string())
    }
}

#[async_trait]
impl WebSearchClient for TavilyClient {
    async fn search(&self, query: &str) -> Result<String, ExternalError> {
        tracing::debug!("calling tavily search");

        let response = self
            .http
            .post(TAVILY_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&serde_json::json!({ "query": query, "max_results": 5 }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ExternalError::Api(format!("HTTP {}: {}", status, body)));
        }

        let parsed: TavilyResponse = response.json().await?;
        Ok(Self::top_result(parsed))
    }
}

/// Adapter routing web searches through the LLM client's own search
/// operation.
pub struct LlmWebSearch {
    llm: Arc<dyn LlmClient>,
}

impl LlmWebSearch {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl WebSearchClient for LlmWebSearch {
    async fn search(&self, query: &str) -> Result<String, ExternalError> {
        self.llm.web_search(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::dummy::DummyLlmClient;

    #[test]
    fn test_missing_api_key_rejected() {
        assert!(matches!(
            TavilyClient::new(String::new()),
            Err(ExternalError::Config(_))
        ));
    }

    #[test]
    fn test_top_result_parsing() {
        let raw = r#"{"results": [
            {"content": "first hit", "url": "https://a.example"},
            {"content": "second hit", "url": "https://b.example"}
        ]}"#;
        let parsed: TavilyResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(TavilyClient::top_result(parsed), "first hit");
    }

    #[test]
    fn test_empty_results() {
        let parsed: TavilyResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert_eq!(TavilyClient::top_result(parsed), "No results found.");
    }

    #[tokio::test]
    async fn test_llm_adapter_delegates() {
        let adapter = LlmWebSearch::new(Arc::new(DummyLlmClient::new()));
        let result = adapter.search("news").await.unwrap();
        assert_eq!(result, "dummy web search response");
    }
}
