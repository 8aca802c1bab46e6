use async_trait::async_trait;

use crate::entities::Embedding;
use crate::external::llm::{LlmClient, LlmResult};

/// Canned-response client for the test environment.
#[derive(Debug, Default)]
pub struct DummyLlmClient {}

impl DummyLlmClient {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl LlmClient for DummyLlmClient {
    async fn complete(&self, _instructions: &str, _prompt: &str) -> LlmResult<String> {
        Ok("dummy response".to_string())
    }

    async fn chat(&self, _instructions: &str, _prompt: &str) -> LlmResult<String> {
        Ok("dummy response".to_string())
    }

    async fn embed(&self, inputs: &[String]) -> LlmResult<Vec<Embedding>> {
        Ok(inputs
            .iter()
            .enumerate()
            .map(|(index, _)| Embedding::new(vec![0.1, 0.2, 0.3, 0.4, 0.5], index as u32))
            .collect())
    }

    async fn web_search(&self, _query: &str) -> LlmResult<String> {
        Ok("dummy web search response".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_one_embedding_per_input() {
        let client = DummyLlmClient::new();
        let embeddings = client
            .embed(&["a".to_string(), "b".to_string()])
            .await
            .unwrap();
        assert_eq!(embeddings.len(), 2);
        assert_eq!(embeddings[0].vector, vec![0.1, 0.2, 0.3, 0.4, 0.5]);
        assert_eq!(embeddings[1].index, 1);
    }
}
