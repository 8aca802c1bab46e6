use async_trait::async_trait;
use ollama_rs::{
    generation::{completion::request::GenerationRequest, options::GenerationOptions},
    Ollama,
};
use url::Url;

use crate::config::OllamaConfig;
use crate::entities::Embedding;
use crate::external::error::ExternalError;
use crate::external::llm::{LlmClient, LlmResult};

/// Local LLM backend over Ollama. Completions and embeddings only; web
/// search needs the hosted backend. Chat keeps no history here, the
/// instructions are prepended on every call.
pub struct OllamaClient {
    client: Ollama,
    config: OllamaConfig,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Result<Self, ExternalError> {
        let url = config
            .get_url()
            .map_err(|e| ExternalError::Config(e.to_string()))?;
        let url =
            Url::parse(&url).map_err(|e| ExternalError::Config(format!("Invalid URL: {}", e)))?;

        let client = Ollama::new(
            url.host_str().unwrap_or("localhost").to_string(),
            config.port,
        );

        Ok(Self { client, config })
    }

    async fn generate(&self, prompt: String) -> LlmResult<String> {
        let mut request = GenerationRequest::new(self.config.model.clone(), prompt);

        let options = GenerationOptions::default()
            .temperature(self.config.temperature)
            .top_p(self.config.top_p);
        request.options = Some(options);

        tracing::debug!(model = %self.config.model, "calling ollama generate");

        let response = self
            .client
            .generate(request)
            .await
            .map_err(|e| ExternalError::Api(e.to_string()))?;

        Ok(response.response)
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn complete(&self, instructions: &str, prompt: &str) -> LlmResult<String> {
        self.generate(format!("{}\n\n{}", instructions, prompt)).await
    }

    async fn chat(&self, instructions: &str, prompt: &str) -> LlmResult<String> {
        self.complete(instructions, prompt).await
    }

    async fn embed(&self, inputs: &[String]) -> LlmResult<Vec<Embedding>> {
        let mut embeddings = Vec::with_capacity(inputs.len());
        for (index, input) in inputs.iter().enumerate() {
            tracing::debug!(model = %self.config.embedding_model, "calling ollama embeddings");
            let response = self
                .client
                .generate_embeddings(
                    self.config.embedding_model.clone(),
                    input.clone(),
                    Some(GenerationOptions::default()),
                )
                .await
                .map_err(|e| ExternalError::Api(e.to_string()))?;

            // Convert from Vec<f64> to Vec<f32>
            let vector = response.embeddings.into_iter().map(|x| x as f32).collect();
            embeddings.push(Embedding::new(vector, index as u32));
        }
        Ok(embeddings)
    }

    async fn web_search(&self, _query: &str) -> LlmResult<String> {
        Err(ExternalError::Unsupported(
            "web search requires the hosted backend",
        ))
    }
}
