use anyhow::Result;
use std::sync::Arc;

use crate::config::ApiMode;
use crate::entities::Embedding;
use crate::external::{ExternalError, LlmClient};
use crate::repository::EmbeddingRepository;

const GUIDE_INSTRUCTIONS: &str = "You are an experienced software engineer.";
const ASSISTANT_INSTRUCTIONS: &str = "You are a helpful assistant.";

/// Ask the model a question, then embed the question and persist it.
pub struct QueryUsecase {
    llm: Arc<dyn LlmClient>,
    repo: Arc<dyn EmbeddingRepository>,
    api_mode: ApiMode,
}

impl QueryUsecase {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        repo: Arc<dyn EmbeddingRepository>,
        api_mode: ApiMode,
    ) -> Self {
        Self {
            llm,
            repo,
            api_mode,
        }
    }

    /// Technology question with the step-by-step guide persona. The
    /// question's embedding lands in the embeddings table.
    pub async fn ask_guide(&self, question: &str) -> Result<String> {
        tracing::debug!(question, "asking tech guide");
        let prompt = format!(
            "Give a short overview of the technology the user asks about, \
             then step-by-step guidance for learning it.\n\nQuestion: {}",
            question
        );
        let answer = self.dispatch(GUIDE_INSTRUCTIONS, &prompt).await?;

        tracing::debug!("embedding question");
        let embeddings = self.llm.embed(&[question.to_string()]).await?;
        tracing::debug!(rows = embeddings.len(), "storing question embeddings");
        self.repo.insert_embeddings(&embeddings).await?;

        Ok(answer)
    }

    /// Plain question. The question text and its embedding land in the
    /// contents table so it becomes searchable.
    pub async fn ask(&self, question: &str) -> Result<String> {
        let answer = self.dispatch(ASSISTANT_INSTRUCTIONS, question).await?;

        let embeddings = self.llm.embed(&[question.to_string()]).await?;
        let rows: Vec<(String, Embedding)> = embeddings
            .into_iter()
            .map(|embedding| (question.to_string(), embedding))
            .collect();
        let ids = self.repo.insert_contents(&rows).await?;
        tracing::debug!(?ids, "stored question content");

        Ok(answer)
    }

    async fn dispatch(&self, instructions: &str, prompt: &str) -> Result<String, ExternalError> {
        match self.api_mode {
            ApiMode::Responses => self.llm.complete(instructions, prompt).await,
            ApiMode::ChatCompletions => self.llm.chat(instructions, prompt).await,
        }
    }
}
