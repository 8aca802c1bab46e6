use anyhow::Result;
use futures::stream::{self, StreamExt};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

use crate::chunker;
use crate::entities::Embedding;
use crate::external::{ExternalError, LlmClient};
use crate::repository::EmbeddingRepository;

/// Embed documents from a directory into the contents table.
pub struct IngestUsecase {
    llm: Arc<dyn LlmClient>,
    repo: Arc<dyn EmbeddingRepository>,
    batch_size: usize,
    max_concurrent: usize,
}

#[derive(Debug, PartialEq, Eq)]
pub struct IngestReport {
    pub files: usize,
    pub sections: usize,
}

impl IngestUsecase {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        repo: Arc<dyn EmbeddingRepository>,
        batch_size: usize,
        max_concurrent: usize,
    ) -> Self {
        Self {
            llm,
            repo,
            batch_size: batch_size.max(1),
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Walk `dir` for markdown and text files, split each into sections,
    /// embed the sections in concurrent batches, and store them.
    pub async fn ingest_dir(&self, dir: &Path) -> Result<IngestReport> {
        let files = collect_files(dir);
        let mut total_sections = 0;

        for file in &files {
            let content = fs::read_to_string(file)?;
            let markdown = file.extension().and_then(|e| e.to_str()) == Some("md");
            let sections = chunker::split_sections(&content, markdown);
            if sections.is_empty() {
                tracing::debug!(file = %file.display(), "no sections, skipping");
                continue;
            }

            let stored = self.ingest_sections(sections).await?;
            total_sections += stored;
            tracing::info!(file = %file.display(), sections = stored, "ingested");
        }

        Ok(IngestReport {
            files: files.len(),
            sections: total_sections,
        })
    }

    async fn ingest_sections(&self, sections: Vec<String>) -> Result<usize> {
        let batches: Vec<Vec<String>> = sections
            .chunks(self.batch_size)
            .map(|chunk| chunk.to_vec())
            .collect();

        // Batches run concurrently; results are re-ordered by index so
        // content and embedding stay paired.
        let results: Vec<Result<(usize, Vec<String>, Vec<Embedding>), ExternalError>> =
            stream::iter(batches.into_iter().enumerate())
                .map(|(index, batch)| {
                    let llm = Arc::clone(&self.llm);
                    async move {
                        let embeddings = llm.embed(&batch).await?;
                        Ok((index, batch, embeddings))
                    }
                })
                .buffer_unordered(self.max_concurrent)
                .collect()
                .await;

        let mut embedded = Vec::with_capacity(results.len());
        for result in results {
            embedded.push(result?);
        }
        embedded.sort_by_key(|(index, _, _)| *index);

        let mut stored = 0;
        for (_, batch, embeddings) in embedded {
            let rows: Vec<(String, Embedding)> = batch.into_iter().zip(embeddings).collect();
            stored += rows.len();
            self.repo.insert_contents(&rows).await?;
        }
        Ok(stored)
    }
}

fn collect_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_file() {
            let path = entry.path().to_path_buf();
            let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if extension == "md" || extension == "txt" {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ContentItem, SearchHit};
    use crate::external::llm::LlmResult;
    use crate::repository::StoreError;
    use async_trait::async_trait;
    use mockall::mock;

    mock! {
        pub Llm {}

        #[async_trait]
        impl LlmClient for Llm {
            async fn complete(&self, instructions: &str, prompt: &str) -> LlmResult<String>;
            async fn chat(&self, instructions: &str, prompt: &str) -> LlmResult<String>;
            async fn embed(&self, inputs: &[String]) -> LlmResult<Vec<Embedding>>;
            async fn web_search(&self, query: &str) -> LlmResult<String>;
        }
    }

    mock! {
        pub Repo {}

        #[async_trait]
        impl EmbeddingRepository for Repo {
            async fn insert_embeddings(&self, embeddings: &[Embedding]) -> Result<(), StoreError>;
            async fn insert_contents(
                &self,
                items: &[(String, Embedding)],
            ) -> Result<Vec<i64>, StoreError>;
            async fn content_by_id(&self, id: i64) -> Result<Option<ContentItem>, StoreError>;
            async fn similarity_search(
                &self,
                vector: &[f32],
                top_k: i64,
            ) -> Result<Vec<SearchHit>, StoreError>;
        }
    }

    fn echo_embeddings(inputs: &[String]) -> LlmResult<Vec<Embedding>> {
        Ok(inputs
            .iter()
            .enumerate()
            .map(|(index, _)| Embedding::new(vec![index as f32], index as u32))
            .collect())
    }

    #[tokio::test]
    async fn test_ingest_dir_stores_sections() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(
            temp.path().join("doc.md"),
            "# One\nfirst section\n\n# Two\nsecond section\n",
        )
        .unwrap();
        fs::write(temp.path().join("notes.txt"), "plain paragraph\n").unwrap();
        fs::write(temp.path().join("ignored.rs"), "fn main() {}\n").unwrap();

        let mut llm = MockLlm::new();
        llm.expect_embed().returning(|inputs| echo_embeddings(inputs));

        let mut repo = MockRepo::new();
        repo.expect_insert_contents()
            .returning(|items| Ok((0..items.len() as i64).collect()));

        let usecase = IngestUsecase::new(Arc::new(llm), Arc::new(repo), 8, 2);
        let report = usecase.ingest_dir(temp.path()).await.unwrap();

        assert_eq!(report.files, 2, "rs file should be skipped");
        assert_eq!(report.sections, 3);
    }

    #[tokio::test]
    async fn test_sections_pair_with_embeddings_across_batches() {
        let sections: Vec<String> = (0..5).map(|i| format!("section {}", i)).collect();

        let mut llm = MockLlm::new();
        llm.expect_embed().returning(|inputs| echo_embeddings(inputs));

        let mut repo = MockRepo::new();
        repo.expect_insert_contents()
            .withf(|items| {
                // Each row's content must still match the batch-local order.
                items
                    .iter()
                    .enumerate()
                    .all(|(i, (_, embedding))| embedding.index == i as u32)
            })
            .returning(|items| Ok((0..items.len() as i64).collect()));

        // batch_size 2 -> batches of 2, 2, 1 embedded concurrently
        let usecase = IngestUsecase::new(Arc::new(llm), Arc::new(repo), 2, 4);
        let stored = usecase.ingest_sections(sections).await.unwrap();
        assert_eq!(stored, 5);
    }

    #[tokio::test]
    async fn test_embed_failure_propagates() {
        let mut llm = MockLlm::new();
        llm.expect_embed()
            .returning(|_| Err(ExternalError::Api("down".to_string())));

        let repo = MockRepo::new();
        let usecase = IngestUsecase::new(Arc::new(llm), Arc::new(repo), 2, 2);
        assert!(usecase
            .ingest_sections(vec!["a".to_string()])
            .await
            .is_err());
    }
}
