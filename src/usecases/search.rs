use anyhow::Result;
use std::sync::Arc;

use crate::entities::SearchHit;
use crate::repository::{EmbeddingRepository, StoreError};

/// Similarity search seeded from a stored content row.
pub struct SearchUsecase {
    repo: Arc<dyn EmbeddingRepository>,
}

impl SearchUsecase {
    pub fn new(repo: Arc<dyn EmbeddingRepository>) -> Self {
        Self { repo }
    }

    /// Look up the stored item by id and return its nearest neighbors. The
    /// id must exist; a missing id is an error, not an empty result.
    pub async fn similar(&self, content_id: i64, top_k: i64) -> Result<Vec<SearchHit>> {
        let item = self
            .repo
            .content_by_id(content_id)
            .await?
            .ok_or(StoreError::NotFound(content_id))?;

        tracing::debug!(content_id, top_k, "running similarity search");
        Ok(self.repo.similarity_search(&item.embedding, top_k).await?)
    }
}
