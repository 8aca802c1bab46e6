pub mod error;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::entities::{ContentItem, Embedding, SearchHit};
pub use error::StoreError;
pub use memory::MemoryRepository;
pub use postgres::PgVectorStore;

/// Persistence for embeddings and embedded content, with nearest-neighbor
/// lookup.
#[async_trait]
pub trait EmbeddingRepository: Send + Sync {
    /// Insert one row per embedding into the embeddings table.
    async fn insert_embeddings(&self, embeddings: &[Embedding]) -> Result<(), StoreError>;

    /// Insert content + embedding rows into the contents table, returning
    /// the generated ids in insertion order.
    async fn insert_contents(&self, items: &[(String, Embedding)]) -> Result<Vec<i64>, StoreError>;

    /// Fetch a stored content row by id.
    async fn content_by_id(&self, id: i64) -> Result<Option<ContentItem>, StoreError>;

    /// Nearest neighbors of `vector` by cosine distance, closest first.
    async fn similarity_search(
        &self,
        vector: &[f32],
        top_k: i64,
    ) -> Result<Vec<SearchHit>, StoreError>;
}
