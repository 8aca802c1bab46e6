use async_trait::async_trait;
use pgvector::Vector;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::entities::{ContentItem, Embedding, SearchHit};
use crate::repository::{EmbeddingRepository, StoreError};

/// PostgreSQL + pgvector store. The large-embeddings profile writes to the
/// `_large` table pair; everything else shares the same statements.
pub struct PgVectorStore {
    pool: PgPool,
    embeddings_table: &'static str,
    contents_table: &'static str,
}

impl PgVectorStore {
    /// Build the store with a lazy pool: no connection is made until the
    /// first query runs.
    pub fn connect(config: &DatabaseConfig, large_embeddings: bool) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect_lazy(&config.url())?;

        let (embeddings_table, contents_table) = Self::tables_for(large_embeddings);
        Ok(Self {
            pool,
            embeddings_table,
            contents_table,
        })
    }

    fn tables_for(large_embeddings: bool) -> (&'static str, &'static str) {
        if large_embeddings {
            ("embeddings_large", "item_contents_large")
        } else {
            ("embeddings", "item_contents")
        }
    }

    /// Run the embedded migrations (vector extension + tables).
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!().run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl EmbeddingRepository for PgVectorStore {
    async fn insert_embeddings(&self, embeddings: &[Embedding]) -> Result<(), StoreError> {
        tracing::debug!(
            rows = embeddings.len(),
            table = self.embeddings_table,
            "inserting embeddings"
        );

        let query = format!(
            "INSERT INTO {} (embedding) VALUES ($1)",
            self.embeddings_table
        );
        for embedding in embeddings {
            sqlx::query(&query)
                .bind(Vector::from(embedding.vector.clone()))
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }

    async fn insert_contents(&self, items: &[(String, Embedding)]) -> Result<Vec<i64>, StoreError> {
        tracing::debug!(
            rows = items.len(),
            table = self.contents_table,
            "inserting contents"
        );

        let query = format!(
            "INSERT INTO {} (content, embedding) VALUES ($1, $2) RETURNING id",
            self.contents_table
        );
        let mut ids = Vec::with_capacity(items.len());
        for (content, embedding) in items {
            let (id,): (i64,) = sqlx::query_as(&query)
                .bind(content)
                .bind(Vector::from(embedding.vector.clone()))
                .fetch_one(&self.pool)
                .await?;
            ids.push(id);
        }
        Ok(ids)
    }

    async fn content_by_id(&self, id: i64) -> Result<Option<ContentItem>, StoreError> {
        let query = format!(
            "SELECT id, content, embedding FROM {} WHERE id = $1",
            self.contents_table
        );
        let row: Option<(i64, String, Vector)> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(id, content, embedding)| ContentItem {
            id,
            content,
            embedding: embedding.to_vec(),
        }))
    }

    async fn similarity_search(
        &self,
        vector: &[f32],
        top_k: i64,
    ) -> Result<Vec<SearchHit>, StoreError> {
        tracing::debug!(top_k, table = self.contents_table, "similarity search");

        let query = format!(
            "SELECT content, (embedding <=> $1)::float8 AS distance \
             FROM {} ORDER BY embedding <=> $1 LIMIT $2",
            self.contents_table
        );
        let rows: Vec<(String, f64)> = sqlx::query_as(&query)
            .bind(Vector::from(vector.to_vec()))
            .bind(top_k)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(content, distance)| SearchHit { content, distance })
            .collect())
    }
}
