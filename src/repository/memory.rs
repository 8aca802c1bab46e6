use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

use crate::entities::{ContentItem, Embedding, SearchHit};
use crate::repository::{EmbeddingRepository, StoreError};

/// In-memory repository for the test environment. Vector search is
/// brute-force cosine distance over all stored rows.
pub struct MemoryRepository {
    embeddings: RwLock<Vec<Embedding>>,
    contents: RwLock<Vec<ContentItem>>,
    next_id: AtomicI64,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self {
            embeddings: RwLock::new(Vec::new()),
            contents: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 1.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if mag_a < f32::EPSILON || mag_b < f32::EPSILON {
        1.0
    } else {
        1.0 - (dot / (mag_a * mag_b)) as f64
    }
}

#[async_trait]
impl EmbeddingRepository for MemoryRepository {
    async fn insert_embeddings(&self, embeddings: &[Embedding]) -> Result<(), StoreError> {
        let mut stored = self.embeddings.write().unwrap();
        stored.extend_from_slice(embeddings);
        Ok(())
    }

    async fn insert_contents(&self, items: &[(String, Embedding)]) -> Result<Vec<i64>, StoreError> {
        let mut stored = self.contents.write().unwrap();
        let mut ids = Vec::with_capacity(items.len());
        for (content, embedding) in items {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            stored.push(ContentItem {
                id,
                content: content.clone(),
                embedding: embedding.vector.clone(),
            });
            ids.push(id);
        }
        Ok(ids)
    }

    async fn content_by_id(&self, id: i64) -> Result<Option<ContentItem>, StoreError> {
        let stored = self.contents.read().unwrap();
        Ok(stored.iter().find(|item| item.id == id).cloned())
    }

    async fn similarity_search(
        &self,
        vector: &[f32],
        top_k: i64,
    ) -> Result<Vec<SearchHit>, StoreError> {
        let stored = self.contents.read().unwrap();
        let mut hits: Vec<SearchHit> = stored
            .iter()
            .map(|item| SearchHit {
                content: item.content.clone(),
                distance: cosine_distance(vector, &item.embedding),
            })
            .collect();
        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(top_k as usize);
        Ok(hits)
    }
}
