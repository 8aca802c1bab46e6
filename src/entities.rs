use anyhow::Result;
use serde::{Deserialize, Serialize};

/// A single embedding vector as returned by an embeddings API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    pub vector: Vec<f32>,
    #[serde(default)]
    pub index: u32,
}

impl Embedding {
    pub fn new(vector: Vec<f32>, index: u32) -> Self {
        Self { vector, index }
    }

    /// Parse an embedding from JSON. Debug dumps are stored either as a bare
    /// array of floats or as a full object.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        if let Ok(vector) = serde_json::from_str::<Vec<f32>>(raw) {
            return Ok(Self { vector, index: 0 });
        }
        Ok(serde_json::from_str::<Self>(raw)?)
    }
}

/// A stored row from the contents table.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentItem {
    pub id: i64,
    pub content: String,
    pub embedding: Vec<f32>,
}

/// One similarity-search result, ordered by ascending cosine distance.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub content: String,
    pub distance: f64,
}

/// A stock quote.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    pub currency: String,
}
