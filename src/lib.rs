pub mod chunker;
pub mod config;
pub mod entities;
pub mod external;
pub mod registry;
pub mod repository;
pub mod usecases;

pub use config::Config;
pub use entities::{ContentItem, Embedding, Quote, SearchHit};
pub use external::{ExternalError, LlmClient, WebSearchClient};
pub use registry::DependencyRegistry;
pub use repository::{EmbeddingRepository, StoreError};
