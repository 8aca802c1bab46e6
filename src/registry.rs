use anyhow::Result;
use std::sync::Arc;

use crate::config::{ApiMode, AppEnv, Config, ProcessingConfig, SearchProvider};
use crate::external::{
    DummyFinanceClient, DummyLlmClient, FinanceClient, LlmClient, LlmWebSearch, OllamaClient,
    OpenAiClient, TavilyClient, WebSearchClient, YahooFinanceClient,
};
use crate::repository::{EmbeddingRepository, MemoryRepository, PgVectorStore};
use crate::usecases::{IngestUsecase, NewsUsecase, QueryUsecase, QuoteUsecase, SearchUsecase};

/// Environment-driven factory wiring the concrete clients and repository a
/// use case needs.
pub struct DependencyRegistry {
    llm: Arc<dyn LlmClient>,
    web: Arc<dyn WebSearchClient>,
    finance: Arc<dyn FinanceClient>,
    repo: Arc<dyn EmbeddingRepository>,
    store: Option<Arc<PgVectorStore>>,
    api_mode: ApiMode,
    processing: ProcessingConfig,
}

impl DependencyRegistry {
    pub fn new(config: Config) -> Result<Self> {
        let llm: Arc<dyn LlmClient> = match config.env {
            AppEnv::Prod => {
                tracing::debug!(model = %config.openai.model, "using hosted OpenAI API");
                Arc::new(OpenAiClient::new(config.openai.clone())?)
            }
            AppEnv::Dev => {
                tracing::debug!(model = %config.ollama.model, "using local Ollama API");
                Arc::new(OllamaClient::new(config.ollama.clone())?)
            }
            AppEnv::Test => {
                tracing::debug!("using dummy LLM client");
                Arc::new(DummyLlmClient::new())
            }
        };

        let web: Arc<dyn WebSearchClient> = match config.search.provider {
            SearchProvider::Tavily => {
                tracing::debug!("using Tavily web search");
                Arc::new(TavilyClient::new(config.search.tavily_api_key.clone())?)
            }
            SearchProvider::Llm => Arc::new(LlmWebSearch::new(Arc::clone(&llm))),
        };

        let finance: Arc<dyn FinanceClient> = match config.env {
            AppEnv::Test => Arc::new(DummyFinanceClient::new()),
            _ => Arc::new(YahooFinanceClient::new()?),
        };

        let (repo, store): (Arc<dyn EmbeddingRepository>, Option<Arc<PgVectorStore>>) =
            match config.env {
                AppEnv::Test => {
                    tracing::debug!("using in-memory repository");
                    (Arc::new(MemoryRepository::new()), None)
                }
                _ => {
                    let store = Arc::new(PgVectorStore::connect(
                        &config.database,
                        config.large_embeddings,
                    )?);
                    (
                        Arc::clone(&store) as Arc<dyn EmbeddingRepository>,
                        Some(store),
                    )
                }
            };

        Ok(Self {
            llm,
            web,
            finance,
            repo,
            store,
            api_mode: config.openai.api_mode,
            processing: config.processing,
        })
    }

    pub fn query_usecase(&self) -> QueryUsecase {
        QueryUsecase::new(Arc::clone(&self.llm), Arc::clone(&self.repo), self.api_mode)
    }

    pub fn search_usecase(&self) -> SearchUsecase {
        SearchUsecase::new(Arc::clone(&self.repo))
    }

    pub fn ingest_usecase(&self) -> IngestUsecase {
        IngestUsecase::new(
            Arc::clone(&self.llm),
            Arc::clone(&self.repo),
            self.processing.batch_size,
            self.processing.max_concurrent_requests,
        )
    }

    pub fn news_usecase(&self) -> NewsUsecase {
        NewsUsecase::new(Arc::clone(&self.web))
    }

    pub fn quote_usecase(&self) -> QuoteUsecase {
        QuoteUsecase::new(Arc::clone(&self.finance))
    }

    /// Apply the database schema. A no-op for the in-memory repository.
    pub async fn migrate(&self) -> Result<()> {
        match &self.store {
            Some(store) => {
                store.migrate().await?;
                Ok(())
            }
            None => {
                tracing::info!("in-memory repository, nothing to migrate");
                Ok(())
            }
        }
    }
}
