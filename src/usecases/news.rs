use anyhow::Result;
use std::sync::Arc;

use crate::external::WebSearchClient;

const DEFAULT_QUERY: &str = "top technology news today";

/// Fetch news headlines through the configured web-search backend.
pub struct NewsUsecase {
    web: Arc<dyn WebSearchClient>,
}

impl NewsUsecase {
    pub fn new(web: Arc<dyn WebSearchClient>) -> Self {
        Self { web }
    }

    pub async fn headlines(&self, query: Option<&str>) -> Result<String> {
        let query = query.unwrap_or(DEFAULT_QUERY);
        tracing::debug!(query, "searching the web");
        Ok(self.web.search(query).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::ExternalError;
    use async_trait::async_trait;
    use mockall::mock;
    use mockall::predicate;

    mock! {
        pub Web {}

        #[async_trait]
        impl WebSearchClient for Web {
            async fn search(&self, query: &str) -> Result<String, ExternalError>;
        }
    }

    #[tokio::test]
    async fn test_default_query() {
        let mut web = MockWeb::new();
        web.expect_search()
            .with(predicate::eq(DEFAULT_QUERY))
            .times(1)
            .returning(|_| Ok("headline".to_string()));

        let usecase = NewsUsecase::new(Arc::new(web));
        assert_eq!(usecase.headlines(None).await.unwrap(), "headline");
    }

    #[tokio::test]
    async fn test_explicit_query() {
        let mut web = MockWeb::new();
        web.expect_search()
            .with(predicate::eq("rust releases"))
            .times(1)
            .returning(|_| Ok("release notes".to_string()));

        let usecase = NewsUsecase::new(Arc::new(web));
        assert_eq!(
            usecase.headlines(Some("rust releases")).await.unwrap(),
            "release notes"
        );
    }
}
