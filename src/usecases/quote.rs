use anyhow::Result;
use std::sync::Arc;

use crate::entities::Quote;
use crate::external::FinanceClient;

/// Fetch a stock quote.
pub struct QuoteUsecase {
    finance: Arc<dyn FinanceClient>,
}

impl QuoteUsecase {
    pub fn new(finance: Arc<dyn FinanceClient>) -> Self {
        Self { finance }
    }

    pub async fn quote(&self, symbol: &str) -> Result<Quote> {
        tracing::debug!(symbol, "fetching quote");
        Ok(self.finance.quote(symbol).await?)
    }
}
