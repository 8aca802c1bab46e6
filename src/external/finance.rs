use async_trait::async_trait;
use regex::Regex;
use std::time::Duration;

use crate::entities::Quote;
use crate::external::error::ExternalError;

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Finance data backend.
#[async_trait]
pub trait FinanceClient: Send + Sync {
    async fn quote(&self, symbol: &str) -> Result<Quote, ExternalError>;
}

/// Quote lookup against the Yahoo Finance chart endpoint.
pub struct YahooFinanceClient {
    http: reqwest::Client,
}

impl YahooFinanceClient {
    pub fn new() -> Result<Self, ExternalError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("llm-agents-cli/0.1")
            .build()?;
        Ok(Self { http })
    }

    fn validate_symbol(symbol: &str) -> Result<(), ExternalError> {
        let re = Regex::new(r"^[A-Z0-9.\-]{1,10}$").unwrap();
        if !re.is_match(symbol) {
            return Err(ExternalError::Config(format!(
                "invalid ticker symbol `{}`",
                symbol
            )));
        }
        Ok(())
    }

    fn parse_quote(symbol: &str, data: &serde_json::Value) -> Result<Quote, ExternalError> {
        let meta = data
            .get("chart")
            .and_then(|c| c.get("result"))
            .and_then(|r| r.as_array())
            .and_then(|r| r.first())
            .and_then(|r| r.get("meta"))
            .ok_or_else(|| ExternalError::Api("no chart result in response".to_string()))?;

        let price = meta
            .get("regularMarketPrice")
            .and_then(|p| p.as_f64())
            .ok_or_else(|| ExternalError::Api("no market price in response".to_string()))?;

        let currency = meta
            .get("currency")
            .and_then(|c| c.as_str())
            .unwrap_or("USD")
            .to_string();

        Ok(Quote {
            symbol: symbol.to_string(),
            price,
            currency,
        })
    }
}

#[async_trait]
impl FinanceClient for YahooFinanceClient {
    async fn quote(&self, symbol: &str) -> Result<Quote, ExternalError> {
        Self::validate_symbol(symbol)?;
        tracing::debug!(symbol, "calling yahoo finance chart");

        let response = self
            .http
            .get(format!("{}/{}", CHART_URL, symbol))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ExternalError::Api(format!("HTTP {}: {}", status, body)));
        }

        let data: serde_json::Value = response.json().await?;
        Self::parse_quote(symbol, &data)
    }
}

/// Fixed quote for the test environment.
#[derive(Debug, Default)]
pub struct DummyFinanceClient {}

impl DummyFinanceClient {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl FinanceClient for DummyFinanceClient {
    async fn quote(&self, symbol: &str) -> Result<Quote, ExternalError> {
        Ok(Quote {
            symbol: symbol.to_string(),
            price: 123.45,
            currency: "USD".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_validation() {
        assert!(YahooFinanceClient::validate_symbol("AAPL").is_ok());
        assert!(YahooFinanceClient::validate_symbol("BRK.B").is_ok());
        assert!(YahooFinanceClient::validate_symbol("aapl").is_err());
        assert!(YahooFinanceClient::validate_symbol("").is_err());
        assert!(YahooFinanceClient::validate_symbol("DROP TABLE").is_err());
    }

    #[test]
    fn test_parse_quote() {
        let raw = serde_json::json!({
            "chart": {
                "result": [
                    {"meta": {"regularMarketPrice": 178.42, "currency": "USD", "symbol": "AAPL"}}
                ],
                "error": null
            }
        });
        let quote = YahooFinanceClient::parse_quote("AAPL", &raw).unwrap();
        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.price, 178.42);
        assert_eq!(quote.currency, "USD");
    }

    #[test]
    fn test_parse_quote_missing_price() {
        let raw = serde_json::json!({"chart": {"result": [{"meta": {}}], "error": null}});
        assert!(YahooFinanceClient::parse_quote("AAPL", &raw).is_err());
    }
}
