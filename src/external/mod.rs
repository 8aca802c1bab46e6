pub mod dummy;
pub mod error;
pub mod finance;
pub mod llm;
pub mod ollama;
pub mod openai;
pub mod websearch;

pub use dummy::DummyLlmClient;
pub use error::ExternalError;
pub use finance::{DummyFinanceClient, FinanceClient, YahooFinanceClient};
pub use llm::{ChatMessage, LlmClient, LlmResult};
pub use ollama::OllamaClient;
pub use openai::OpenAiClient;
pub use websearch::{LlmWebSearch, TavilyClient, WebSearchClient};
