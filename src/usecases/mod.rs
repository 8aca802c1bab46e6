pub mod ingest;
pub mod inspect;
pub mod news;
pub mod query;
pub mod quote;
pub mod search;

pub use ingest::{IngestReport, IngestUsecase};
pub use news::NewsUsecase;
pub use query::QueryUsecase;
pub use quote::QuoteUsecase;
pub use search::SearchUsecase;
