use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use llm_agents_cli::config::Config;
use llm_agents_cli::registry::DependencyRegistry;
use llm_agents_cli::usecases::inspect;

#[derive(Parser, Debug)]
#[command(author, version, about = "LLM agent demos backed by a pgvector store")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask the configured model a question and store its embedding
    Ask {
        question: String,

        /// Answer with the step-by-step tech-guide persona
        #[arg(long)]
        guide: bool,
    },

    /// Find content similar to a stored item
    Search {
        content_id: i64,

        #[arg(long, default_value_t = 5)]
        top_k: i64,
    },

    /// Embed and store markdown/text documents from a directory
    Ingest { dir: PathBuf },

    /// Search the web for news
    News { query: Option<String> },

    /// Fetch a stock quote
    Quote { symbol: String },

    /// Print a summary of an embedding JSON file
    InspectEmbedding { path: PathBuf },

    /// Create or update the database schema
    InitDb,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.processing.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let registry = DependencyRegistry::new(config)?;

    match cli.command {
        Command::Ask { question, guide } => {
            let usecase = registry.query_usecase();
            let answer = if guide {
                usecase.ask_guide(&question).await?
            } else {
                usecase.ask(&question).await?
            };
            println!("{}", answer);
        }
        Command::Search { content_id, top_k } => {
            let hits = registry
                .search_usecase()
                .similar(content_id, top_k)
                .await?;
            for hit in hits {
                println!("{:.4}  {}", hit.distance, hit.content);
            }
        }
        Command::Ingest { dir } => {
            let report = registry.ingest_usecase().ingest_dir(&dir).await?;
            println!(
                "Ingested {} sections from {} files.",
                report.sections, report.files
            );
        }
        Command::News { query } => {
            let headlines = registry
                .news_usecase()
                .headlines(query.as_deref())
                .await?;
            println!("{}", headlines);
        }
        Command::Quote { symbol } => {
            let quote = registry.quote_usecase().quote(&symbol).await?;
            println!("{}: {} {}", quote.symbol, quote.price, quote.currency);
        }
        Command::InspectEmbedding { path } => {
            println!("{}", inspect::describe_embedding_file(&path)?);
        }
        Command::InitDb => {
            registry.migrate().await?;
            println!("Database schema is up to date.");
        }
    }

    Ok(())
}
