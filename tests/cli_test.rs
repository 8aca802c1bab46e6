use assert_fs::prelude::*;
use predicates::prelude::*;

/// Run the binary in the test environment (dummy LLM, in-memory store).
async fn run(args: &[&str]) -> std::process::Output {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_llm_agents_cli"))
        .args(args)
        .env("APP_ENV", "test")
        .env("SEARCH_PROVIDER", "llm")
        .env("LOG_LEVEL", "error")
        .output()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_ask_prints_answer() {
    let output = run(&["ask", "What is Rust?"]).await;
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(predicate::str::contains("dummy response").eval(&stdout));
}

#[tokio::test]
async fn test_search_unknown_id_fails() {
    // Each invocation starts with an empty in-memory store.
    let output = run(&["search", "42"]).await;
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(predicate::str::contains("42 not found").eval(&stderr));
}

#[tokio::test]
async fn test_news_uses_dummy_web_search() {
    let output = run(&["news"]).await;
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(predicate::str::contains("dummy web search response").eval(&stdout));
}

#[tokio::test]
async fn test_quote_prints_dummy_price() {
    let output = run(&["quote", "AAPL"]).await;
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(predicate::str::contains("AAPL: 123.45 USD").eval(&stdout));
}

#[tokio::test]
async fn test_ingest_reports_section_counts() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("doc.md")
        .write_str("# One\nfirst section\n\n# Two\nsecond section\n")
        .unwrap();

    let output = run(&["ingest", temp.path().to_str().unwrap()]).await;
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(predicate::str::contains("Ingested 2 sections from 1 files.").eval(&stdout));
}

#[tokio::test]
async fn test_inspect_embedding_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("embedding01.json");
    file.write_str("[0.1, 0.2, 0.3, 0.4, 0.5]").unwrap();
    file.assert(predicate::path::exists());

    let output = run(&["inspect-embedding", file.path().to_str().unwrap()]).await;
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(predicate::str::contains("total 5 values").eval(&stdout));
}

#[tokio::test]
async fn test_init_db_is_noop_in_test_env() {
    let output = run(&["init-db"]).await;
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(predicate::str::contains("up to date").eval(&stdout));
}
