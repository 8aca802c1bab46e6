use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::entities::Embedding;

/// Read an embedding JSON dump and describe it for debugging.
pub fn describe_embedding_file(path: &Path) -> Result<String> {
    let raw = fs::read_to_string(path)?;
    let embedding = Embedding::from_json_str(&raw)?;

    let head: Vec<f32> = embedding.vector.iter().take(10).copied().collect();
    Ok(format!(
        "Embedding {}: {:?}... (total {} values)",
        embedding.index,
        head,
        embedding.vector.len()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_bare_array_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("embedding01.json");
        fs::write(&path, "[0.1, 0.2, 0.3]").unwrap();

        let summary = describe_embedding_file(&path).unwrap();
        assert!(summary.starts_with("Embedding 0:"));
        assert!(summary.contains("total 3 values"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(describe_embedding_file(Path::new("/nonexistent.json")).is_err());
    }
}
