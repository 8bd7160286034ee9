use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::Path;

/// Parse a JSON array of row objects into raw cell maps.
///
/// Deserialization goes through `serde_path_to_error` so a malformed cell is
/// reported with the path to the offending element rather than a bare offset.
pub fn parse_rows_json_str(json: &str) -> Result<Vec<Map<String, Value>>> {
    let mut de = serde_json::Deserializer::from_str(json);
    let rows: Vec<Map<String, Value>> = serde_path_to_error::deserialize(&mut de)
        .context("failed to parse dataset rows from JSON")?;
    Ok(rows)
}

/// Parse a JSON dataset file into raw cell maps.
pub fn parse_rows_json(path: &Path) -> Result<Vec<Map<String, Value>>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset file: {}", path.display()))?;
    parse_rows_json_str(&content)
}
