//! Error types for ingestion and coercion.

/// Result type for ingestion-boundary operations
pub type IngestResult<T> = Result<T, CleanseError>;

/// Errors that stop the pipeline before or during ingestion.
///
/// Both variants are fatal: a missing column means the input does not carry
/// the declared schema at all, and an uncoercible cell aborts the whole run
/// rather than silently dropping the row (see DESIGN.md for the rationale).
#[derive(Debug, thiserror::Error)]
pub enum CleanseError {
    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("row {row}: column '{column}': cannot coerce {value} to {expected}")]
    TypeCoercion {
        row: usize,
        column: String,
        value: String,
        expected: &'static str,
    },
}
