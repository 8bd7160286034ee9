use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::domain::Table;

/// Canonical subscriber identifier: leading `45`, digits only, 11-12 chars.
static VALID_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^45\d{9,10}$").expect("identifier pattern compiles"));

/// True when an identifier has the canonical format.
pub fn is_valid_id(id: &str) -> bool {
    VALID_ID.is_match(id)
}

/// Keeps only rows whose identifier matches the canonical format.
///
/// Rows failing the pattern are discarded, not flagged for repair; the
/// removed count is reported by the pipeline as a metric. An empty result is
/// not an error.
pub fn filter_valid_ids(mut table: Table) -> Table {
    table.rows.retain(|rec| is_valid_id(&rec.customer_id));
    table
}
