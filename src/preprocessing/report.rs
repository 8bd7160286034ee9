//! Diagnostic report assembled while the pipeline runs.
//!
//! Everything here is observability for the caller; none of it is part of
//! the data contract. The report serializes so reporting tools can consume
//! it without touching the cleansed table.

use serde::Serialize;

use crate::core::domain::{MissingCounts, NumericField};
use crate::services::stats::DescriptiveStats;
use crate::transformations::{DedupSummary, FieldBounds, MissingSummary};

/// Row counts around one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stage: &'static str,
    pub rows_in: usize,
    pub rows_out: usize,
    pub rows_removed: usize,
}

/// Distribution of one numeric field before and after outlier bounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldProfile {
    pub field: NumericField,
    pub before: Option<DescriptiveStats>,
    pub after: Option<DescriptiveStats>,
}

/// Scalar metrics collected across the whole run.
///
/// # Examples
///
/// ```
/// use telco_cleanse::preprocessing::CleanseReport;
///
/// let mut report = CleanseReport::new(10, 22, 9);
/// report.record_stage("identifier-filter", 10, 7);
/// assert_eq!(report.output_rows(), 7);
/// assert!(report.warnings.is_empty());
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct CleanseReport {
    pub input_rows: usize,
    pub columns: usize,
    pub input_unique_ids: usize,
    pub stages: Vec<StageReport>,
    pub missing_before: MissingCounts,
    pub missing_after: MissingCounts,
    pub dedup: DedupSummary,
    pub imputation: MissingSummary,
    pub bounds: Vec<FieldBounds>,
    pub profile: Vec<FieldProfile>,
    pub category_rewrites: usize,
    pub warnings: Vec<String>,
}

impl CleanseReport {
    pub fn new(input_rows: usize, columns: usize, input_unique_ids: usize) -> Self {
        Self {
            input_rows,
            columns,
            input_unique_ids,
            stages: Vec::new(),
            missing_before: MissingCounts::default(),
            missing_after: MissingCounts::default(),
            dedup: DedupSummary::default(),
            imputation: MissingSummary::default(),
            bounds: Vec::new(),
            profile: Vec::new(),
            category_rewrites: 0,
            warnings: Vec::new(),
        }
    }

    /// Records row counts for a stage. A stage that empties a non-empty
    /// table is a warning, never an error; downstream stages keep running on
    /// the empty table.
    pub fn record_stage(&mut self, stage: &'static str, rows_in: usize, rows_out: usize) {
        self.stages.push(StageReport {
            stage,
            rows_in,
            rows_out,
            rows_removed: rows_in - rows_out,
        });
        if rows_out == 0 && rows_in > 0 {
            let warning = format!("stage '{stage}' left the table empty");
            log::warn!("{warning}");
            self.warnings.push(warning);
        }
    }

    /// Row count after the last recorded stage.
    pub fn output_rows(&self) -> usize {
        self.stages
            .last()
            .map(|s| s.rows_out)
            .unwrap_or(self.input_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_removed_counts_per_stage() {
        let mut report = CleanseReport::new(100, 22, 95);
        report.record_stage("identifier-filter", 100, 80);
        report.record_stage("deduplicate", 80, 60);

        assert_eq!(report.stages.len(), 2);
        assert_eq!(report.stages[0].rows_removed, 20);
        assert_eq!(report.output_rows(), 60);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn emptying_a_table_is_a_warning() {
        let mut report = CleanseReport::new(5, 22, 5);
        report.record_stage("identifier-filter", 5, 0);
        report.record_stage("deduplicate", 0, 0);

        // only the emptying stage warns, not every stage that sees 0 rows
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("identifier-filter"));
    }

    #[test]
    fn report_serializes_for_external_consumers() {
        let report = CleanseReport::new(1, 22, 1);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["input_rows"], 1);
        assert_eq!(json["columns"], 22);
    }
}
