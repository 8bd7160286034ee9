use anyhow::Result;
use serde_json::{Map, Value};

use crate::core::domain::{NumericField, Table};
use crate::core::schema;
use crate::parsing::json_parser;
use crate::preprocessing::report::{CleanseReport, FieldProfile};
use crate::services::stats::{compute_stats, DescriptiveStats};
use crate::transformations::{
    bound_outliers, drop_duplicates, filter_valid_ids, resolve_missing, standardize_categories,
    CanonicalMap, DEFAULT_TENURE_FILL,
};

/// Result of a cleansing run: the cleansed table and the diagnostics
/// collected along the way.
#[derive(Debug)]
pub struct CleanseResult {
    pub table: Table,
    pub report: CleanseReport,
}

/// Configuration for the cleansing pipeline.
pub struct CleanseConfig {
    /// Fixed fill for missing tenure values.
    pub tenure_fill: f64,
    /// Substitution table for the category normalizer.
    pub canonical: CanonicalMap,
}

impl Default for CleanseConfig {
    fn default() -> Self {
        Self {
            tenure_fill: DEFAULT_TENURE_FILL,
            canonical: CanonicalMap::default(),
        }
    }
}

/// The cleansing pipeline: five stages in fixed order, each a pure
/// `Table -> Table` transform over the exclusively owned table.
///
/// Stage order is identifier filtering, deduplication, missing-value
/// resolution, outlier bounding, category standardization. Schema and type
/// coercion run once, before any stage; a schema or coercion failure aborts
/// the run before the table exists. A stage that empties the table is a
/// warning and the remaining stages run on the empty table.
pub struct CleansePipeline {
    config: CleanseConfig,
}

impl CleansePipeline {
    /// Create a new pipeline with default configuration
    pub fn new() -> Self {
        Self {
            config: CleanseConfig::default(),
        }
    }

    /// Create a pipeline with custom configuration
    pub fn with_config(config: CleanseConfig) -> Self {
        Self { config }
    }

    /// Cleanse raw rows into a table satisfying the output invariants.
    pub fn process_rows(&self, rows: Vec<Map<String, Value>>) -> Result<CleanseResult> {
        schema::check_schema(&rows)?;
        let table = schema::coerce_rows(rows)?;

        let mut report =
            CleanseReport::new(table.len(), schema::COLUMN_COUNT, table.unique_id_count());
        report.missing_before = table.missing_counts();
        log::info!(
            "ingested {} rows x {} columns ({} unique customer ids)",
            table.len(),
            schema::COLUMN_COUNT,
            report.input_unique_ids
        );

        let rows_in = table.len();
        let table = filter_valid_ids(table);
        report.record_stage("identifier-filter", rows_in, table.len());
        log::info!("identifier filter: {} -> {} rows", rows_in, table.len());

        let rows_in = table.len();
        let (table, dedup) = drop_duplicates(table);
        report.dedup = dedup;
        report.record_stage("deduplicate", rows_in, table.len());
        log::info!(
            "deduplication: removed {} exact duplicates and {} superseded rows",
            dedup.exact_duplicates,
            dedup.superseded
        );

        let rows_in = table.len();
        let (table, imputation) = resolve_missing(table, self.config.tenure_fill);
        report.imputation = imputation;
        report.record_stage("missing-values", rows_in, table.len());
        log::info!(
            "missing values: dropped {} unlabeled rows, imputed {} cells",
            imputation.dropped_unlabeled,
            imputation.imputed_tenure + imputation.imputed_monthly + imputation.imputed_total
        );

        let rows_in = table.len();
        let profile_before = profile_fields(&table);
        let (table, bounds) = bound_outliers(table);
        let profile_after = profile_fields(&table);
        report.profile = NumericField::ALL
            .iter()
            .zip(profile_before)
            .zip(profile_after)
            .map(|((field, before), after)| FieldProfile {
                field: *field,
                before,
                after,
            })
            .collect();
        log::info!(
            "outlier bounds: clipped {} values across {} fields",
            bounds.iter().map(|b| b.clipped).sum::<usize>(),
            bounds.len()
        );
        report.bounds = bounds;
        report.record_stage("outlier-bounds", rows_in, table.len());

        let rows_in = table.len();
        let (table, rewrites) = standardize_categories(table, &self.config.canonical);
        report.category_rewrites = rewrites;
        report.record_stage("standardize-categories", rows_in, table.len());
        log::info!("standardization: rewrote {rewrites} cells");

        report.missing_after = table.missing_counts();
        Ok(CleanseResult { table, report })
    }

    /// Cleanse a JSON string holding an array of row objects.
    pub fn process_json_str(&self, json: &str) -> Result<CleanseResult> {
        let rows = json_parser::parse_rows_json_str(json)?;
        self.process_rows(rows)
    }
}

impl Default for CleansePipeline {
    fn default() -> Self {
        Self::new()
    }
}

fn profile_fields(table: &Table) -> Vec<Option<DescriptiveStats>> {
    NumericField::ALL
        .iter()
        .map(|field| {
            let values: Vec<f64> = table.rows.iter().filter_map(|rec| field.get(rec)).collect();
            if values.is_empty() {
                None
            } else {
                Some(compute_stats(&values))
            }
        })
        .collect()
}

/// Convenience function to cleanse raw rows with the default configuration.
pub fn cleanse_rows(rows: Vec<Map<String, Value>>) -> Result<CleanseResult> {
    CleansePipeline::new().process_rows(rows)
}
