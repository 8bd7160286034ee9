use serde::Serialize;

use crate::core::domain::{NumericField, Table};
use crate::services::stats;

/// Fixed tenure fill: a typical tenure bucket chosen by the domain, never
/// recomputed from data.
pub const DEFAULT_TENURE_FILL: f64 = 11.0;

/// What the resolver dropped and imputed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MissingSummary {
    pub dropped_unlabeled: usize,
    pub tenure_fill: f64,
    pub imputed_tenure: usize,
    pub monthly_median: Option<f64>,
    pub imputed_monthly: usize,
    pub total_median: Option<f64>,
    pub imputed_total: usize,
}

/// Drops rows with a missing outcome label, then imputes missing numerics.
///
/// Unlabeled rows are unrecoverable for modeling and go first, so the charge
/// medians are computed over labeled rows only. `tenure` is filled with the
/// configured constant; each charge column is filled with its own median over
/// non-missing values, column-independently. A charge column with no
/// non-missing values at all is left alone (the median is undefined) and the
/// skip is visible in the summary.
pub fn resolve_missing(mut table: Table, tenure_fill: f64) -> (Table, MissingSummary) {
    let before = table.rows.len();
    table.rows.retain(|rec| rec.churn.is_some());

    let mut summary = MissingSummary {
        dropped_unlabeled: before - table.rows.len(),
        tenure_fill,
        ..MissingSummary::default()
    };

    for rec in &mut table.rows {
        if rec.tenure.is_none() {
            rec.tenure = Some(tenure_fill);
            summary.imputed_tenure += 1;
        }
    }

    let (median, imputed) = impute_with_median(&mut table, NumericField::MonthlyCharges);
    summary.monthly_median = median;
    summary.imputed_monthly = imputed;

    let (median, imputed) = impute_with_median(&mut table, NumericField::TotalCharges);
    summary.total_median = median;
    summary.imputed_total = imputed;

    (table, summary)
}

/// Fills missing cells of a charge column with the median of its non-missing
/// values. Returns `(None, 0)` when the median is undefined.
fn impute_with_median(table: &mut Table, field: NumericField) -> (Option<f64>, usize) {
    let values: Vec<f64> = table.rows.iter().filter_map(|rec| field.get(rec)).collect();
    let Some(median) = stats::median(&values) else {
        if !table.rows.is_empty() {
            log::warn!(
                "column '{}' has no non-missing values; imputation skipped",
                field.column_name()
            );
        }
        return (None, 0);
    };

    let mut imputed = 0;
    for rec in &mut table.rows {
        if field.get(rec).is_none() {
            field.set(rec, median);
            imputed += 1;
        }
    }
    (Some(median), imputed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::test_support::record;

    #[test]
    fn drops_rows_without_outcome_label() {
        let mut unlabeled = record("451234567890", "2020-06");
        unlabeled.churn = None;
        let labeled = record("451234567891", "2020-06");

        let (table, summary) = resolve_missing(Table::new(vec![unlabeled, labeled]), DEFAULT_TENURE_FILL);
        assert_eq!(table.len(), 1);
        assert_eq!(summary.dropped_unlabeled, 1);
        assert_eq!(table.rows[0].customer_id, "451234567891");
    }

    #[test]
    fn fills_tenure_with_the_fixed_constant() {
        let mut rec = record("451234567890", "2020-06");
        rec.tenure = None;

        let (table, summary) = resolve_missing(Table::new(vec![rec]), DEFAULT_TENURE_FILL);
        assert_eq!(table.rows[0].tenure, Some(11.0));
        assert_eq!(summary.imputed_tenure, 1);
    }

    #[test]
    fn fills_charges_with_the_column_median() {
        let mut a = record("451234567890", "2020-06");
        a.monthly_charges = Some(10.0);
        let mut b = record("451234567891", "2020-06");
        b.monthly_charges = Some(30.0);
        let mut c = record("451234567892", "2020-06");
        c.monthly_charges = None;

        let (table, summary) = resolve_missing(Table::new(vec![a, b, c]), DEFAULT_TENURE_FILL);
        assert_eq!(summary.monthly_median, Some(20.0));
        assert_eq!(summary.imputed_monthly, 1);
        assert_eq!(table.rows[2].monthly_charges, Some(20.0));
    }

    #[test]
    fn median_is_computed_after_unlabeled_rows_are_dropped() {
        // The unlabeled row carries an extreme charge; dropping it first must
        // keep it out of the median.
        let mut unlabeled = record("451234567890", "2020-06");
        unlabeled.churn = None;
        unlabeled.total_charges = Some(1_000_000.0);
        let mut a = record("451234567891", "2020-06");
        a.total_charges = Some(100.0);
        let mut b = record("451234567892", "2020-06");
        b.total_charges = Some(300.0);
        let mut c = record("451234567893", "2020-06");
        c.total_charges = None;

        let (table, summary) = resolve_missing(
            Table::new(vec![unlabeled, a, b, c]),
            DEFAULT_TENURE_FILL,
        );
        assert_eq!(summary.total_median, Some(200.0));
        assert_eq!(table.rows[2].total_charges, Some(200.0));
    }

    #[test]
    fn all_missing_charge_column_is_skipped() {
        let mut a = record("451234567890", "2020-06");
        a.monthly_charges = None;
        let mut b = record("451234567891", "2020-06");
        b.monthly_charges = None;

        let (table, summary) = resolve_missing(Table::new(vec![a, b]), DEFAULT_TENURE_FILL);
        assert_eq!(summary.monthly_median, None);
        assert_eq!(summary.imputed_monthly, 0);
        assert!(table.rows.iter().all(|r| r.monthly_charges.is_none()));
    }

    #[test]
    fn empty_table_passes_through() {
        let (table, summary) = resolve_missing(Table::new(vec![]), DEFAULT_TENURE_FILL);
        assert!(table.is_empty());
        assert_eq!(summary.dropped_unlabeled, 0);
    }
}
