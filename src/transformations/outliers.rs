use serde::Serialize;

use crate::core::domain::{NumericField, Table};
use crate::services::stats::quantile_sorted;

/// IQR-derived bounds computed for one numeric field, with the number of
/// values clamped into them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldBounds {
    pub field: NumericField,
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
    pub clipped: usize,
}

/// Clamps each numeric field into `[Q1 - 1.5*IQR, Q3 + 1.5*IQR]`.
///
/// Quartiles are linear-interpolation quantiles over the column's current
/// values, outliers included; each field is bounded independently. Values are
/// rewritten in place, rows are never removed. A field with no present
/// values gets no bounds entry.
pub fn bound_outliers(mut table: Table) -> (Table, Vec<FieldBounds>) {
    let mut all_bounds = Vec::new();

    for field in NumericField::ALL {
        let mut values: Vec<f64> = table.rows.iter().filter_map(|rec| field.get(rec)).collect();
        if values.is_empty() {
            continue;
        }
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let (Some(q1), Some(q3)) = (
            quantile_sorted(&values, 0.25),
            quantile_sorted(&values, 0.75),
        ) else {
            continue;
        };
        let iqr = q3 - q1;
        let lower = q1 - 1.5 * iqr;
        let upper = q3 + 1.5 * iqr;

        let mut clipped = 0;
        for rec in &mut table.rows {
            if let Some(value) = field.get(rec) {
                let bounded = value.clamp(lower, upper);
                if bounded != value {
                    field.set(rec, bounded);
                    clipped += 1;
                }
            }
        }

        all_bounds.push(FieldBounds {
            field,
            q1,
            q3,
            lower,
            upper,
            clipped,
        });
    }

    (table, all_bounds)
}
