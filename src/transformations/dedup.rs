use std::collections::HashSet;

use serde::Serialize;

use crate::core::domain::Table;

/// Counts of rows the deduplicator removed, split by policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DedupSummary {
    /// Rows identical to an earlier row across every column.
    pub exact_duplicates: usize,
    /// Rows sharing an identifier with a more recent observation.
    pub superseded: usize,
}

/// Removes exact duplicates, then keeps only the most recent period per
/// identifier.
///
/// Exact duplicates keep their first occurrence. For repeated collection of
/// the same customer, rows are stably sorted by period descending and the
/// first row per identifier is retained, so among rows sharing identifier
/// *and* period the one earliest in the input order wins. The output has a
/// unique identifier per row and stays in period-descending order.
pub fn drop_duplicates(table: Table) -> (Table, DedupSummary) {
    let mut summary = DedupSummary::default();

    let mut seen = HashSet::new();
    let mut rows = Vec::with_capacity(table.rows.len());
    for rec in table.rows {
        // rows hash by their debug rendering; every field is plain data
        if seen.insert(format!("{rec:?}")) {
            rows.push(rec);
        } else {
            summary.exact_duplicates += 1;
        }
    }

    rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    let before = rows.len();
    let mut seen_ids = HashSet::new();
    rows.retain(|rec| seen_ids.insert(rec.customer_id.clone()));
    summary.superseded = before - rows.len();

    (Table::new(rows), summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::test_support::record;
    use crate::core::domain::Period;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn removes_fully_identical_rows() {
        let rows = vec![
            record("451234567890", "2020-06"),
            record("451234567890", "2020-06"),
            record("451234567891", "2020-06"),
        ];
        let (table, summary) = drop_duplicates(Table::new(rows));
        assert_eq!(table.len(), 2);
        assert_eq!(summary.exact_duplicates, 1);
        assert_eq!(summary.superseded, 0);
    }

    #[test]
    fn keeps_most_recent_period_per_identifier() {
        let mut may = record("451111111111", "2020-05");
        may.tenure = Some(5.0);
        let mut june = record("451111111111", "2020-06");
        june.tenure = Some(6.0);

        let (table, summary) = drop_duplicates(Table::new(vec![may, june]));
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].updated_at, Period::parse("2020-06").unwrap());
        assert_eq!(table.rows[0].tenure, Some(6.0));
        assert_eq!(summary.superseded, 1);
    }

    #[test]
    fn equal_periods_keep_the_earliest_input_row() {
        let mut first = record("451111111111", "2020-06");
        first.gender = "Female".into();
        let mut second = record("451111111111", "2020-06");
        second.gender = "Male".into();

        let (table, _) = drop_duplicates(Table::new(vec![first, second]));
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].gender, "Female");
    }

    #[test]
    fn distinct_identifiers_are_untouched() {
        let rows = vec![
            record("451234567890", "2020-05"),
            record("451234567891", "2020-06"),
        ];
        let (table, summary) = drop_duplicates(Table::new(rows));
        assert_eq!(table.len(), 2);
        assert_eq!(summary, DedupSummary::default());
    }

    proptest! {
        #[test]
        fn output_identifiers_are_unique(
            seed in prop::collection::vec((0u8..5, 1u32..13), 0..40)
        ) {
            let rows = seed.iter().map(|(id, month)| {
                let mut rec = record(&format!("4512345678{id:02}"), "2020-01");
                rec.updated_at = Period::from_year_month(2020, *month).unwrap();
                rec
            }).collect();

            let (table, _) = drop_duplicates(Table::new(rows));
            let mut ids = HashSet::new();
            for rec in &table.rows {
                prop_assert!(ids.insert(rec.customer_id.clone()));
            }
        }
    }
}
