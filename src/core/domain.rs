//! Domain models for subscriber records and data-collection periods.
//!
//! This module provides the core data structures the cleansing stages operate
//! on: a month-precision [`Period`] marker, the typed 22-column
//! [`CustomerRecord`], and the [`Table`] that flows through the pipeline.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::schema;

/// A data-collection period at month precision.
///
/// Periods order chronologically, which is what the deduplicator relies on to
/// keep the most recent observation per customer. Internally the period is a
/// date pinned to the first day of the month.
///
/// # Examples
///
/// ```
/// use telco_cleanse::core::domain::Period;
///
/// let may = Period::parse("2020-05").unwrap();
/// let june = Period::from_ordinal(202006).unwrap();
/// assert!(june > may);
/// assert_eq!(june.to_string(), "2020-06");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period(NaiveDate);

impl Period {
    /// Creates a period from a year and a 1-based month.
    ///
    /// Returns `None` when the month is out of range.
    pub fn from_year_month(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Period)
    }

    /// Creates a period from the `YYYYMM` ordinal form the source dataset
    /// uses (e.g. `202006`).
    pub fn from_ordinal(value: i64) -> Option<Self> {
        let year = i32::try_from(value / 100).ok()?;
        let month = u32::try_from(value % 100).ok()?;
        Self::from_year_month(year, month)
    }

    /// Parses `"YYYY-MM"` or `"YYYYMM"`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some((year, month)) = s.split_once('-') {
            return Self::from_year_month(year.parse().ok()?, month.parse().ok()?);
        }
        s.parse::<i64>().ok().and_then(Self::from_ordinal)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

/// The three numeric fields the resolver and bounder operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NumericField {
    Tenure,
    MonthlyCharges,
    TotalCharges,
}

impl NumericField {
    pub const ALL: [NumericField; 3] = [
        NumericField::Tenure,
        NumericField::MonthlyCharges,
        NumericField::TotalCharges,
    ];

    pub fn column_name(self) -> &'static str {
        match self {
            NumericField::Tenure => schema::columns::TENURE,
            NumericField::MonthlyCharges => schema::columns::MONTHLY_CHARGES,
            NumericField::TotalCharges => schema::columns::TOTAL_CHARGES,
        }
    }

    pub fn get(self, record: &CustomerRecord) -> Option<f64> {
        match self {
            NumericField::Tenure => record.tenure,
            NumericField::MonthlyCharges => record.monthly_charges,
            NumericField::TotalCharges => record.total_charges,
        }
    }

    pub fn set(self, record: &mut CustomerRecord, value: f64) {
        match self {
            NumericField::Tenure => record.tenure = Some(value),
            NumericField::MonthlyCharges => record.monthly_charges = Some(value),
            NumericField::TotalCharges => record.total_charges = Some(value),
        }
    }
}

/// One customer-period observation with the fixed 22-column telco schema.
///
/// Categorical attributes stay `String` because the normalizer has to accept
/// non-canonical spellings before it rewrites them; the nullable fields
/// (`tenure`, the two charge columns, `Churn`) are the only ones the resolver
/// is allowed to find missing. `tenure` carries an integer-months semantic at
/// ingestion but is stored as `f64` since IQR clipping produces fractional
/// bounds.
///
/// Serde field names match the source dataset's column headers so a cleansed
/// table serializes with the same schema it was ingested with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    #[serde(rename = "customerID")]
    pub customer_id: String,
    #[serde(rename = "UpdatedAt")]
    pub updated_at: Period,
    pub gender: String,
    #[serde(rename = "SeniorCitizen")]
    pub senior_citizen: String,
    #[serde(rename = "Partner")]
    pub partner: String,
    #[serde(rename = "Dependents")]
    pub dependents: String,
    pub tenure: Option<f64>,
    #[serde(rename = "PhoneService")]
    pub phone_service: String,
    #[serde(rename = "MultipleLines")]
    pub multiple_lines: String,
    #[serde(rename = "InternetService")]
    pub internet_service: String,
    #[serde(rename = "OnlineSecurity")]
    pub online_security: String,
    #[serde(rename = "OnlineBackup")]
    pub online_backup: String,
    #[serde(rename = "DeviceProtection")]
    pub device_protection: String,
    #[serde(rename = "TechSupport")]
    pub tech_support: String,
    #[serde(rename = "StreamingTV")]
    pub streaming_tv: String,
    #[serde(rename = "StreamingMovies")]
    pub streaming_movies: String,
    #[serde(rename = "Contract")]
    pub contract: String,
    #[serde(rename = "PaperlessBilling")]
    pub paperless_billing: String,
    #[serde(rename = "PaymentMethod")]
    pub payment_method: String,
    #[serde(rename = "MonthlyCharges")]
    pub monthly_charges: Option<f64>,
    #[serde(rename = "TotalCharges")]
    pub total_charges: Option<f64>,
    #[serde(rename = "Churn")]
    pub churn: Option<String>,
}

impl CustomerRecord {
    /// Mutable references to every always-present string cell of the row,
    /// identifier included. The normalizer walks these to apply its global
    /// value replace; the optional `Churn` cell is handled separately.
    pub fn text_cells_mut(&mut self) -> [&mut String; 17] {
        [
            &mut self.customer_id,
            &mut self.gender,
            &mut self.senior_citizen,
            &mut self.partner,
            &mut self.dependents,
            &mut self.phone_service,
            &mut self.multiple_lines,
            &mut self.internet_service,
            &mut self.online_security,
            &mut self.online_backup,
            &mut self.device_protection,
            &mut self.tech_support,
            &mut self.streaming_tv,
            &mut self.streaming_movies,
            &mut self.contract,
            &mut self.paperless_billing,
            &mut self.payment_method,
        ]
    }

    /// Read access to a string cell by column name, `None` for numeric and
    /// period columns or for a missing `Churn` value.
    pub fn text_cell(&self, column: &str) -> Option<&str> {
        use crate::core::schema::columns as c;
        match column {
            c::CUSTOMER_ID => Some(&self.customer_id),
            c::GENDER => Some(&self.gender),
            c::SENIOR_CITIZEN => Some(&self.senior_citizen),
            c::PARTNER => Some(&self.partner),
            c::DEPENDENTS => Some(&self.dependents),
            c::PHONE_SERVICE => Some(&self.phone_service),
            c::MULTIPLE_LINES => Some(&self.multiple_lines),
            c::INTERNET_SERVICE => Some(&self.internet_service),
            c::ONLINE_SECURITY => Some(&self.online_security),
            c::ONLINE_BACKUP => Some(&self.online_backup),
            c::DEVICE_PROTECTION => Some(&self.device_protection),
            c::TECH_SUPPORT => Some(&self.tech_support),
            c::STREAMING_TV => Some(&self.streaming_tv),
            c::STREAMING_MOVIES => Some(&self.streaming_movies),
            c::CONTRACT => Some(&self.contract),
            c::PAPERLESS_BILLING => Some(&self.paperless_billing),
            c::PAYMENT_METHOD => Some(&self.payment_method),
            c::CHURN => self.churn.as_deref(),
            _ => None,
        }
    }
}

/// Missing-value counts for the nullable fields, reported before and after
/// the pipeline runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MissingCounts {
    pub tenure: usize,
    pub monthly_charges: usize,
    pub total_charges: usize,
    pub churn: usize,
}

impl MissingCounts {
    pub fn total(&self) -> usize {
        self.tenure + self.monthly_charges + self.total_charges + self.churn
    }
}

/// An ordered collection of records sharing the fixed schema.
///
/// The table is created once at the ingestion boundary and owned exclusively
/// by the pipeline while stages run; each stage consumes it and returns the
/// next snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<CustomerRecord>,
}

impl Table {
    pub fn new(rows: Vec<CustomerRecord>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns in the fixed schema.
    pub fn column_count(&self) -> usize {
        schema::COLUMN_COUNT
    }

    /// Count of distinct identifiers currently in the table.
    pub fn unique_id_count(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.customer_id.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Missing-value counts across the nullable fields.
    pub fn missing_counts(&self) -> MissingCounts {
        let mut counts = MissingCounts::default();
        for rec in &self.rows {
            if rec.tenure.is_none() {
                counts.tenure += 1;
            }
            if rec.monthly_charges.is_none() {
                counts.monthly_charges += 1;
            }
            if rec.total_charges.is_none() {
                counts.total_charges += 1;
            }
            if rec.churn.is_none() {
                counts.churn += 1;
            }
        }
        counts
    }

    /// Distribution of values in a string column, missing cells excluded.
    ///
    /// Returns `None` when the column is not a string column of the schema.
    /// Useful for spotting non-standard category spellings before and after
    /// normalization.
    pub fn value_counts(&self, column: &str) -> Option<BTreeMap<String, usize>> {
        if !schema::is_text_column(column) {
            return None;
        }
        let mut counts = BTreeMap::new();
        for rec in &self.rows {
            if let Some(value) = rec.text_cell(column) {
                *counts.entry(value.to_string()).or_insert(0) += 1;
            }
        }
        Some(counts)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::record;
    use super::*;

    #[test]
    fn period_parsing_and_ordering() {
        let may = Period::parse("2020-05").unwrap();
        let june = Period::parse("202006").unwrap();
        assert!(june > may);
        assert_eq!(may.year(), 2020);
        assert_eq!(may.month(), 5);
        assert_eq!(june.to_string(), "2020-06");
    }

    #[test]
    fn period_rejects_invalid_months() {
        assert!(Period::from_ordinal(202013).is_none());
        assert!(Period::from_ordinal(202000).is_none());
        assert!(Period::parse("2020-13").is_none());
        assert!(Period::parse("not a period").is_none());
    }

    #[test]
    fn missing_counts_cover_all_nullable_fields() {
        let mut a = record("451234567890", "2020-06");
        a.tenure = None;
        a.churn = None;
        let mut b = record("451234567891", "2020-06");
        b.monthly_charges = None;
        b.total_charges = None;

        let counts = Table::new(vec![a, b]).missing_counts();
        assert_eq!(counts.tenure, 1);
        assert_eq!(counts.monthly_charges, 1);
        assert_eq!(counts.total_charges, 1);
        assert_eq!(counts.churn, 1);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn unique_id_count_ignores_repeats() {
        let rows = vec![
            record("451234567890", "2020-05"),
            record("451234567890", "2020-06"),
            record("451234567891", "2020-06"),
        ];
        assert_eq!(Table::new(rows).unique_id_count(), 2);
    }

    #[test]
    fn value_counts_only_for_text_columns() {
        let mut a = record("451234567890", "2020-06");
        a.gender = "Wanita".into();
        let b = record("451234567891", "2020-06");

        let table = Table::new(vec![a, b]);
        let counts = table.value_counts("gender").unwrap();
        assert_eq!(counts.get("Wanita"), Some(&1));
        assert_eq!(counts.get("Female"), Some(&1));
        assert!(table.value_counts("tenure").is_none());
        assert!(table.value_counts("no-such-column").is_none());
    }

    #[test]
    fn value_counts_skips_missing_churn() {
        let mut a = record("451234567890", "2020-06");
        a.churn = None;
        let b = record("451234567891", "2020-06");

        let counts = Table::new(vec![a, b]).value_counts("Churn").unwrap();
        assert_eq!(counts.get("No"), Some(&1));
        assert_eq!(counts.len(), 1);
    }
}
