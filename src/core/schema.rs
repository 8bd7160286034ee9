//! Declared column schema and ingestion-boundary coercion.
//!
//! The raw input is row-oriented JSON; every cell is validated and coerced to
//! its declared semantic type exactly once, here, so the stages downstream
//! never have to reason about dynamic typing. A missing declared column is
//! fatal before any stage runs; an uncoercible cell aborts the whole run.

use serde_json::{Map, Value};

use crate::core::domain::{CustomerRecord, Period, Table};
use crate::core::error::{CleanseError, IngestResult};

/// Column names of the fixed 22-column subscriber schema.
pub mod columns {
    pub const UPDATED_AT: &str = "UpdatedAt";
    pub const CUSTOMER_ID: &str = "customerID";
    pub const GENDER: &str = "gender";
    pub const SENIOR_CITIZEN: &str = "SeniorCitizen";
    pub const PARTNER: &str = "Partner";
    pub const DEPENDENTS: &str = "Dependents";
    pub const TENURE: &str = "tenure";
    pub const PHONE_SERVICE: &str = "PhoneService";
    pub const MULTIPLE_LINES: &str = "MultipleLines";
    pub const INTERNET_SERVICE: &str = "InternetService";
    pub const ONLINE_SECURITY: &str = "OnlineSecurity";
    pub const ONLINE_BACKUP: &str = "OnlineBackup";
    pub const DEVICE_PROTECTION: &str = "DeviceProtection";
    pub const TECH_SUPPORT: &str = "TechSupport";
    pub const STREAMING_TV: &str = "StreamingTV";
    pub const STREAMING_MOVIES: &str = "StreamingMovies";
    pub const CONTRACT: &str = "Contract";
    pub const PAPERLESS_BILLING: &str = "PaperlessBilling";
    pub const PAYMENT_METHOD: &str = "PaymentMethod";
    pub const MONTHLY_CHARGES: &str = "MonthlyCharges";
    pub const TOTAL_CHARGES: &str = "TotalCharges";
    pub const CHURN: &str = "Churn";
}

/// Semantic type of a column, driving coercion at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    OptionalText,
    PeriodMarker,
    OptionalInteger,
    OptionalDecimal,
}

impl ColumnType {
    pub fn expected(self) -> &'static str {
        match self {
            ColumnType::Text => "string",
            ColumnType::OptionalText => "string or null",
            ColumnType::PeriodMarker => "period marker (YYYYMM or \"YYYY-MM\")",
            ColumnType::OptionalInteger => "integer or null",
            ColumnType::OptionalDecimal => "decimal or null",
        }
    }
}

/// The declared schema: every column with its semantic type.
pub const COLUMNS: [(&str, ColumnType); 22] = [
    (columns::UPDATED_AT, ColumnType::PeriodMarker),
    (columns::CUSTOMER_ID, ColumnType::Text),
    (columns::GENDER, ColumnType::Text),
    (columns::SENIOR_CITIZEN, ColumnType::Text),
    (columns::PARTNER, ColumnType::Text),
    (columns::DEPENDENTS, ColumnType::Text),
    (columns::TENURE, ColumnType::OptionalInteger),
    (columns::PHONE_SERVICE, ColumnType::Text),
    (columns::MULTIPLE_LINES, ColumnType::Text),
    (columns::INTERNET_SERVICE, ColumnType::Text),
    (columns::ONLINE_SECURITY, ColumnType::Text),
    (columns::ONLINE_BACKUP, ColumnType::Text),
    (columns::DEVICE_PROTECTION, ColumnType::Text),
    (columns::TECH_SUPPORT, ColumnType::Text),
    (columns::STREAMING_TV, ColumnType::Text),
    (columns::STREAMING_MOVIES, ColumnType::Text),
    (columns::CONTRACT, ColumnType::Text),
    (columns::PAPERLESS_BILLING, ColumnType::Text),
    (columns::PAYMENT_METHOD, ColumnType::Text),
    (columns::MONTHLY_CHARGES, ColumnType::OptionalDecimal),
    (columns::TOTAL_CHARGES, ColumnType::OptionalDecimal),
    (columns::CHURN, ColumnType::OptionalText),
];

pub const COLUMN_COUNT: usize = COLUMNS.len();

/// Looks up the declared type of a column.
pub fn column_type(column: &str) -> Option<ColumnType> {
    COLUMNS
        .iter()
        .find(|(name, _)| *name == column)
        .map(|(_, ty)| *ty)
}

/// True for columns whose cells are strings (identifier, categoricals and
/// the outcome label).
pub fn is_text_column(column: &str) -> bool {
    matches!(
        column_type(column),
        Some(ColumnType::Text | ColumnType::OptionalText)
    )
}

/// Verifies the declared columns are present, keyed off the first row.
///
/// Empty input passes vacuously and flows through the pipeline as an empty
/// table. A key absent from a later row is treated as a missing value by the
/// coercion layer, not as a schema violation.
pub fn check_schema(rows: &[Map<String, Value>]) -> IngestResult<()> {
    let Some(first) = rows.first() else {
        return Ok(());
    };
    for (name, _) in &COLUMNS {
        if !first.contains_key(*name) {
            return Err(CleanseError::MissingColumn((*name).to_string()));
        }
    }
    Ok(())
}

/// Coerces raw rows into the typed table.
pub fn coerce_rows(rows: Vec<Map<String, Value>>) -> IngestResult<Table> {
    let mut records = Vec::with_capacity(rows.len());
    for (row, raw) in rows.iter().enumerate() {
        records.push(coerce_row(row, raw)?);
    }
    Ok(Table::new(records))
}

fn coerce_row(row: usize, raw: &Map<String, Value>) -> IngestResult<CustomerRecord> {
    Ok(CustomerRecord {
        customer_id: required_text(row, raw, columns::CUSTOMER_ID)?,
        updated_at: period_marker(row, raw, columns::UPDATED_AT)?,
        gender: required_text(row, raw, columns::GENDER)?,
        senior_citizen: required_text(row, raw, columns::SENIOR_CITIZEN)?,
        partner: required_text(row, raw, columns::PARTNER)?,
        dependents: required_text(row, raw, columns::DEPENDENTS)?,
        tenure: optional_integer(row, raw, columns::TENURE)?,
        phone_service: required_text(row, raw, columns::PHONE_SERVICE)?,
        multiple_lines: required_text(row, raw, columns::MULTIPLE_LINES)?,
        internet_service: required_text(row, raw, columns::INTERNET_SERVICE)?,
        online_security: required_text(row, raw, columns::ONLINE_SECURITY)?,
        online_backup: required_text(row, raw, columns::ONLINE_BACKUP)?,
        device_protection: required_text(row, raw, columns::DEVICE_PROTECTION)?,
        tech_support: required_text(row, raw, columns::TECH_SUPPORT)?,
        streaming_tv: required_text(row, raw, columns::STREAMING_TV)?,
        streaming_movies: required_text(row, raw, columns::STREAMING_MOVIES)?,
        contract: required_text(row, raw, columns::CONTRACT)?,
        paperless_billing: required_text(row, raw, columns::PAPERLESS_BILLING)?,
        payment_method: required_text(row, raw, columns::PAYMENT_METHOD)?,
        monthly_charges: optional_decimal(row, raw, columns::MONTHLY_CHARGES)?,
        total_charges: optional_decimal(row, raw, columns::TOTAL_CHARGES)?,
        churn: optional_text(row, raw, columns::CHURN)?,
    })
}

fn coercion_error(
    row: usize,
    column: &str,
    raw: Option<&Value>,
    expected: &'static str,
) -> CleanseError {
    CleanseError::TypeCoercion {
        row,
        column: column.to_string(),
        value: match raw {
            None => "<absent>".to_string(),
            Some(v) => v.to_string(),
        },
        expected,
    }
}

/// Scalar-to-string coercion: identifiers and categoricals may arrive as
/// numbers (`SeniorCitizen` is 0/1 in the source data) or booleans.
fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        _ => None,
    }
}

fn required_text(row: usize, raw: &Map<String, Value>, column: &str) -> IngestResult<String> {
    raw.get(column).and_then(text_value).ok_or_else(|| {
        coercion_error(row, column, raw.get(column), ColumnType::Text.expected())
    })
}

fn optional_text(
    row: usize,
    raw: &Map<String, Value>,
    column: &str,
) -> IngestResult<Option<String>> {
    match raw.get(column) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => match text_value(value) {
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => Ok(Some(s)),
            None => Err(coercion_error(
                row,
                column,
                Some(value),
                ColumnType::OptionalText.expected(),
            )),
        },
    }
}

/// Outer `None`: uncoercible. Inner `None`: missing (null or blank string).
fn numeric_value(value: &Value) -> Option<Option<f64>> {
    match value {
        Value::Null => Some(None),
        Value::Number(n) => n.as_f64().map(Some),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(None)
            } else {
                trimmed.parse::<f64>().ok().map(Some)
            }
        }
        _ => None,
    }
}

fn optional_decimal(
    row: usize,
    raw: &Map<String, Value>,
    column: &str,
) -> IngestResult<Option<f64>> {
    match raw.get(column) {
        None => Ok(None),
        Some(value) => numeric_value(value).ok_or_else(|| {
            coercion_error(row, column, Some(value), ColumnType::OptionalDecimal.expected())
        }),
    }
}

fn optional_integer(
    row: usize,
    raw: &Map<String, Value>,
    column: &str,
) -> IngestResult<Option<f64>> {
    match raw.get(column) {
        None => Ok(None),
        Some(value) => {
            let expected = ColumnType::OptionalInteger.expected();
            let parsed = numeric_value(value)
                .ok_or_else(|| coercion_error(row, column, Some(value), expected))?;
            match parsed {
                Some(v) if v.fract() != 0.0 => {
                    Err(coercion_error(row, column, Some(value), expected))
                }
                other => Ok(other),
            }
        }
    }
}

fn period_marker(row: usize, raw: &Map<String, Value>, column: &str) -> IngestResult<Period> {
    let value = raw.get(column);
    let parsed = match value {
        Some(Value::Number(n)) => n.as_i64().and_then(Period::from_ordinal),
        Some(Value::String(s)) => Period::parse(s),
        _ => None,
    };
    parsed.ok_or_else(|| coercion_error(row, column, value, ColumnType::PeriodMarker.expected()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_row() -> Map<String, Value> {
        json!({
            "UpdatedAt": 202006,
            "customerID": "451234567890",
            "gender": "Female",
            "SeniorCitizen": 0,
            "Partner": "Yes",
            "Dependents": "No",
            "tenure": 24,
            "PhoneService": "Yes",
            "MultipleLines": "No",
            "InternetService": "DSL",
            "OnlineSecurity": "Yes",
            "OnlineBackup": "No",
            "DeviceProtection": "Yes",
            "TechSupport": "No",
            "StreamingTV": "No",
            "StreamingMovies": "No",
            "Contract": "Month-to-month",
            "PaperlessBilling": "Yes",
            "PaymentMethod": "Electronic check",
            "MonthlyCharges": 29.85,
            "TotalCharges": 716.4,
            "Churn": "No"
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[test]
    fn schema_check_accepts_complete_rows() {
        assert!(check_schema(&[raw_row()]).is_ok());
        assert!(check_schema(&[]).is_ok());
    }

    #[test]
    fn schema_check_reports_missing_column() {
        let mut row = raw_row();
        row.remove("Churn");
        let err = check_schema(&[row]).unwrap_err();
        assert!(matches!(err, CleanseError::MissingColumn(c) if c == "Churn"));
    }

    #[test]
    fn coerces_scalars_to_text() {
        let table = coerce_rows(vec![raw_row()]).unwrap();
        let rec = &table.rows[0];
        assert_eq!(rec.customer_id, "451234567890");
        assert_eq!(rec.senior_citizen, "0");
        assert_eq!(rec.tenure, Some(24.0));
        assert_eq!(rec.churn.as_deref(), Some("No"));
    }

    #[test]
    fn coerces_numeric_identifier_to_string() {
        let mut row = raw_row();
        row.insert("customerID".into(), json!(451234567890i64));
        let table = coerce_rows(vec![row]).unwrap();
        assert_eq!(table.rows[0].customer_id, "451234567890");
    }

    #[test]
    fn null_and_blank_cells_become_missing() {
        let mut row = raw_row();
        row.insert("tenure".into(), Value::Null);
        row.insert("TotalCharges".into(), json!("  "));
        row.insert("Churn".into(), Value::Null);
        let table = coerce_rows(vec![row]).unwrap();
        let rec = &table.rows[0];
        assert_eq!(rec.tenure, None);
        assert_eq!(rec.total_charges, None);
        assert_eq!(rec.churn, None);
    }

    #[test]
    fn numeric_strings_parse_as_decimals() {
        let mut row = raw_row();
        row.insert("TotalCharges".into(), json!("716.4"));
        let table = coerce_rows(vec![row]).unwrap();
        assert_eq!(table.rows[0].total_charges, Some(716.4));
    }

    #[test]
    fn fractional_tenure_is_a_coercion_error() {
        let mut row = raw_row();
        row.insert("tenure".into(), json!(3.5));
        let err = coerce_rows(vec![row]).unwrap_err();
        match err {
            CleanseError::TypeCoercion { row, column, .. } => {
                assert_eq!(row, 0);
                assert_eq!(column, "tenure");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_numeric_charge_is_a_coercion_error() {
        let mut row = raw_row();
        row.insert("MonthlyCharges".into(), json!("a lot"));
        assert!(coerce_rows(vec![row]).is_err());
    }

    #[test]
    fn period_accepts_both_source_formats() {
        let mut row = raw_row();
        row.insert("UpdatedAt".into(), json!("2020-06"));
        let table = coerce_rows(vec![row]).unwrap();
        assert_eq!(table.rows[0].updated_at.to_string(), "2020-06");

        let mut row = raw_row();
        row.insert("UpdatedAt".into(), json!(202013));
        assert!(coerce_rows(vec![row]).is_err());
    }
}
