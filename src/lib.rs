//! Batch cleansing for telco subscriber records.
//!
//! The crate takes a raw tabular dataset of customer-period observations and
//! runs it through five sequential, single-threaded cleansing stages:
//! identifier validation, deduplication, missing-value resolution, IQR
//! outlier bounding, and categorical standardization. The output table
//! satisfies the invariants a downstream churn-modeling stage expects:
//! canonical identifiers, one row per customer, no missing essential fields,
//! bounded numerics, canonical category tokens.
//!
//! ```
//! use telco_cleanse::preprocessing::CleansePipeline;
//!
//! let json = r#"[{
//!     "UpdatedAt": 202006,
//!     "customerID": "451234567890",
//!     "gender": "Female",
//!     "SeniorCitizen": 0,
//!     "Partner": "Yes",
//!     "Dependents": "No",
//!     "tenure": 24,
//!     "PhoneService": "Yes",
//!     "MultipleLines": "No",
//!     "InternetService": "DSL",
//!     "OnlineSecurity": "Yes",
//!     "OnlineBackup": "No",
//!     "DeviceProtection": "Yes",
//!     "TechSupport": "No",
//!     "StreamingTV": "No",
//!     "StreamingMovies": "No",
//!     "Contract": "Month-to-month",
//!     "PaperlessBilling": "Yes",
//!     "PaymentMethod": "Electronic check",
//!     "MonthlyCharges": 29.85,
//!     "TotalCharges": 716.4,
//!     "Churn": "No"
//! }]"#;
//!
//! let result = CleansePipeline::new().process_json_str(json).unwrap();
//! assert_eq!(result.table.len(), 1);
//! assert_eq!(result.report.stages.len(), 5);
//! ```

pub mod core;
pub mod parsing;
pub mod preprocessing;
pub mod services;
pub mod transformations;

pub use crate::core::domain::{CustomerRecord, MissingCounts, NumericField, Period, Table};
pub use crate::core::error::CleanseError;
pub use crate::preprocessing::{cleanse_rows, CleanseConfig, CleansePipeline, CleanseResult};
