//! The cleansing stages.
//!
//! Each stage is a pure `Table -> Table` transform (plus a scalar summary
//! where the stage has one), applied once, in fixed order:
//!
//! - [`ids`]: keep only rows with a canonically formatted identifier
//! - [`dedup`]: drop exact duplicates, keep the most recent row per identifier
//! - [`missing`]: drop unlabeled rows, impute missing numerics
//! - [`outliers`]: clamp numerics into their IQR-derived bounds
//! - [`standardize`]: rewrite non-canonical category tokens

pub mod dedup;
pub mod ids;
pub mod missing;
pub mod outliers;
pub mod standardize;

pub use dedup::{drop_duplicates, DedupSummary};
pub use ids::{filter_valid_ids, is_valid_id};
pub use missing::{resolve_missing, MissingSummary, DEFAULT_TENURE_FILL};
pub use outliers::{bound_outliers, FieldBounds};
pub use standardize::{standardize_categories, CanonicalMap, Replacement};
