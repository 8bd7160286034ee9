pub mod domain;
pub mod error;
pub mod schema;

pub use domain::{CustomerRecord, MissingCounts, NumericField, Period, Table};
pub use error::{CleanseError, IngestResult};
