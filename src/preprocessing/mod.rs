pub mod pipeline;
pub mod report;

pub use pipeline::{cleanse_rows, CleanseConfig, CleansePipeline, CleanseResult};
pub use report::{CleanseReport, FieldProfile, StageReport};
