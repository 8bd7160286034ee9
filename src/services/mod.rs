pub mod stats;

pub use stats::{compute_stats, median, quantile_sorted, DescriptiveStats};
