//! Parsers for raw dataset rows.
//!
//! Dataset format and location stay out of scope for the pipeline proper;
//! this module only turns row-oriented JSON into the raw cell maps the
//! schema/coercion layer consumes.

pub mod json_parser;


pub use json_parser::{parse_rows_json, parse_rows_json_str};
