//! Report export
//!
//! Finished analyses leave the crate in two shapes: a pretty-printed JSON
//! document for other tools, and a plain-text summary for the terminal.

pub mod json_report;
pub mod text_report;

pub use json_report::{report_to_json, write_json_report, write_json_reports};
pub use text_report::render_report;
