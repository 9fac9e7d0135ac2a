//! Shared test data.

pub const SAMPLE_REPORT_JSON: &str = include_str!("fixtures/sample_report.json");
