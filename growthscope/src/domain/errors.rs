//! Structured error types for growthscope
//!
//! Using thiserror for automatic Display implementation and error chaining.
//! Every variant carries the counts or labels a caller needs to react
//! programmatically, not just a message to print.

use super::types::ComplexityClass;
use crate::parser::ParseDiagnostic;
use thiserror::Error;

/// Invalid analysis configuration, rejected before any parsing happens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown log format '{label}' (expected block, two_field or single_line)")]
    UnknownFormat { label: String },

    #[error(
        "Unknown complexity class '{label}' (expected linear, logarithmic, loglinear or quadratic)"
    )]
    UnknownComplexityClass { label: String },

    #[error("Selected metric '{label}' is not one of the required metrics {known:?}")]
    UnknownMetric { label: String, known: Vec<String> },

    #[error("Metric selection only applies to the block format, not '{format}'")]
    MetricsRequireBlockFormat { format: String },
}

/// Violation of the observation table invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("Sizes must be strictly increasing: entry {index} has size {size} after {previous}")]
    NotStrictlyIncreasing { index: usize, previous: u64, size: u64 },
}

/// Why a statistic or verdict could not be computed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Cannot analyze an empty observation table")]
    EmptyTable,

    #[error("Growth verdict needs at least {required} records, found {count}")]
    InsufficientData { count: usize, required: usize },

    #[error("Reference function of {class} is zero at size {size}")]
    DegenerateReference { class: ComplexityClass, size: u64 },

    #[error("First record (size {size}) took zero time, observed growth is undefined")]
    ZeroBaseline { size: u64 },

    #[error("Stability needs at least {required} eligible complexity ratios, found {eligible}")]
    InsufficientRatios { eligible: usize, required: usize },

    #[error("Mean complexity ratio is zero, coefficient of variation is undefined")]
    ZeroRatioMean,
}

/// Terminal failures of a full parse → build → analyze run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error(
        "No observations survived parsing ({lines} lines read, {} skipped with diagnostics)",
        .diagnostics.len()
    )]
    EmptyInput { lines: usize, diagnostics: Vec<ParseDiagnostic> },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write report: {0}")]
    WriteFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::UnknownFormat { label: "csv".to_string() };
        assert!(err.to_string().contains("'csv'"));
    }

    #[test]
    fn test_unknown_metric_lists_known() {
        let err = ConfigError::UnknownMetric {
            label: "cicloDivision".to_string(),
            known: vec!["cicloSuma".to_string(), "cicloResta".to_string()],
        };
        assert!(err.to_string().contains("cicloDivision"));
        assert!(err.to_string().contains("cicloSuma"));
    }

    #[test]
    fn test_empty_input_reports_counts() {
        let err = PipelineError::EmptyInput { lines: 12, diagnostics: Vec::new() };
        assert_eq!(
            err.to_string(),
            "No observations survived parsing (12 lines read, 0 skipped with diagnostics)"
        );
    }

    #[test]
    fn test_insufficient_data_display() {
        let err = AnalysisError::InsufficientData { count: 1, required: 2 };
        assert_eq!(err.to_string(), "Growth verdict needs at least 2 records, found 1");
    }
}
