//! Parse → build → analyze, as one sequential batch
//!
//! Each call is independent: it reads only the text and configuration it is
//! given and returns plain values.

use crate::analysis::{analyze_table, ComplexityAnalysis};
use crate::config::AnalysisConfig;
use crate::domain::{ComplexityClass, ConfigError, Observation, PipelineError};
use crate::parser::ParseDiagnostic;
use crate::table::{build_table, ObservationTable};
use log::{debug, info};

/// Result of analyzing one series of observations.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    /// Metric label for block logs, `None` for the line formats.
    pub series: Option<String>,
    pub class: ComplexityClass,
    pub time_unit: String,
    pub table: ObservationTable,
    pub analysis: ComplexityAnalysis,
    pub diagnostics: Vec<ParseDiagnostic>,
    pub duplicates_dropped: usize,
    pub lines_read: usize,
}

/// Analyze a log with the configured format and complexity class.
///
/// # Errors
/// Returns [`PipelineError::EmptyInput`] when no observation survives
/// parsing, with the line count and every diagnostic collected.
pub fn analyze_log(text: &str, config: &AnalysisConfig) -> Result<AnalysisReport, PipelineError> {
    let parser = config.parser();
    let outcome = parser.parse(text);
    info!(
        "{} parser: {} observation(s), {} diagnostic(s) over {} line(s)",
        parser.name(),
        outcome.observations.len(),
        outcome.diagnostics.len(),
        outcome.lines_read
    );

    if outcome.observations.is_empty() {
        return Err(PipelineError::EmptyInput {
            lines: outcome.lines_read,
            diagnostics: outcome.diagnostics,
        });
    }

    let series = config.block().and_then(|block| block.metric_for(text));
    analyze_observations(
        series,
        &outcome.observations,
        config,
        outcome.diagnostics,
        outcome.lines_read,
    )
}

/// Analyze every metric of a block log as its own series.
///
/// Reports come back in the order metric labels first appear in the log.
/// Each report carries the diagnostics of the whole parse.
///
/// # Errors
/// - [`PipelineError::Config`] when the configured format is not `block`
/// - [`PipelineError::EmptyInput`] when no stanza completed
pub fn analyze_block_series(
    text: &str,
    config: &AnalysisConfig,
) -> Result<Vec<AnalysisReport>, PipelineError> {
    let block = config.block().ok_or_else(|| ConfigError::MetricsRequireBlockFormat {
        format: config.format.label().to_string(),
    })?;
    let outcome = block.parse_series(text);
    info!(
        "block parser: {} metric series, {} diagnostic(s) over {} line(s)",
        outcome.series.len(),
        outcome.diagnostics.len(),
        outcome.lines_read
    );

    if outcome.series.is_empty() {
        return Err(PipelineError::EmptyInput {
            lines: outcome.lines_read,
            diagnostics: outcome.diagnostics,
        });
    }

    outcome
        .series
        .iter()
        .map(|series| {
            analyze_observations(
                Some(series.label.clone()),
                &series.observations,
                config,
                outcome.diagnostics.clone(),
                outcome.lines_read,
            )
        })
        .collect()
}

fn analyze_observations(
    series: Option<String>,
    observations: &[Observation],
    config: &AnalysisConfig,
    diagnostics: Vec<ParseDiagnostic>,
    lines_read: usize,
) -> Result<AnalysisReport, PipelineError> {
    let build = build_table(observations, config.class)?;
    debug!(
        "table for {}: {} entr(ies), {} duplicate(s) dropped",
        series.as_deref().unwrap_or("log"),
        build.table.len(),
        build.duplicates_dropped
    );

    let analysis = analyze_table(&build.table)?;
    info!(
        "{} under {}: consistency {}, stability {}",
        series.as_deref().unwrap_or("log"),
        config.class,
        analysis.consistency_label(),
        analysis.stability_label()
    );

    Ok(AnalysisReport {
        series,
        class: config.class,
        time_unit: config.time_unit.clone(),
        table: build.table,
        analysis,
        diagnostics,
        duplicates_dropped: build.duplicates_dropped,
        lines_read,
    })
}
