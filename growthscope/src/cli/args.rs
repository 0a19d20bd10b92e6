//! CLI argument definitions

use crate::config::{AnalysisConfig, LogFormat, DEFAULT_TIME_UNIT};
use crate::domain::ConfigError;
use crate::parser::ParserOptions;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "growthscope",
    version,
    about = "Check benchmark logs against a declared complexity class",
    after_help = "\
EXAMPLES:
    growthscope results.txt --format single_line --class loglinear
    growthscope trials.txt --metric cicloSuma --metric cicloResta --select cicloResta
    growthscope trials.txt --all-metrics --class linear --unit s
    growthscope sort.txt --format two_field --class quadratic --export report.json"
)]
pub struct Args {
    /// Benchmark log to analyze
    #[arg(value_name = "LOG")]
    pub log: PathBuf,

    /// Log layout: block, two_field or single_line
    #[arg(short, long, default_value = "block")]
    pub format: String,

    /// Expected complexity class: linear, logarithmic, loglinear or quadratic
    #[arg(short, long, default_value = "loglinear")]
    pub class: String,

    /// Unit label for elapsed times
    #[arg(short, long, default_value = DEFAULT_TIME_UNIT)]
    pub unit: String,

    /// Metric every block stanza must report (repeatable)
    #[arg(short, long = "metric", value_name = "LABEL")]
    pub metrics: Vec<String>,

    /// Metric analyzed in block logs (default: first --metric)
    #[arg(short, long, value_name = "LABEL")]
    pub select: Option<String>,

    /// Analyze every metric of a block log as its own series
    #[arg(long, conflicts_with = "select")]
    pub all_metrics: bool,

    /// Skip unmatched lines up to N characters without a diagnostic
    #[arg(long, value_name = "N", default_value = "0")]
    pub quiet_line_len: usize,

    /// Export the report as JSON
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Validate the label arguments into an analysis configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError`] for an unknown format, class or metric, or
    /// for metric options used with a line format.
    pub fn to_config(&self) -> Result<AnalysisConfig, ConfigError> {
        let config = AnalysisConfig::from_labels(&self.format, &self.class, &self.unit)?;
        if self.all_metrics && !matches!(config.format, LogFormat::Block(_)) {
            return Err(ConfigError::MetricsRequireBlockFormat {
                format: config.format.label().to_string(),
            });
        }
        Ok(config
            .with_block_metrics(self.metrics.clone(), self.select.clone())?
            .with_parser_options(ParserOptions { quiet_line_len: self.quiet_line_len }))
    }
}
