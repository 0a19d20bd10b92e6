//! Typed analysis configuration
//!
//! Command-line labels are validated here into an [`AnalysisConfig`] before
//! any log text is read. The format selects one parser strategy explicitly;
//! the log content is never sniffed to guess it.

use crate::domain::{ComplexityClass, ConfigError};
use crate::parser::{BlockParser, ParserOptions, RecordParser, SingleLineParser, TwoFieldParser};
use std::fmt;
use std::str::FromStr;

/// Default label for elapsed times when the caller gives none.
pub const DEFAULT_TIME_UNIT: &str = "ms";

/// Metrics of a block log and which one is analyzed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockLayout {
    /// Labels that must all appear in a stanza. Empty accepts any metric.
    pub metrics: Vec<String>,
    /// Metric whose value becomes `elapsed`. Defaults to the first required
    /// metric, or the first metric the log reports.
    pub select: Option<String>,
}

/// Log layout, one variant per parser strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Block(BlockLayout),
    TwoField,
    SingleLine,
}

impl LogFormat {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            LogFormat::Block(_) => "block",
            LogFormat::TwoField => "two_field",
            LogFormat::SingleLine => "single_line",
        }
    }
}

impl Default for LogFormat {
    fn default() -> Self {
        LogFormat::Block(BlockLayout::default())
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "block" => Ok(LogFormat::default()),
            "two_field" => Ok(LogFormat::TwoField),
            "single_line" => Ok(LogFormat::SingleLine),
            _ => Err(ConfigError::UnknownFormat { label: s.to_string() }),
        }
    }
}

/// Everything one analysis run needs besides the log text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub format: LogFormat,
    pub class: ComplexityClass,
    /// Label attached to elapsed times in reports.
    pub time_unit: String,
    pub parser: ParserOptions,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            class: ComplexityClass::default(),
            time_unit: DEFAULT_TIME_UNIT.to_string(),
            parser: ParserOptions::default(),
        }
    }
}

impl AnalysisConfig {
    #[must_use]
    pub fn new(format: LogFormat, class: ComplexityClass) -> Self {
        Self { format, class, ..Self::default() }
    }

    /// Build a configuration from user-facing labels.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownFormat`] or
    /// [`ConfigError::UnknownComplexityClass`] for unrecognized labels.
    pub fn from_labels(format: &str, class: &str, time_unit: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            format: format.parse()?,
            class: class.parse()?,
            time_unit: time_unit.to_string(),
            parser: ParserOptions::default(),
        })
    }

    /// Set the required metrics and the selected one for a block log.
    ///
    /// # Errors
    /// - [`ConfigError::MetricsRequireBlockFormat`] when the format is not
    ///   `block` and metrics were given
    /// - [`ConfigError::UnknownMetric`] when `select` is not in a non-empty
    ///   `metrics` list
    pub fn with_block_metrics(
        mut self,
        metrics: Vec<String>,
        select: Option<String>,
    ) -> Result<Self, ConfigError> {
        if !matches!(self.format, LogFormat::Block(_)) {
            if metrics.is_empty() && select.is_none() {
                return Ok(self);
            }
            return Err(ConfigError::MetricsRequireBlockFormat {
                format: self.format.label().to_string(),
            });
        }

        if let Some(label) = &select {
            if !metrics.is_empty() && !metrics.contains(label) {
                return Err(ConfigError::UnknownMetric { label: label.clone(), known: metrics });
            }
        }
        self.format = LogFormat::Block(BlockLayout { metrics, select });
        Ok(self)
    }

    #[must_use]
    pub fn with_parser_options(mut self, parser: ParserOptions) -> Self {
        self.parser = parser;
        self
    }

    /// The parser strategy for this configuration.
    #[must_use]
    pub fn parser(&self) -> Box<dyn RecordParser> {
        match &self.format {
            LogFormat::Block(layout) => Box::new(self.block_parser(layout)),
            LogFormat::TwoField => Box::new(TwoFieldParser::new(self.parser)),
            LogFormat::SingleLine => Box::new(SingleLineParser::new(self.parser)),
        }
    }

    /// The block parser, or `None` for the line-oriented formats.
    #[must_use]
    pub fn block(&self) -> Option<BlockParser> {
        match &self.format {
            LogFormat::Block(layout) => Some(self.block_parser(layout)),
            LogFormat::TwoField | LogFormat::SingleLine => None,
        }
    }

    fn block_parser(&self, layout: &BlockLayout) -> BlockParser {
        BlockParser::new(self.parser, layout.metrics.clone(), layout.select.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_format_labels() {
        assert_eq!("single_line".parse::<LogFormat>().unwrap(), LogFormat::SingleLine);
        assert_eq!("two-field".parse::<LogFormat>().unwrap(), LogFormat::TwoField);
        assert_eq!("BLOCK".parse::<LogFormat>().unwrap(), LogFormat::default());
        assert_eq!(
            "csv".parse::<LogFormat>().unwrap_err(),
            ConfigError::UnknownFormat { label: "csv".to_string() }
        );
    }

    #[test]
    fn test_from_labels() {
        let config = AnalysisConfig::from_labels("two_field", "linear", "s").unwrap();
        assert_eq!(config.format, LogFormat::TwoField);
        assert_eq!(config.class, ComplexityClass::Linear);
        assert_eq!(config.time_unit, "s");
        assert_eq!(config.parser().name(), "two_field");
    }

    #[test]
    fn test_unknown_class_is_rejected() {
        let err = AnalysisConfig::from_labels("block", "cubic", "ms").unwrap_err();
        assert_eq!(err, ConfigError::UnknownComplexityClass { label: "cubic".to_string() });
    }

    #[test]
    fn test_block_metrics() {
        let config = AnalysisConfig::default()
            .with_block_metrics(labels(&["cicloSuma", "cicloResta"]), Some("cicloResta".into()))
            .unwrap();
        let parser = config.block().unwrap();
        assert_eq!(parser.selected_metric(), Some("cicloResta"));
        assert_eq!(config.parser().name(), "block");
    }

    #[test]
    fn test_selected_metric_must_be_required() {
        let err = AnalysisConfig::default()
            .with_block_metrics(labels(&["cicloSuma"]), Some("cicloMult".into()))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownMetric {
                label: "cicloMult".to_string(),
                known: labels(&["cicloSuma"])
            }
        );
    }

    #[test]
    fn test_select_without_required_list() {
        let config =
            AnalysisConfig::default().with_block_metrics(Vec::new(), Some("sort".into())).unwrap();
        assert_eq!(config.block().unwrap().selected_metric(), Some("sort"));
    }

    #[test]
    fn test_metrics_need_block_format() {
        let config = AnalysisConfig::new(LogFormat::SingleLine, ComplexityClass::Linear);
        let err = config.clone().with_block_metrics(labels(&["sort"]), None).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MetricsRequireBlockFormat { format: "single_line".to_string() }
        );

        // No metrics at all is fine for any format
        assert!(config.with_block_metrics(Vec::new(), None).is_ok());
    }
}
