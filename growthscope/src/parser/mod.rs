//! Record parsing for benchmark logs
//!
//! Turns raw log text into an ordered sequence of [`Observation`]s. Each
//! supported layout is a separate [`RecordParser`] strategy:
//!
//! - [`BlockParser`]: a `n = <int>` header followed by one line per metric
//!   (`<label> took <float> <unit> to run`)
//! - [`TwoFieldParser`]: `Size: <int> items` with `Total time: <float> ms`
//!   on the same or the next line
//! - [`SingleLineParser`]: `Size: <int> items | Time: <float> ms`
//!
//! All strategies also accept the Spanish labels some harnesses print
//! (`Tamaño`, `elementos`, `Tiempo`, `le tomó`, `ejecutarse`).
//!
//! Lines that cannot be used never abort the parse. They are collected as
//! [`ParseDiagnostic`]s and returned next to the observations.
//!
//! Records are emitted in the order the log presents the field that
//! completes them; sorting by size is the table builder's job.

pub mod block;
pub mod single_line;
pub mod two_field;

pub use block::{BlockParser, MetricSeries, SeriesOutcome, Stanza};
pub use single_line::SingleLineParser;
pub use two_field::TwoFieldParser;

use crate::domain::Observation;
use log::debug;
use serde::Serialize;
use std::fmt;

/// Options shared by every parser strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserOptions {
    /// Unmatched lines whose trimmed length is at most this many characters
    /// are skipped without a diagnostic. `0` reports every unmatched line.
    pub quiet_line_len: usize,
}

/// Why a line was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticReason {
    /// The line matched none of the patterns of the selected format.
    Unmatched,
    /// A matched numeric token could not be converted.
    InvalidNumber { token: String },
    /// A block header whose stanza ended before all metrics were seen.
    IncompleteStanza { size: u64, missing: Vec<String> },
    /// A size line with no time on the same or the following line.
    IncompleteRecord { size: u64 },
    /// A time or metric line with no size to attach it to.
    OrphanField,
    /// A metric expressed in a different unit than the rest of the log.
    UnitMismatch { expected: String, found: String },
}

impl fmt::Display for DiagnosticReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticReason::Unmatched => f.write_str("line does not match the expected format"),
            DiagnosticReason::InvalidNumber { token } => {
                write!(f, "could not convert '{token}' to a number")
            }
            DiagnosticReason::IncompleteStanza { size, missing } => {
                write!(f, "stanza for n = {size} is missing {}", missing.join(", "))
            }
            DiagnosticReason::IncompleteRecord { size } => {
                write!(f, "size {size} has no time on this or the next line")
            }
            DiagnosticReason::OrphanField => f.write_str("field has no size to attach to"),
            DiagnosticReason::UnitMismatch { expected, found } => {
                write!(f, "unit '{found}' differs from '{expected}' used earlier")
            }
        }
    }
}

/// A skipped line, reported instead of aborting the parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseDiagnostic {
    /// 1-based line number.
    pub line: usize,
    /// Raw text of the line.
    pub text: String,
    pub reason: DiagnosticReason,
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} ({})", self.line, self.reason, self.text.trim())
    }
}

/// Result of parsing one log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    pub observations: Vec<Observation>,
    pub diagnostics: Vec<ParseDiagnostic>,
    /// Number of lines in the input, blank ones included.
    pub lines_read: usize,
}

/// A log layout strategy.
pub trait RecordParser {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Parse the full text of a log.
    fn parse(&self, text: &str) -> ParseOutcome;
}

/// Accumulates observations and diagnostics while a strategy walks the lines.
#[derive(Debug)]
pub(crate) struct Collector {
    options: ParserOptions,
    outcome: ParseOutcome,
}

impl Collector {
    pub(crate) fn new(options: ParserOptions, text: &str) -> Self {
        let outcome = ParseOutcome { lines_read: text.lines().count(), ..ParseOutcome::default() };
        Self { options, outcome }
    }

    /// Convert the matched tokens and record the observation, or report why not.
    pub(crate) fn record(&mut self, line: usize, raw: &str, size: &str, elapsed: &str) {
        let Some(size) = parse_size(size) else {
            self.skip(line, raw, DiagnosticReason::InvalidNumber { token: size.to_string() });
            return;
        };
        let Some(elapsed) = parse_elapsed(elapsed) else {
            self.skip(line, raw, DiagnosticReason::InvalidNumber { token: elapsed.to_string() });
            return;
        };
        match Observation::new(size, elapsed, line) {
            Some(observation) => self.push(observation),
            None => {
                self.skip(line, raw, DiagnosticReason::InvalidNumber { token: size.to_string() });
            }
        }
    }

    pub(crate) fn push(&mut self, observation: Observation) {
        self.outcome.observations.push(observation);
    }

    /// Report a skipped line, honoring the short-line policy for unmatched lines.
    pub(crate) fn skip(&mut self, line: usize, raw: &str, reason: DiagnosticReason) {
        if reason == DiagnosticReason::Unmatched
            && raw.trim().chars().count() <= self.options.quiet_line_len
        {
            return;
        }
        debug!("skipping line {line}: {reason}");
        self.outcome.diagnostics.push(ParseDiagnostic { line, text: raw.to_string(), reason });
    }

    pub(crate) fn finish(self) -> ParseOutcome {
        self.outcome
    }
}

/// Parse an input size, stripping thousands separators. Zero is rejected.
pub(crate) fn parse_size(token: &str) -> Option<u64> {
    strip_grouping(token).parse::<u64>().ok().filter(|&n| n > 0)
}

/// Parse an elapsed time, stripping thousands separators.
pub(crate) fn parse_elapsed(token: &str) -> Option<f64> {
    strip_grouping(token).parse::<f64>().ok().filter(|t| t.is_finite() && *t >= 0.0)
}

fn strip_grouping(token: &str) -> String {
    token.trim().chars().filter(|&c| c != ',').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size_strips_commas() {
        assert_eq!(parse_size("1,234"), Some(1234));
        assert_eq!(parse_size("1,000,000"), Some(1_000_000));
        assert_eq!(parse_size("42"), Some(42));
    }

    #[test]
    fn test_parse_size_rejects_zero_and_overflow() {
        assert_eq!(parse_size("0"), None);
        assert_eq!(parse_size("99999999999999999999999"), None);
    }

    #[test]
    fn test_parse_elapsed() {
        assert_eq!(parse_elapsed("45.6"), Some(45.6));
        assert_eq!(parse_elapsed("1,234.5"), Some(1234.5));
        assert_eq!(parse_elapsed("1.2.3"), None);
    }

    #[test]
    fn test_collector_quiet_short_lines() {
        let mut collector = Collector::new(ParserOptions { quiet_line_len: 5 }, "");
        collector.skip(1, "---", DiagnosticReason::Unmatched);
        collector.skip(2, "a much longer line", DiagnosticReason::Unmatched);
        collector.skip(3, "x", DiagnosticReason::OrphanField);
        let outcome = collector.finish();

        let lines: Vec<usize> = outcome.diagnostics.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![2, 3]);
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = ParseDiagnostic {
            line: 7,
            text: "Size: 1x0 items".to_string(),
            reason: DiagnosticReason::InvalidNumber { token: "1x0".to_string() },
        };
        assert_eq!(
            diagnostic.to_string(),
            "line 7: could not convert '1x0' to a number (Size: 1x0 items)"
        );
    }
}
