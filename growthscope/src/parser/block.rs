//! Block layout: one stanza per trial.
//!
//! ```text
//! Inicia la prueba de complejidad con n = 1000
//! A cicloSuma le tomó 0.000012 segundos ejecutarse
//!
//! A cicloMultiplicacion le tomó 0.000015 segundos ejecutarse
//! ```
//!
//! or, in English, `... n = 1000` followed by `cicloSuma took 0.000012 seconds to run`.
//!
//! A stanza is a header plus the contiguous run of metric lines after it.
//! Blank lines inside a stanza are skipped; any other line closes it.
//!
//! # Completion
//!
//! With a list of required metrics, a stanza completes on the line that
//! supplies the last missing metric. Without one, every metric is accepted
//! and the stanza completes when it closes, provided it holds the selected
//! metric. When no metric is configured, [`RecordParser::parse`] analyzes the
//! first label the log reports and diagnoses stanzas that lack it.

use super::{
    parse_elapsed, parse_size, Collector, DiagnosticReason, ParseOutcome, ParserOptions,
    RecordParser,
};
use crate::domain::Observation;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static HEADER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bn\s*=\s*(?P<size>[0-9][0-9,]*)").expect("Invalid block header regex")
});

static METRIC_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^\s*(?:a\s+)?(?P<label>\S+)\s+(?:took|le\s+tom[óo])\s+",
        r"(?P<value>[0-9][0-9,.]*)\s*(?P<unit>[^\s0-9]\S*)\s+(?:to\s+run|ejecutarse)",
    ))
    .expect("Invalid block metric regex")
});

/// A completed stanza with every metric it reported, in log order.
#[derive(Debug, Clone, PartialEq)]
pub struct Stanza {
    pub size: u64,
    /// Line of the `n = ...` header.
    pub header_line: usize,
    /// Line that completed the stanza.
    pub completed_line: usize,
    pub timings: Vec<(String, f64)>,
}

impl Stanza {
    /// Elapsed time reported for `label`, if any.
    #[must_use]
    pub fn timing(&self, label: &str) -> Option<f64> {
        self.timings.iter().find(|(name, _)| name == label).map(|&(_, value)| value)
    }
}

/// Observations for one metric label across all stanzas.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    pub label: String,
    pub observations: Vec<Observation>,
}

/// Result of splitting a block log into one series per metric.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesOutcome {
    pub series: Vec<MetricSeries>,
    pub diagnostics: Vec<super::ParseDiagnostic>,
    pub lines_read: usize,
}

/// Parser for stanza-per-trial logs with several named metrics.
#[derive(Debug, Clone, Default)]
pub struct BlockParser {
    options: ParserOptions,
    /// Metrics that must all appear for a stanza to complete.
    required: Vec<String>,
    /// Metric whose value becomes the observation's elapsed time.
    select: Option<String>,
}

/// A stanza that is still collecting metric lines.
#[derive(Debug)]
struct OpenStanza<'a> {
    header_line: usize,
    header_text: &'a str,
    /// `None` when the header size could not be converted; the stanza is then
    /// absorbed silently since the header was already reported.
    size: Option<u64>,
    timings: Vec<(String, f64)>,
    last_metric_line: usize,
    completed: bool,
}

impl BlockParser {
    #[must_use]
    pub fn new(options: ParserOptions, required: Vec<String>, select: Option<String>) -> Self {
        Self { options, required, select }
    }

    /// Metric used for the observations returned by [`RecordParser::parse`].
    #[must_use]
    pub fn selected_metric(&self) -> Option<&str> {
        self.select.as_deref().or_else(|| self.required.first().map(String::as_str))
    }

    /// Metric analyzed for `text`: the configured one, or else the first
    /// label reported inside a stanza with a valid header.
    #[must_use]
    pub fn metric_for(&self, text: &str) -> Option<String> {
        self.selected_metric().map(str::to_string).or_else(|| first_metric_label(text))
    }

    /// Split the log into completed stanzas, keeping every metric.
    #[must_use]
    pub fn parse_stanzas(&self, text: &str) -> (Vec<Stanza>, ParseOutcome) {
        let mut collector = Collector::new(self.options, text);
        let mut stanzas = Vec::new();
        let mut unit: Option<String> = None;
        let mut open: Option<OpenStanza<'_>> = None;

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            if raw.trim().is_empty() {
                continue;
            }

            if let Some(caps) = HEADER_LINE.captures(raw) {
                if let Some(previous) = open.take() {
                    self.close(previous, &mut stanzas, &mut collector);
                }
                let size = parse_size(&caps["size"]);
                if size.is_none() {
                    let token = caps["size"].to_string();
                    collector.skip(line, raw, DiagnosticReason::InvalidNumber { token });
                }
                open = Some(OpenStanza {
                    header_line: line,
                    header_text: raw,
                    size,
                    timings: Vec::new(),
                    last_metric_line: line,
                    completed: false,
                });
                continue;
            }

            let Some(caps) = METRIC_LINE.captures(raw) else {
                if let Some(previous) = open.take() {
                    self.close(previous, &mut stanzas, &mut collector);
                }
                collector.skip(line, raw, DiagnosticReason::Unmatched);
                continue;
            };

            let Some(stanza) = open.as_mut() else {
                collector.skip(line, raw, DiagnosticReason::OrphanField);
                continue;
            };
            let Some(size) = stanza.size else {
                continue;
            };

            let label = &caps["label"];
            if !self.required.is_empty() && !self.required.iter().any(|r| r == label) {
                debug!("ignoring metric '{label}' on line {line}");
                continue;
            }

            let Some(value) = parse_elapsed(&caps["value"]) else {
                let token = caps["value"].to_string();
                collector.skip(line, raw, DiagnosticReason::InvalidNumber { token });
                continue;
            };

            let found = caps["unit"].to_lowercase();
            if let Some(expected) = unit.as_ref().filter(|expected| **expected != found) {
                let expected = expected.clone();
                collector.skip(line, raw, DiagnosticReason::UnitMismatch { expected, found });
                continue;
            }
            unit.get_or_insert(found);

            // A repeated label inside one stanza keeps the latest value
            match stanza.timings.iter_mut().find(|(name, _)| name == label) {
                Some(entry) => entry.1 = value,
                None => stanza.timings.push((label.to_string(), value)),
            }
            stanza.last_metric_line = line;

            if !stanza.completed && !self.required.is_empty() && self.missing(stanza).is_empty() {
                stanza.completed = true;
                stanzas.push(Stanza {
                    size,
                    header_line: stanza.header_line,
                    completed_line: line,
                    timings: self.ordered_timings(&stanza.timings),
                });
            }
        }

        if let Some(previous) = open.take() {
            self.close(previous, &mut stanzas, &mut collector);
        }

        (stanzas, collector.finish())
    }

    /// Parse the log into one observation series per metric label, in the
    /// order labels first appear.
    #[must_use]
    pub fn parse_series(&self, text: &str) -> SeriesOutcome {
        let (stanzas, outcome) = self.parse_stanzas(text);
        let mut series: Vec<MetricSeries> = Vec::new();

        for stanza in &stanzas {
            for (label, value) in &stanza.timings {
                let Some(observation) = Observation::new(stanza.size, *value, stanza.completed_line)
                else {
                    continue;
                };
                match series.iter_mut().find(|s| s.label == *label) {
                    Some(existing) => existing.observations.push(observation),
                    None => series.push(MetricSeries {
                        label: label.clone(),
                        observations: vec![observation],
                    }),
                }
            }
        }

        SeriesOutcome { series, diagnostics: outcome.diagnostics, lines_read: outcome.lines_read }
    }

    /// Close a stanza: record it if it completed, otherwise report it.
    fn close(
        &self,
        stanza: OpenStanza<'_>,
        stanzas: &mut Vec<Stanza>,
        collector: &mut Collector,
    ) {
        let Some(size) = stanza.size else {
            return;
        };
        if stanza.completed {
            return;
        }

        let missing = if self.required.is_empty() {
            match &self.select {
                Some(select) if stanza.timing_index(select).is_none() => vec![select.clone()],
                None if stanza.timings.is_empty() => vec!["any metric".to_string()],
                _ => Vec::new(),
            }
        } else {
            self.missing(&stanza)
        };

        if missing.is_empty() {
            stanzas.push(Stanza {
                size,
                header_line: stanza.header_line,
                completed_line: stanza.last_metric_line,
                timings: stanza.timings,
            });
        } else {
            collector.skip(
                stanza.header_line,
                stanza.header_text,
                DiagnosticReason::IncompleteStanza { size, missing },
            );
        }
    }

    fn missing(&self, stanza: &OpenStanza<'_>) -> Vec<String> {
        self.required
            .iter()
            .filter(|label| stanza.timing_index(label).is_none())
            .cloned()
            .collect()
    }

    /// Timings reordered to follow the required list.
    fn ordered_timings(&self, timings: &[(String, f64)]) -> Vec<(String, f64)> {
        self.required
            .iter()
            .filter_map(|label| timings.iter().find(|(name, _)| name == label).cloned())
            .collect()
    }
}

impl OpenStanza<'_> {
    fn timing_index(&self, label: &str) -> Option<usize> {
        self.timings.iter().position(|(name, _)| name == label)
    }
}

impl RecordParser for BlockParser {
    fn name(&self) -> &'static str {
        "block"
    }

    fn parse(&self, text: &str) -> ParseOutcome {
        let Some(metric) = self.metric_for(text) else {
            return self.parse_stanzas(text).1;
        };

        // Without a configured metric, pin the first one the log reports so
        // every record comes from the same label
        let pinned;
        let parser = if self.selected_metric().is_some() {
            self
        } else {
            debug!("no metric selected, analyzing '{metric}'");
            pinned = Self { select: Some(metric.clone()), ..self.clone() };
            &pinned
        };

        let (stanzas, mut outcome) = parser.parse_stanzas(text);
        outcome.observations = stanzas
            .iter()
            .filter_map(|stanza| {
                Observation::new(stanza.size, stanza.timing(&metric)?, stanza.completed_line)
            })
            .collect();

        outcome
    }
}

/// First metric label that follows a valid header, without collecting
/// diagnostics.
fn first_metric_label(text: &str) -> Option<String> {
    let mut in_stanza = false;
    for raw in text.lines().filter(|raw| !raw.trim().is_empty()) {
        if let Some(caps) = HEADER_LINE.captures(raw) {
            in_stanza = parse_size(&caps["size"]).is_some();
        } else if let Some(caps) = METRIC_LINE.captures(raw) {
            if in_stanza {
                return Some(caps["label"].to_string());
            }
        } else {
            in_stanza = false;
        }
    }
    None
}
