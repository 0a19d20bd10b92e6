//! Two-field layout: `Size: <int> items` with `Total time: <float> ms` on the
//! same line or on the line right after it.

use super::{parse_size, Collector, DiagnosticReason, ParseOutcome, ParserOptions, RecordParser};
use regex::Regex;
use std::sync::LazyLock;

static SIZE_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:size|tama[ñn]o):\s*(?P<size>[0-9][0-9,]*)\s*(?:items|elementos)")
        .expect("Invalid size field regex")
});

static TOTAL_TIME_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:total\s*time|tiempo\s*total):\s*(?P<time>[0-9][0-9,.]*)\s*ms")
        .expect("Invalid total time field regex")
});

/// Parser for logs that print the size and the total time as two fields.
#[derive(Debug, Clone, Default)]
pub struct TwoFieldParser {
    options: ParserOptions,
}

impl TwoFieldParser {
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }
}

impl RecordParser for TwoFieldParser {
    fn name(&self) -> &'static str {
        "two_field"
    }

    fn parse(&self, text: &str) -> ParseOutcome {
        let mut collector = Collector::new(self.options, text);
        let lines: Vec<&str> = text.lines().collect();

        let mut index = 0;
        while index < lines.len() {
            let raw = lines[index];
            let line = index + 1;
            index += 1;

            if raw.trim().is_empty() {
                continue;
            }

            let size = SIZE_FIELD.captures(raw);
            let time = TOTAL_TIME_FIELD.captures(raw);

            match (size, time) {
                (Some(size), Some(time)) => {
                    collector.record(line, raw, &size["size"], &time["time"]);
                }
                (Some(size), None) => {
                    // The time may follow on the very next line, as long as that
                    // line does not start a record of its own
                    let next_time = lines
                        .get(index)
                        .filter(|next| !SIZE_FIELD.is_match(next))
                        .and_then(|next| TOTAL_TIME_FIELD.captures(next));

                    if let Some(time) = next_time {
                        let next_raw = lines[index];
                        collector.record(line + 1, next_raw, &size["size"], &time["time"]);
                        index += 1;
                    } else {
                        let reason = match parse_size(&size["size"]) {
                            Some(size) => DiagnosticReason::IncompleteRecord { size },
                            None => DiagnosticReason::InvalidNumber {
                                token: size["size"].to_string(),
                            },
                        };
                        collector.skip(line, raw, reason);
                    }
                }
                (None, Some(_)) => collector.skip(line, raw, DiagnosticReason::OrphanField),
                (None, None) => collector.skip(line, raw, DiagnosticReason::Unmatched),
            }
        }

        collector.finish()
    }
}
