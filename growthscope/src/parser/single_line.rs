//! Single-line combined layout: `Size: <int> items | Time: <float> ms`.

use super::{Collector, DiagnosticReason, ParseOutcome, ParserOptions, RecordParser};
use regex::Regex;
use std::sync::LazyLock;

/// Size and time on one line, separated by a pipe.
static COMBINED_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)(?:size|tama[ñn]o):\s*(?P<size>[0-9][0-9,]*)\s*(?:items|elementos)\s*\|",
        r"\s*(?:time|tiempo):\s*(?P<time>[0-9][0-9,.]*)\s*ms",
    ))
    .expect("Invalid single-line record regex")
});

/// Parser for logs with one complete record per line.
#[derive(Debug, Clone, Default)]
pub struct SingleLineParser {
    options: ParserOptions,
}

impl SingleLineParser {
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }
}

impl RecordParser for SingleLineParser {
    fn name(&self) -> &'static str {
        "single_line"
    }

    fn parse(&self, text: &str) -> ParseOutcome {
        let mut collector = Collector::new(self.options, text);

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            if raw.trim().is_empty() {
                continue;
            }

            match COMBINED_LINE.captures(raw) {
                Some(caps) => collector.record(line, raw, &caps["size"], &caps["time"]),
                None => collector.skip(line, raw, DiagnosticReason::Unmatched),
            }
        }

        collector.finish()
    }
}
