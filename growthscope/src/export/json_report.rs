use crate::analysis::{SummaryStatistics, UNDEFINED};
use crate::domain::{AnalysisError, ComplexityClass, ExportError};
use crate::parser::ParseDiagnostic;
use crate::pipeline::AnalysisReport;
use crate::table::TableEntry;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::io::Write;

/// JSON document for one analyzed series.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    series: Option<&'a str>,
    class: ComplexityClass,
    /// Big-O notation of `class`, for readers of the file
    notation: &'static str,
    time_unit: &'a str,
    lines_read: usize,
    duplicates_dropped: usize,
    table: &'a [TableEntry],
    summary: &'a SummaryStatistics,
    consistency: JsonValue,
    stability: JsonValue,
    diagnostics: &'a [ParseDiagnostic],
}

/// Convert a report into a JSON value.
///
/// Verdicts that could not be computed become
/// `{"verdict": "undefined", "reason": "..."}`.
///
/// # Errors
/// Returns [`ExportError::Json`] if a value fails to serialize.
pub fn report_to_json(report: &AnalysisReport) -> Result<JsonValue, ExportError> {
    let analysis = &report.analysis;
    let document = JsonReport {
        series: report.series.as_deref(),
        class: report.class,
        notation: report.class.notation(),
        time_unit: &report.time_unit,
        lines_read: report.lines_read,
        duplicates_dropped: report.duplicates_dropped,
        table: report.table.entries(),
        summary: &analysis.summary,
        consistency: verdict_json(&analysis.consistency)?,
        stability: verdict_json(&analysis.stability)?,
        diagnostics: &report.diagnostics,
    };
    Ok(serde_json::to_value(document)?)
}

/// Write one report as pretty-printed JSON.
///
/// # Errors
/// Returns [`ExportError`] on serialization or I/O failure.
pub fn write_json_report<W: Write>(report: &AnalysisReport, writer: W) -> Result<(), ExportError> {
    let value = report_to_json(report)?;
    write_pretty(&value, writer)
}

/// Write several reports (one per metric series) as a JSON array.
///
/// # Errors
/// Returns [`ExportError`] on serialization or I/O failure.
pub fn write_json_reports<W: Write>(
    reports: &[AnalysisReport],
    writer: W,
) -> Result<(), ExportError> {
    let values = reports.iter().map(report_to_json).collect::<Result<Vec<_>, _>>()?;
    write_pretty(&JsonValue::Array(values), writer)
}

fn write_pretty<W: Write>(value: &JsonValue, mut writer: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush().map_err(|e| ExportError::WriteFailed(e.to_string()))
}

fn verdict_json<T: Serialize>(result: &Result<T, AnalysisError>) -> Result<JsonValue, ExportError> {
    match result {
        Ok(assessment) => Ok(serde_json::to_value(assessment)?),
        Err(reason) => Ok(serde_json::json!({
            "verdict": UNDEFINED,
            "reason": reason.to_string(),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AnalysisConfig, LogFormat};
    use crate::pipeline::analyze_log;

    fn report(text: &str) -> AnalysisReport {
        let config = AnalysisConfig::new(LogFormat::SingleLine, ComplexityClass::Linear);
        analyze_log(text, &config).unwrap()
    }

    #[test]
    fn test_json_fields() {
        let report = report(
            "Size: 10000 items | Time: 50 ms\nnoise\nSize: 1000000 items | Time: 6000 ms\n",
        );
        let value = report_to_json(&report).unwrap();

        assert_eq!(value["class"], "linear");
        assert_eq!(value["notation"], "O(n)");
        assert_eq!(value["time_unit"], "ms");
        assert!(value.get("series").is_none());
        assert_eq!(value["table"].as_array().unwrap().len(), 2);
        assert_eq!(value["consistency"]["verdict"], "plausible");
        assert_eq!(value["diagnostics"][0]["line"], 2);
        assert_eq!(value["diagnostics"][0]["reason"]["kind"], "unmatched");
    }

    #[test]
    fn test_undefined_verdict_has_reason() {
        let value = report_to_json(&report("Size: 500 items | Time: 2.0 ms")).unwrap();

        assert_eq!(value["consistency"]["verdict"], "undefined");
        assert_eq!(
            value["consistency"]["reason"],
            "Growth verdict needs at least 2 records, found 1"
        );
        assert_eq!(value["stability"]["verdict"], "undefined");
        assert_eq!(value["summary"]["elapsed"]["mean"], 2.0);
        assert!(value["summary"]["size_growth_factor"].is_null());
    }

    #[test]
    fn test_write_json_report_is_parseable() {
        let report = report("Size: 100 items | Time: 1 ms\nSize: 200 items | Time: 2 ms\n");
        let mut buffer = Vec::new();
        write_json_report(&report, &mut buffer).unwrap();

        let parsed: JsonValue = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed["summary"]["count"], 2);
        assert!(buffer.ends_with(b"\n"));
    }
}
