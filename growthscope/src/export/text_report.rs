//! Plain-text report for the terminal.

use crate::analysis::ComplexityAnalysis;
use crate::pipeline::AnalysisReport;
use std::fmt;

const RULE_WIDTH: usize = 70;

/// Render a report as the multi-section summary printed by the binary.
#[must_use]
pub fn render_report(report: &AnalysisReport) -> String {
    TextReport(report).to_string()
}

struct TextReport<'a>(&'a AnalysisReport);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let analysis = &report.analysis;
        let summary = &analysis.summary;
        let unit = &report.time_unit;
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(f, "{rule}")?;
        match &report.series {
            Some(series) => writeln!(f, "  growth analysis: {series} vs {}", report.class)?,
            None => writeln!(f, "  growth analysis vs {}", report.class)?,
        }
        writeln!(f, "{rule}")?;

        writeln!(f, "\nDATASET")?;
        writeln!(f, "  records:            {}", summary.count)?;
        writeln!(f, "  size range:         {} to {}", summary.min_size, summary.max_size)?;
        if report.duplicates_dropped > 0 {
            writeln!(f, "  duplicates dropped: {}", report.duplicates_dropped)?;
        }
        if !report.diagnostics.is_empty() {
            writeln!(
                f,
                "  skipped lines:      {} of {}",
                report.diagnostics.len(),
                report.lines_read
            )?;
        }

        if let Some(steps) = &summary.size_steps {
            writeln!(f, "\nSIZE STEPS")?;
            writeln!(f, "  mean increment:     {:.0}", steps.mean)?;
            writeln!(f, "  min / max:          {:.0} / {:.0}", steps.min, steps.max)?;
            writeln!(f, "  most common:        {:.0}", steps.mode)?;
            writeln!(f, "  regularity:         {}", steps.regularity)?;
        }

        let elapsed = &summary.elapsed;
        writeln!(f, "\nELAPSED ({unit})")?;
        writeln!(f, "  min / max:          {:.3} / {:.3}", elapsed.min, elapsed.max)?;
        writeln!(f, "  mean:               {:.3}", elapsed.mean)?;
        writeln!(f, "  median:             {:.3}", elapsed.median)?;
        writeln!(f, "  std dev:            {:.3}", elapsed.std_dev)?;

        writeln!(f, "\nTIME PER UNIT ({unit} per item)")?;
        writeln!(f, "  mean:               {:.6e}", summary.time_per_unit_mean)?;
        writeln!(
            f,
            "  min / max:          {:.6e} / {:.6e}",
            summary.time_per_unit_min, summary.time_per_unit_max
        )?;

        write_consistency(f, analysis)?;
        write_stability(f, analysis)?;

        writeln!(f, "\nTABLE")?;
        writeln!(f, "  {:>12}  {:>14}  {:>10}  {:>14}", "size", "elapsed", "growth %", "ratio")?;
        for entry in report.table.entries() {
            let growth = entry.growth_pct.map_or_else(|| "-".to_string(), |g| format!("{g:.1}"));
            let ratio = entry
                .complexity_ratio
                .map_or_else(|| "excluded".to_string(), |r| format!("{r:.6e}"));
            writeln!(
                f,
                "  {:>12}  {:>14.3}  {growth:>10}  {ratio:>14}",
                entry.size, entry.elapsed
            )?;
        }

        if !report.diagnostics.is_empty() {
            writeln!(f, "\nDIAGNOSTICS")?;
            for diagnostic in &report.diagnostics {
                writeln!(f, "  {diagnostic}")?;
            }
        }

        write!(f, "\n{rule}")
    }
}

fn write_consistency(f: &mut fmt::Formatter<'_>, analysis: &ComplexityAnalysis) -> fmt::Result {
    writeln!(f, "\nSCALING vs {}", analysis.class)?;
    match &analysis.consistency {
        Ok(growth) => {
            writeln!(f, "  size grew:          {:.2}x", growth.size_factor)?;
            writeln!(f, "  time grew:          {:.2}x", growth.observed_factor)?;
            writeln!(f, "  theoretical:        {:.2}x", growth.theoretical_factor)?;
            writeln!(
                f,
                "  verdict:            {} ({:.1}% deviation)",
                growth.verdict, growth.deviation_pct
            )
        }
        Err(reason) => {
            writeln!(f, "  verdict:            {} ({reason})", analysis.consistency_label())
        }
    }
}

fn write_stability(f: &mut fmt::Formatter<'_>, analysis: &ComplexityAnalysis) -> fmt::Result {
    writeln!(f, "\nRATIO STABILITY")?;
    let summary = &analysis.summary;
    if summary.excluded_ratios > 0 {
        writeln!(f, "  excluded records:   {}", summary.excluded_ratios)?;
    }
    match &analysis.stability {
        Ok(stability) => {
            writeln!(f, "  mean ratio:         {:.9e}", stability.ratio_mean)?;
            writeln!(f, "  ratio CV:           {:.2}%", stability.cv_pct)?;
            writeln!(f, "  classification:     {}", stability.verdict)
        }
        Err(reason) => {
            writeln!(f, "  classification:     {} ({reason})", analysis.stability_label())
        }
    }
}
