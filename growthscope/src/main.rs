//! # growthscope - Main Entry Point
//!
//! Reads one benchmark log, prints the analysis, and optionally exports it
//! as JSON. With `--all-metrics`, every metric of a block log is analyzed
//! as its own series.

use anyhow::{Context, Result};
use clap::Parser;
use growthscope::cli::Args;
use growthscope::domain::{ConfigError, PipelineError};
use growthscope::export::{render_report, write_json_report, write_json_reports};
use growthscope::pipeline::{analyze_block_series, analyze_log, AnalysisReport};
use log::info;
use std::fs::File;
use std::io::BufWriter;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_USAGE: i32 = 2;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e:#}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    let is_config = err.chain().any(|cause| {
        cause.downcast_ref::<ConfigError>().is_some()
            || matches!(cause.downcast_ref::<PipelineError>(), Some(PipelineError::Config(_)))
    });
    if is_config {
        EXIT_USAGE
    } else {
        EXIT_ERROR
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let config = args.to_config()?;

    let text = std::fs::read_to_string(&args.log)
        .with_context(|| format!("Failed to read log: {}", args.log.display()))?;

    if !args.quiet {
        println!("growthscope v{}", env!("CARGO_PKG_VERSION"));
        println!("log: {}", args.log.display());
        println!("format: {} | class: {}", config.format, config.class);
    }

    let reports: Vec<AnalysisReport> = if args.all_metrics {
        analyze_block_series(&text, &config)?
    } else {
        vec![analyze_log(&text, &config)?]
    };

    for report in &reports {
        if args.quiet {
            let series = report.series.as_deref().unwrap_or("log");
            println!(
                "{series}: consistency {}, stability {}",
                report.analysis.consistency_label(),
                report.analysis.stability_label()
            );
        } else {
            println!("\n{}", render_report(report));
        }
    }

    if let Some(ref path) = args.export {
        let file = File::create(path)
            .with_context(|| format!("Failed to create export file: {}", path.display()))?;
        let writer = BufWriter::new(file);
        match reports.as_slice() {
            [report] => write_json_report(report, writer),
            _ => write_json_reports(&reports, writer),
        }
        .with_context(|| format!("Failed to export report: {}", path.display()))?;
        info!("Exported {} report(s) to {}", reports.len(), path.display());
        if !args.quiet {
            println!("\nreport: {}", path.display());
        }
    }

    Ok(())
}
