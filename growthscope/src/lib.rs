//! # growthscope - Benchmark Log Complexity Analyzer
//!
//! growthscope reads the free-form text logs printed by benchmark harnesses,
//! extracts `(input size, elapsed time)` observations, and checks whether the
//! measured times grow the way a declared complexity class predicts.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Benchmark Harness (external)                 │
//! │          prints "n = 10000" / "Size: 10000 items | ..."         │
//! └───────────────────────┬─────────────────────────────────────────┘
//!                         │ UTF-8 log text
//!                         ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     growthscope (This Crate)                    │
//! │                                                                 │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐         │
//! │  │    Parser    │──▶│    Table     │──▶│   Analysis   │         │
//! │  │ (strategies) │   │   Builder    │   │ (statistics) │         │
//! │  └──────────────┘   └──────────────┘   └──────────────┘         │
//! │         │                                      │                │
//! │         ▼                                      ▼                │
//! │  ┌──────────────┐                      ┌──────────────┐         │
//! │  │ Diagnostics  │─────────────────────▶│    Export    │         │
//! │  │  (skipped)   │                      │ (json, text) │         │
//! │  └──────────────┘                      └──────────────┘         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`parser`]: one [`parser::RecordParser`] strategy per log layout
//!   (block, two-field, single-line); unusable lines become diagnostics
//! - [`table`]: sort, deduplicate (latest measurement wins) and derive
//!   per-entry metrics
//! - [`analysis`]: descriptive statistics, growth-factor consistency and
//!   complexity-ratio stability
//! - [`classification`]: threshold bands turning numbers into verdicts
//! - [`pipeline`]: parse → build → analyze as one batch
//! - [`export`]: JSON and plain-text reports
//! - [`config`]: typed configuration validated from labels
//! - [`cli`]: command-line argument parsing
//! - [`domain`]: core types and errors
//!
//! ## Verdicts
//!
//! Two questions are answered separately and never merged:
//!
//! 1. **Consistency**: does `t_last / t_first` match `f(n_last) / f(n_first)`?
//! 2. **Stability**: do the ratios `t / f(n)` stay flat across the table?
//!
//! A verdict that cannot be computed (one record, a zero baseline, too few
//! eligible ratios) is reported as `undefined` together with its reason.
//!
//! ## Typical Usage
//!
//! ```bash
//! # Harness printing "Size: N items | Time: T ms"
//! growthscope results.txt --format single_line --class loglinear
//!
//! # Stanza logs, one report per metric, exported as JSON
//! growthscope trials.txt --all-metrics --class linear --export report.json
//! ```

pub mod analysis;
pub mod classification;
pub mod cli;
pub mod config;
pub mod domain;
pub mod export;
pub mod parser;
pub mod pipeline;
pub mod table;
