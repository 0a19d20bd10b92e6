//! Analysis logic for observation tables
//!
//! This module contains pure business logic for summarizing benchmark
//! tables, separated from parsing and from report presentation.

pub mod complexity_analyzer;
pub mod statistics;

pub use complexity_analyzer::{
    analyze_table, assess_growth, ComplexityAnalysis, GrowthAssessment, SizeSteps,
    StabilityAssessment, SummaryStatistics, UNDEFINED,
};
pub use statistics::{median, Descriptive, RunningStats};
