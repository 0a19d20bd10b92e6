//! Complexity analysis for observation tables.
//!
//! This module summarizes an [`ObservationTable`] and judges whether the
//! measured times scale like the table's target complexity class.
//!
//! # Architecture
//!
//! - **`SummaryStatistics`** - descriptive statistics, always computed for a
//!   non-empty table
//! - **`GrowthAssessment`** - end-to-end growth factor vs. theory
//! - **`StabilityAssessment`** - spread of the per-record complexity ratios
//!
//! ## Data Flow
//!
//! ```text
//! ObservationTable
//!     │
//!     ├──► SummaryStatistics      (count, elapsed stats, growth factors, ratios)
//!     │
//!     ├──► GrowthAssessment       → consistent / plausible / inconsistent
//!     │
//!     └──► StabilityAssessment    → stable / moderately stable / unstable
//! ```
//!
//! The two verdicts are kept apart: a run can scale correctly end to end
//! while individual points wobble, or the other way round. When a verdict
//! cannot be computed it is reported as an [`AnalysisError`] in place of
//! the assessment, never as a placeholder number.

// Statistics convert counts and sizes to f64
#![allow(clippy::cast_precision_loss)]

use super::statistics::{Descriptive, RunningStats};
use crate::classification::{
    classify_deviation, classify_steps, classify_variation, Consistency, Stability,
    StepRegularity,
};
use crate::domain::{AnalysisError, ComplexityClass};
use crate::table::ObservationTable;
use log::{debug, warn};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::HashMap;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Records needed before growth factors mean anything.
const MIN_RECORDS_FOR_GROWTH: usize = 2;

/// Eligible complexity ratios needed for a coefficient of variation.
const MIN_RATIOS_FOR_STABILITY: usize = 2;

/// Label reported in place of a verdict that could not be computed.
pub const UNDEFINED: &str = "undefined";

// =============================================================================
// OUTPUT TYPES
// =============================================================================

/// Increments between consecutive input sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizeSteps {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Most common increment; the smallest one on a tie.
    pub mode: f64,
    pub regularity: StepRegularity,
}

/// Aggregate statistics of one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub count: usize,
    pub min_size: u64,
    pub max_size: u64,
    /// Statistics of `elapsed`.
    pub elapsed: Descriptive,
    pub time_per_unit_mean: f64,
    pub time_per_unit_min: f64,
    pub time_per_unit_max: f64,
    /// `size_last / size_first`; `None` with a single record.
    pub size_growth_factor: Option<f64>,
    /// `elapsed_last / elapsed_first`; `None` with a single record or a zero
    /// first time.
    pub elapsed_growth_factor: Option<f64>,
    /// Mean of the eligible complexity ratios.
    pub ratio_mean: Option<f64>,
    /// Coefficient of variation of the eligible ratios, in percent.
    pub ratio_cv_pct: Option<f64>,
    pub eligible_ratios: usize,
    pub excluded_ratios: usize,
    pub size_steps: Option<SizeSteps>,
}

/// End-to-end scaling compared with the target class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GrowthAssessment {
    pub size_factor: f64,
    /// `f(size_last) / f(size_first)`
    pub theoretical_factor: f64,
    /// `elapsed_last / elapsed_first`
    pub observed_factor: f64,
    /// `|observed - theoretical| / theoretical`, in percent.
    pub deviation_pct: f64,
    pub verdict: Consistency,
}

/// Uniformity of the per-record complexity ratios.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StabilityAssessment {
    pub ratio_mean: f64,
    pub ratio_std_dev: f64,
    pub cv_pct: f64,
    pub eligible: usize,
    pub verdict: Stability,
}

/// Everything the analyzer derives from one table.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexityAnalysis {
    pub class: ComplexityClass,
    pub summary: SummaryStatistics,
    pub consistency: Result<GrowthAssessment, AnalysisError>,
    pub stability: Result<StabilityAssessment, AnalysisError>,
}

impl ComplexityAnalysis {
    /// Consistency verdict label, or `"undefined"`.
    #[must_use]
    pub fn consistency_label(&self) -> &'static str {
        self.consistency.as_ref().map_or(UNDEFINED, |growth| growth.verdict.label())
    }

    /// Stability label, or `"undefined"`.
    #[must_use]
    pub fn stability_label(&self) -> &'static str {
        self.stability.as_ref().map_or(UNDEFINED, |stability| stability.verdict.label())
    }
}

// =============================================================================
// ANALYSIS
// =============================================================================

/// Analyze a table against its complexity class.
///
/// # Errors
/// Returns [`AnalysisError::EmptyTable`] for an empty table. Every other
/// limitation (single record, zero baselines, too few ratios) is reported
/// inside the returned analysis as an undefined verdict.
pub fn analyze_table(table: &ObservationTable) -> Result<ComplexityAnalysis, AnalysisError> {
    let (Some(first), Some(last)) = (table.first(), table.last()) else {
        return Err(AnalysisError::EmptyTable);
    };
    let class = table.class();
    let entries = table.entries();

    let elapsed: Vec<f64> = entries.iter().map(|e| e.elapsed).collect();
    let elapsed_stats = Descriptive::from_values(&elapsed).ok_or(AnalysisError::EmptyTable)?;
    let per_unit: RunningStats = entries.iter().map(|e| e.time_per_unit).collect();
    let ratios: RunningStats = table.eligible_ratios().collect();

    let has_growth = entries.len() >= MIN_RECORDS_FOR_GROWTH;
    let size_growth_factor = has_growth.then(|| last.size as f64 / first.size as f64);
    let elapsed_growth_factor =
        (has_growth && first.elapsed > 0.0).then(|| last.elapsed / first.elapsed);

    let stability = assess_stability(&ratios);
    let summary = SummaryStatistics {
        count: entries.len(),
        min_size: first.size,
        max_size: last.size,
        elapsed: elapsed_stats,
        time_per_unit_mean: per_unit.mean().unwrap_or_default(),
        time_per_unit_min: per_unit.min().unwrap_or_default(),
        time_per_unit_max: per_unit.max().unwrap_or_default(),
        size_growth_factor,
        elapsed_growth_factor,
        ratio_mean: ratios.mean(),
        ratio_cv_pct: stability.as_ref().ok().map(|s| s.cv_pct),
        eligible_ratios: ratios.count(),
        excluded_ratios: table.excluded_ratio_count(),
        size_steps: size_steps(table),
    };

    let consistency = assess_growth(table);
    if let Err(reason) = &consistency {
        warn!("{class} consistency verdict is undefined: {reason}");
    }
    if let Err(reason) = &stability {
        debug!("{class} stability is undefined: {reason}");
    }

    Ok(ComplexityAnalysis { class, summary, consistency, stability })
}

/// Compare the observed first-to-last growth with the class's prediction.
///
/// # Errors
/// - [`AnalysisError::EmptyTable`] / [`AnalysisError::InsufficientData`] with
///   fewer than two records
/// - [`AnalysisError::DegenerateReference`] when `f(size_first)` is zero
/// - [`AnalysisError::ZeroBaseline`] when the first record took no time
pub fn assess_growth(table: &ObservationTable) -> Result<GrowthAssessment, AnalysisError> {
    let (Some(first), Some(last)) = (table.first(), table.last()) else {
        return Err(AnalysisError::EmptyTable);
    };
    if table.len() < MIN_RECORDS_FOR_GROWTH {
        return Err(AnalysisError::InsufficientData {
            count: table.len(),
            required: MIN_RECORDS_FOR_GROWTH,
        });
    }

    let class = table.class();
    let reference_first = class.reference(first.size);
    if reference_first <= 0.0 || !reference_first.is_finite() {
        return Err(AnalysisError::DegenerateReference { class, size: first.size });
    }
    if first.elapsed <= 0.0 {
        return Err(AnalysisError::ZeroBaseline { size: first.size });
    }

    let theoretical_factor = class.reference(last.size) / reference_first;
    let observed_factor = last.elapsed / first.elapsed;
    let deviation_pct = (observed_factor - theoretical_factor).abs() / theoretical_factor * 100.0;

    Ok(GrowthAssessment {
        size_factor: last.size as f64 / first.size as f64,
        theoretical_factor,
        observed_factor,
        deviation_pct,
        verdict: classify_deviation(deviation_pct),
    })
}

/// Coefficient of variation of the eligible complexity ratios.
fn assess_stability(ratios: &RunningStats) -> Result<StabilityAssessment, AnalysisError> {
    let (Some(mean), Some(std_dev)) = (ratios.mean(), ratios.sample_std_dev()) else {
        return Err(AnalysisError::InsufficientRatios {
            eligible: ratios.count(),
            required: MIN_RATIOS_FOR_STABILITY,
        });
    };
    if mean == 0.0 {
        return Err(AnalysisError::ZeroRatioMean);
    }

    let cv_pct = std_dev / mean * 100.0;
    Ok(StabilityAssessment {
        ratio_mean: mean,
        ratio_std_dev: std_dev,
        cv_pct,
        eligible: ratios.count(),
        verdict: classify_variation(cv_pct),
    })
}

/// Increments between consecutive sizes; `None` with a single record.
fn size_steps(table: &ObservationTable) -> Option<SizeSteps> {
    let increments: Vec<u64> =
        table.entries().windows(2).map(|pair| pair[1].size - pair[0].size).collect();
    let stats: RunningStats = increments.iter().map(|&step| step as f64).collect();
    let (mean, min, max) = (stats.mean()?, stats.min()?, stats.max()?);

    let mut counts: HashMap<u64, usize> = HashMap::new();
    for &step in &increments {
        *counts.entry(step).or_default() += 1;
    }
    let (mode, _) = counts.into_iter().max_by_key(|&(step, count)| (count, Reverse(step)))?;

    Some(SizeSteps {
        mean,
        min,
        max,
        mode: mode as f64,
        regularity: classify_steps(min, max, mean),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Observation;
    use crate::table::build_table;

    fn table(points: &[(u64, f64)], class: ComplexityClass) -> ObservationTable {
        let observations: Vec<Observation> = points
            .iter()
            .enumerate()
            .map(|(i, &(size, elapsed))| Observation::new(size, elapsed, i + 1).unwrap())
            .collect();
        build_table(&observations, class).unwrap().table
    }

    #[test]
    fn test_linear_plausible_example() {
        let table = table(&[(10_000, 50.0), (1_000_000, 6000.0)], ComplexityClass::Linear);
        let growth = assess_growth(&table).unwrap();

        assert!((growth.theoretical_factor - 100.0).abs() < 1e-9);
        assert!((growth.observed_factor - 120.0).abs() < 1e-9);
        assert!((growth.deviation_pct - 20.0).abs() < 1e-9);
        assert_eq!(growth.verdict, Consistency::Plausible);
    }

    #[test]
    fn test_perfect_loglinear_is_consistent_and_stable() {
        let class = ComplexityClass::LogLinear;
        let points: Vec<(u64, f64)> = (1..=10)
            .map(|i| {
                let n = i * 10_000;
                (n, class.reference(n) * 1e-6)
            })
            .collect();
        let analysis = analyze_table(&table(&points, class)).unwrap();

        assert_eq!(analysis.consistency_label(), "consistent");
        assert_eq!(analysis.stability_label(), "stable");
        let stability = analysis.stability.unwrap();
        assert!(stability.cv_pct < 1e-6);
        assert_eq!(analysis.summary.size_steps.unwrap().regularity, StepRegularity::Uniform);
    }

    #[test]
    fn test_quadratic_data_is_inconsistent_with_linear() {
        let points: Vec<(u64, f64)> = (1..=5).map(|i| (i * 100, (i * i) as f64)).collect();
        let analysis = analyze_table(&table(&points, ComplexityClass::Linear)).unwrap();

        assert_eq!(analysis.consistency_label(), "inconsistent");
        assert_eq!(analysis.stability_label(), "unstable");
    }

    #[test]
    fn test_single_record_has_descriptive_stats_only() {
        let analysis = analyze_table(&table(&[(500, 2.0)], ComplexityClass::LogLinear)).unwrap();
        let summary = &analysis.summary;

        assert_eq!(summary.count, 1);
        assert_eq!(summary.elapsed.min, 2.0);
        assert_eq!(summary.elapsed.max, 2.0);
        assert_eq!(summary.elapsed.mean, 2.0);
        assert_eq!(summary.elapsed.median, 2.0);
        assert_eq!(summary.size_growth_factor, None);
        assert_eq!(summary.elapsed_growth_factor, None);
        assert!(summary.size_steps.is_none());

        assert_eq!(
            analysis.consistency,
            Err(AnalysisError::InsufficientData { count: 1, required: 2 })
        );
        assert_eq!(analysis.consistency_label(), UNDEFINED);
        assert_eq!(analysis.stability_label(), UNDEFINED);
    }

    #[test]
    fn test_empty_table_is_refused() {
        let result = analyze_table(&table(&[], ComplexityClass::Linear));
        assert_eq!(result.unwrap_err(), AnalysisError::EmptyTable);
    }

    #[test]
    fn test_logarithmic_with_size_one_is_degenerate() {
        let table = table(&[(1, 1.0), (1024, 10.0)], ComplexityClass::Logarithmic);
        let analysis = analyze_table(&table).unwrap();

        assert_eq!(
            analysis.consistency,
            Err(AnalysisError::DegenerateReference {
                class: ComplexityClass::Logarithmic,
                size: 1
            })
        );
        assert_eq!(analysis.summary.excluded_ratios, 1);
        assert_eq!(analysis.summary.eligible_ratios, 1);
        assert_eq!(
            analysis.stability,
            Err(AnalysisError::InsufficientRatios { eligible: 1, required: 2 })
        );
    }

    #[test]
    fn test_zero_first_time_is_undefined() {
        let table = table(&[(10, 0.0), (20, 1.0)], ComplexityClass::Linear);
        let analysis = analyze_table(&table).unwrap();

        assert_eq!(analysis.consistency, Err(AnalysisError::ZeroBaseline { size: 10 }));
        assert_eq!(analysis.summary.elapsed_growth_factor, None);
        assert_eq!(analysis.summary.size_growth_factor, Some(2.0));
    }

    #[test]
    fn test_all_zero_times_have_zero_ratio_mean() {
        let table = table(&[(10, 0.0), (20, 0.0)], ComplexityClass::Linear);
        let analysis = analyze_table(&table).unwrap();
        assert_eq!(analysis.stability, Err(AnalysisError::ZeroRatioMean));
    }

    #[test]
    fn test_summary_statistics() {
        let table =
            table(&[(100, 1.0), (200, 3.0), (300, 2.0), (400, 6.0)], ComplexityClass::Linear);
        let summary = analyze_table(&table).unwrap().summary;

        assert_eq!(summary.count, 4);
        assert_eq!(summary.min_size, 100);
        assert_eq!(summary.max_size, 400);
        assert_eq!(summary.elapsed.median, 2.5);
        assert!((summary.elapsed.mean - 3.0).abs() < 1e-12);
        // Deviations -2, 0, -1, 3 → squares sum 14, sample variance 14 / 3
        assert!((summary.elapsed.std_dev - (14.0_f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(summary.size_growth_factor, Some(4.0));
        assert_eq!(summary.elapsed_growth_factor, Some(6.0));
        assert_eq!(summary.time_per_unit_min, 2.0 / 300.0);
        assert_eq!(summary.time_per_unit_max, 0.015);
    }

    #[test]
    fn test_size_steps_mode() {
        let points = [(1_000, 1.0), (2_000, 2.0), (3_000, 3.0), (5_000, 5.0), (7_000, 7.0)];
        let steps = analyze_table(&table(&points, ComplexityClass::Linear))
            .unwrap()
            .summary
            .size_steps
            .unwrap();

        // Increments 1000, 1000, 2000, 2000: the tie goes to the smaller one
        assert_eq!(steps.mode, 1_000.0);
        assert_eq!(steps.mean, 1_500.0);
        assert_eq!(steps.min, 1_000.0);
        assert_eq!(steps.max, 2_000.0);

        let steps = analyze_table(&table(&points[1..], ComplexityClass::Linear))
            .unwrap()
            .summary
            .size_steps
            .unwrap();
        assert_eq!(steps.mode, 2_000.0);
    }
}
