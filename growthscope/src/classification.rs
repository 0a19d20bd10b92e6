//! Qualitative classification of scaling measurements.
//!
//! Three independent labels are derived from the numeric results of the
//! complexity analyzer. They answer different questions and are never
//! merged into one score:
//!
//! # Classification Strategy
//!
//! 1. **Consistency** - end-to-end scaling. Relative deviation between the
//!    observed growth factor (`t_last / t_first`) and the theoretical one
//!    (`f(n_last) / f(n_first)`).
//!    - `< 15%` → consistent
//!    - `< 30%` → plausible
//!    - otherwise → inconsistent
//!
//! 2. **Stability** - per-point scaling. Coefficient of variation of the
//!    complexity ratios `t / f(n)` across the table.
//!    - `< 10%` → stable
//!    - `< 25%` → moderately stable
//!    - otherwise → unstable
//!
//! 3. **Step regularity** - how evenly the harness spaced its input sizes.
//!    - all increments equal → uniform
//!    - spread below 10% of the mean increment → near-uniform
//!    - otherwise → irregular

use serde::Serialize;
use std::fmt;

// =============================================================================
// THRESHOLDS
// =============================================================================

/// Upper bounds (exclusive, in percent) for each consistency verdict.
const CONSISTENCY_BANDS: &[(f64, Consistency)] =
    &[(15.0, Consistency::Consistent), (30.0, Consistency::Plausible)];

/// Upper bounds (exclusive, in percent) for each stability class.
const STABILITY_BANDS: &[(f64, Stability)] =
    &[(10.0, Stability::Stable), (25.0, Stability::ModeratelyStable)];

/// Increment spread, as a fraction of the mean increment, still considered
/// near-uniform.
const NEAR_UNIFORM_SPREAD: f64 = 0.1;

// =============================================================================
// LABELS
// =============================================================================

/// How well observed end-to-end growth matches the target class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Consistency {
    Consistent,
    Plausible,
    Inconsistent,
}

impl Consistency {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Consistency::Consistent => "consistent",
            Consistency::Plausible => "plausible",
            Consistency::Inconsistent => "inconsistent",
        }
    }
}

/// How uniform the per-record complexity ratios are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stability {
    Stable,
    ModeratelyStable,
    Unstable,
}

impl Stability {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Stability::Stable => "stable",
            Stability::ModeratelyStable => "moderately stable",
            Stability::Unstable => "unstable",
        }
    }
}

/// How evenly input sizes are spaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepRegularity {
    Uniform,
    NearUniform,
    Irregular,
}

impl StepRegularity {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            StepRegularity::Uniform => "uniform",
            StepRegularity::NearUniform => "near-uniform",
            StepRegularity::Irregular => "irregular",
        }
    }
}

impl fmt::Display for Consistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Stability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for StepRegularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// CLASSIFIERS
// =============================================================================

/// Classify a growth-factor deviation given in percent.
#[must_use]
pub fn classify_deviation(deviation_pct: f64) -> Consistency {
    band(CONSISTENCY_BANDS, deviation_pct).unwrap_or(Consistency::Inconsistent)
}

/// Classify a coefficient of variation given in percent.
#[must_use]
pub fn classify_variation(cv_pct: f64) -> Stability {
    band(STABILITY_BANDS, cv_pct).unwrap_or(Stability::Unstable)
}

/// Classify size increments from their min, max and mean.
#[must_use]
pub fn classify_steps(min: f64, max: f64, mean: f64) -> StepRegularity {
    let spread = max - min;
    if spread == 0.0 {
        StepRegularity::Uniform
    } else if spread < mean * NEAR_UNIFORM_SPREAD {
        StepRegularity::NearUniform
    } else {
        StepRegularity::Irregular
    }
}

/// First band whose exclusive upper bound exceeds `value`.
fn band<T: Copy>(bands: &[(f64, T)], value: f64) -> Option<T> {
    bands.iter().find(|(upper, _)| value < *upper).map(|&(_, label)| label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deviation_boundaries() {
        assert_eq!(classify_deviation(0.0), Consistency::Consistent);
        assert_eq!(classify_deviation(14.99), Consistency::Consistent);
        assert_eq!(classify_deviation(15.0), Consistency::Plausible);
        assert_eq!(classify_deviation(29.99), Consistency::Plausible);
        assert_eq!(classify_deviation(30.0), Consistency::Inconsistent);
        assert_eq!(classify_deviation(250.0), Consistency::Inconsistent);
    }

    #[test]
    fn test_variation_boundaries() {
        assert_eq!(classify_variation(9.9), Stability::Stable);
        assert_eq!(classify_variation(10.0), Stability::ModeratelyStable);
        assert_eq!(classify_variation(24.9), Stability::ModeratelyStable);
        assert_eq!(classify_variation(25.0), Stability::Unstable);
    }

    #[test]
    fn test_step_regularity() {
        assert_eq!(classify_steps(10_000.0, 10_000.0, 10_000.0), StepRegularity::Uniform);
        assert_eq!(classify_steps(9_900.0, 10_100.0, 10_000.0), StepRegularity::NearUniform);
        assert_eq!(classify_steps(1_000.0, 90_000.0, 10_000.0), StepRegularity::Irregular);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Stability::ModeratelyStable.to_string(), "moderately stable");
        assert_eq!(Consistency::Plausible.label(), "plausible");
        assert_eq!(StepRegularity::NearUniform.label(), "near-uniform");
    }
}
