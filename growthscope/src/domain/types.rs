//! Domain types providing compile-time safety and self-documentation
//!
//! An [`Observation`] can only be constructed with a positive size and a
//! finite, non-negative elapsed time, so everything downstream of the parser
//! can rely on those bounds without re-checking them.

// Reference functions evaluate sizes as floating point
#![allow(clippy::cast_precision_loss)]

use super::errors::ConfigError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// One measured run taken from a benchmark log.
///
/// The time unit is whatever the harness printed; it only has to be
/// consistent within one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observation {
    size: u64,
    elapsed: f64,
    line: usize,
}

impl Observation {
    /// Create an observation completed at `line` (1-based).
    ///
    /// Returns `None` for a zero size or a negative / non-finite elapsed time.
    #[must_use]
    pub fn new(size: u64, elapsed: f64, line: usize) -> Option<Self> {
        if size == 0 || !elapsed.is_finite() || elapsed < 0.0 {
            return None;
        }
        Some(Self { size, elapsed, line })
    }

    /// Input size of the measured run.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Elapsed time of the measured run.
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Source line that completed this record.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={} t={}", self.size, self.elapsed)
    }
}

/// Target asymptotic complexity class.
///
/// Each class carries a reference growth function `f(n)` used to normalize
/// elapsed time into a complexity ratio and to predict end-to-end growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityClass {
    /// `f(n) = n`
    Linear,
    /// `f(n) = log2(n)`
    Logarithmic,
    /// `f(n) = n * log2(n)`
    #[default]
    LogLinear,
    /// `f(n) = n^2`
    Quadratic,
}

impl ComplexityClass {
    /// All supported classes, in the order they are listed to users.
    pub const ALL: [ComplexityClass; 4] = [
        ComplexityClass::Linear,
        ComplexityClass::Logarithmic,
        ComplexityClass::LogLinear,
        ComplexityClass::Quadratic,
    ];

    /// Evaluate the reference growth function at `n`.
    ///
    /// Logarithmic classes evaluate to `0.0` at `n = 1`; callers must treat a
    /// zero reference value as "not comparable" rather than dividing by it.
    #[must_use]
    pub fn reference(self, n: u64) -> f64 {
        let n = n as f64;
        match self {
            ComplexityClass::Linear => n,
            ComplexityClass::Logarithmic => n.log2(),
            ComplexityClass::LogLinear => n * n.log2(),
            ComplexityClass::Quadratic => n * n,
        }
    }

    /// Configuration label, as accepted by [`FromStr`].
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ComplexityClass::Linear => "linear",
            ComplexityClass::Logarithmic => "logarithmic",
            ComplexityClass::LogLinear => "loglinear",
            ComplexityClass::Quadratic => "quadratic",
        }
    }

    /// Big-O notation used in reports.
    #[must_use]
    pub fn notation(self) -> &'static str {
        match self {
            ComplexityClass::Linear => "O(n)",
            ComplexityClass::Logarithmic => "O(log n)",
            ComplexityClass::LogLinear => "O(n log n)",
            ComplexityClass::Quadratic => "O(n^2)",
        }
    }
}

impl fmt::Display for ComplexityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.notation())
    }
}

impl FromStr for ComplexityClass {
    type Err = ConfigError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let normalized: String =
            label.trim().to_lowercase().chars().filter(|c| !c.is_whitespace()).collect();
        match normalized.as_str() {
            "linear" | "n" | "o(n)" => Ok(ComplexityClass::Linear),
            "logarithmic" | "log" | "logn" | "o(logn)" => Ok(ComplexityClass::Logarithmic),
            "loglinear" | "log-linear" | "log_linear" | "nlogn" | "o(nlogn)" => {
                Ok(ComplexityClass::LogLinear)
            }
            "quadratic" | "n^2" | "n2" | "n²" | "o(n^2)" | "o(n²)" => {
                Ok(ComplexityClass::Quadratic)
            }
            _ => Err(ConfigError::UnknownComplexityClass { label: label.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_rejects_zero_size() {
        assert!(Observation::new(0, 1.0, 1).is_none());
        assert!(Observation::new(1, 1.0, 1).is_some());
    }

    #[test]
    fn test_observation_rejects_bad_elapsed() {
        assert!(Observation::new(10, -0.5, 1).is_none());
        assert!(Observation::new(10, f64::NAN, 1).is_none());
        assert!(Observation::new(10, f64::INFINITY, 1).is_none());
        assert!(Observation::new(10, 0.0, 1).is_some());
    }

    #[test]
    fn test_reference_functions() {
        assert_eq!(ComplexityClass::Linear.reference(8), 8.0);
        assert_eq!(ComplexityClass::Logarithmic.reference(8), 3.0);
        assert_eq!(ComplexityClass::LogLinear.reference(8), 24.0);
        assert_eq!(ComplexityClass::Quadratic.reference(8), 64.0);
        assert_eq!(ComplexityClass::Logarithmic.reference(1), 0.0);
    }

    #[test]
    fn test_class_labels_round_trip() {
        for class in ComplexityClass::ALL {
            assert_eq!(class.label().parse::<ComplexityClass>().unwrap(), class);
        }
    }

    #[test]
    fn test_class_accepts_notation() {
        assert_eq!("O(n log n)".parse::<ComplexityClass>().unwrap(), ComplexityClass::LogLinear);
        assert_eq!("O(n²)".parse::<ComplexityClass>().unwrap(), ComplexityClass::Quadratic);
        assert_eq!(" Linear ".parse::<ComplexityClass>().unwrap(), ComplexityClass::Linear);
    }

    #[test]
    fn test_unknown_class_keeps_label() {
        let err = "cubic".parse::<ComplexityClass>().unwrap_err();
        assert_eq!(err, ConfigError::UnknownComplexityClass { label: "cubic".to_string() });
    }
}
