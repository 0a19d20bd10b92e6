//! Descriptive statistics over elapsed times and complexity ratios.
//!
//! Mean and variance use Welford's single-pass update, which avoids the
//! cancellation of the naive `E[x²] - E[x]²` formula when values are large
//! and close together (e.g. nanosecond timings of similar runs).

// Counts are converted to f64 for averaging
#![allow(clippy::cast_precision_loss)]

use serde::Serialize;

/// Running mean/variance accumulator (Welford).
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: usize,
    mean: f64,
    /// Sum of squared deviations from the running mean.
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    #[must_use]
    pub fn min(&self) -> Option<f64> {
        (self.count > 0).then_some(self.min)
    }

    #[must_use]
    pub fn max(&self) -> Option<f64> {
        (self.count > 0).then_some(self.max)
    }

    /// Sample variance (n - 1 denominator). `None` with fewer than two values.
    #[must_use]
    pub fn sample_variance(&self) -> Option<f64> {
        (self.count > 1).then(|| self.m2 / (self.count - 1) as f64)
    }

    /// Sample standard deviation. `None` with fewer than two values.
    #[must_use]
    pub fn sample_std_dev(&self) -> Option<f64> {
        self.sample_variance().map(f64::sqrt)
    }
}

impl FromIterator<f64> for RunningStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = Self::new();
        for value in iter {
            stats.push(value);
        }
        stats
    }
}

/// Median of a set of values. `None` when empty.
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let len = sorted.len();
    if len % 2 == 0 {
        Some((sorted[len / 2 - 1] + sorted[len / 2]) / 2.0)
    } else {
        Some(sorted[len / 2])
    }
}

/// Five-number style summary of one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Descriptive {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; `0.0` for a single value.
    pub std_dev: f64,
}

impl Descriptive {
    /// Summarize `values`. `None` when empty.
    #[must_use]
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let stats: RunningStats = values.iter().copied().collect();
        Some(Self {
            min: stats.min()?,
            max: stats.max()?,
            mean: stats.mean()?,
            median: median(values)?,
            std_dev: stats.sample_std_dev().unwrap_or(0.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_stats_matches_two_pass() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let stats: RunningStats = values.iter().copied().collect();

        assert_eq!(stats.count(), 8);
        assert!((stats.mean().unwrap() - 5.0).abs() < 1e-12);
        // Sum of squared deviations is 32, sample variance 32 / 7
        assert!((stats.sample_variance().unwrap() - 32.0 / 7.0).abs() < 1e-12);
        assert_eq!(stats.min(), Some(2.0));
        assert_eq!(stats.max(), Some(9.0));
    }

    #[test]
    fn test_running_stats_is_stable_with_large_offset() {
        let offset = 1e9;
        let stats: RunningStats = [4.0, 7.0, 13.0, 16.0].iter().map(|v| v + offset).collect();
        assert!((stats.sample_variance().unwrap() - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_empty_and_single() {
        let empty = RunningStats::new();
        assert_eq!(empty.mean(), None);
        assert_eq!(empty.sample_std_dev(), None);

        let single: RunningStats = std::iter::once(3.5).collect();
        assert_eq!(single.mean(), Some(3.5));
        assert_eq!(single.sample_std_dev(), None);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn test_descriptive_single_value() {
        let summary = Descriptive::from_values(&[2.0]).unwrap();
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 2.0);
        assert_eq!(summary.mean, 2.0);
        assert_eq!(summary.median, 2.0);
        assert_eq!(summary.std_dev, 0.0);
        assert!(Descriptive::from_values(&[]).is_none());
    }
}
