//! Observation table: sorted, deduplicated records with derived metrics
//!
//! The table is the hand-off point between parsing and analysis. Its
//! invariants (sizes strictly increasing, hence unique) are checked when it is
//! constructed, so the analyzer never has to re-validate them.

// Per-unit metrics divide elapsed time by integer sizes
#![allow(clippy::cast_precision_loss)]

use crate::domain::{ComplexityClass, Observation, TableError};
use log::{debug, warn};
use serde::Serialize;

/// Smallest size for which a complexity ratio is computed.
const MIN_RATIO_SIZE: u64 = 2;

/// One row of the table: an observation plus its derived fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableEntry {
    pub size: u64,
    pub elapsed: f64,
    /// Source line that completed the underlying record.
    pub line: usize,
    /// `elapsed / size`
    pub time_per_unit: f64,
    /// Percent change of `elapsed` from the previous entry.
    ///
    /// `None` for the first entry, and when the previous entry took zero time.
    pub growth_pct: Option<f64>,
    /// `elapsed / f(size)` for the table's complexity class.
    ///
    /// `None` when `size < 2` or `f(size)` is zero; such entries are excluded
    /// from ratio statistics.
    pub complexity_ratio: Option<f64>,
}

impl TableEntry {
    /// Derive an entry from an observation and the entry before it.
    #[must_use]
    pub fn derive(
        observation: &Observation,
        previous: Option<&TableEntry>,
        class: ComplexityClass,
    ) -> Self {
        let size = observation.size();
        let elapsed = observation.elapsed();
        Self {
            size,
            elapsed,
            line: observation.line(),
            time_per_unit: elapsed / size as f64,
            growth_pct: previous.and_then(|prev| growth_pct(prev.elapsed, elapsed)),
            complexity_ratio: complexity_ratio(class, size, elapsed),
        }
    }
}

/// Percent change from `previous` to `current`, undefined for a zero baseline.
fn growth_pct(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}

/// `elapsed / f(size)`, or `None` when the reference value is unusable.
#[must_use]
pub fn complexity_ratio(class: ComplexityClass, size: u64, elapsed: f64) -> Option<f64> {
    if size < MIN_RATIO_SIZE {
        return None;
    }
    let reference = class.reference(size);
    if !reference.is_finite() || reference <= 0.0 {
        return None;
    }
    Some(elapsed / reference)
}

/// Ordered, deduplicated observations annotated with derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationTable {
    class: ComplexityClass,
    entries: Vec<TableEntry>,
}

impl ObservationTable {
    /// Build a table from pre-derived entries, checking that sizes are
    /// strictly increasing.
    ///
    /// # Errors
    /// Returns [`TableError::NotStrictlyIncreasing`] at the first entry whose
    /// size does not exceed the one before it.
    pub fn from_entries(
        class: ComplexityClass,
        entries: Vec<TableEntry>,
    ) -> Result<Self, TableError> {
        for (index, pair) in entries.windows(2).enumerate() {
            if pair[1].size <= pair[0].size {
                return Err(TableError::NotStrictlyIncreasing {
                    index: index + 1,
                    previous: pair[0].size,
                    size: pair[1].size,
                });
            }
        }
        Ok(Self { class, entries })
    }

    #[must_use]
    pub fn class(&self) -> ComplexityClass {
        self.class
    }

    #[must_use]
    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&TableEntry> {
        self.entries.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&TableEntry> {
        self.entries.last()
    }

    /// Complexity ratios of the entries eligible for ratio statistics.
    pub fn eligible_ratios(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().filter_map(|entry| entry.complexity_ratio)
    }

    /// Number of entries excluded from ratio statistics.
    #[must_use]
    pub fn excluded_ratio_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.complexity_ratio.is_none()).count()
    }
}

/// Output of [`build_table`].
#[derive(Debug, Clone, PartialEq)]
pub struct TableBuild {
    pub table: ObservationTable,
    /// Observations discarded because a later one had the same size.
    pub duplicates_dropped: usize,
}

/// Sort observations by size, keep the latest measurement for each size, and
/// derive per-entry metrics in one forward pass.
///
/// The sort is stable, so among equal sizes the last one in input order is
/// the one kept.
///
/// # Errors
/// Returns [`TableError`] if the deduplicated entries fail the ordering check
/// of [`ObservationTable::from_entries`].
pub fn build_table(
    observations: &[Observation],
    class: ComplexityClass,
) -> Result<TableBuild, TableError> {
    let mut sorted = observations.to_vec();
    sorted.sort_by_key(Observation::size);

    let mut unique: Vec<Observation> = Vec::with_capacity(sorted.len());
    let mut duplicates_dropped = 0;
    for observation in sorted {
        if let Some(kept) = unique.last_mut().filter(|kept| kept.size() == observation.size()) {
            debug!(
                "size {} measured again on line {}, replacing line {}",
                observation.size(),
                observation.line(),
                kept.line()
            );
            *kept = observation;
            duplicates_dropped += 1;
            continue;
        }
        unique.push(observation);
    }

    if duplicates_dropped > 0 {
        warn!("{duplicates_dropped} duplicate size(s) replaced by a later measurement");
    }

    let mut entries: Vec<TableEntry> = Vec::with_capacity(unique.len());
    for observation in &unique {
        let entry = TableEntry::derive(observation, entries.last(), class);
        entries.push(entry);
    }

    let excluded = entries.iter().filter(|e| e.complexity_ratio.is_none()).count();
    if excluded > 0 {
        debug!("{excluded} entr(ies) excluded from {class} ratio statistics");
    }

    let table = ObservationTable::from_entries(class, entries)?;
    Ok(TableBuild { table, duplicates_dropped })
}
