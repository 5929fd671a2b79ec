//! Interval-to-row packing for the visual timeline.
//!
//! Segments that overlap in time must not share a display row. `pack_rows`
//! uses greedy first-fit over start-sorted intervals, which for interval
//! graphs is optimal: the number of rows equals the largest number of
//! intervals active at any single instant.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::MotionError;

/// A half-open `[start, end)` span in animation time (milliseconds).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    #[inline]
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Checked constructor for untrusted input: both ends must be finite and
    /// `start <= end`.
    pub fn try_new(start: f64, end: f64) -> Result<Self, MotionError> {
        if start.is_finite() && end.is_finite() && start <= end {
            Ok(Self { start, end })
        } else {
            Err(MotionError::InvalidInterval { start, end })
        }
    }

    #[inline]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Half-open overlap test; touching endpoints do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// An interval tagged with the display row it was packed into.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RowAssignment {
    pub start: f64,
    pub end: f64,
    pub row: usize,
}

impl RowAssignment {
    #[inline]
    pub fn interval(&self) -> Interval {
        Interval::new(self.start, self.end)
    }
}

/// Assign every interval to the lowest-index row that is free at its start.
///
/// Output order matches input order. Ties on `start` are broken by input
/// position, so the result is deterministic.
pub fn pack_rows<I>(intervals: I) -> Vec<RowAssignment>
where
    I: IntoIterator<Item = Interval>,
{
    let intervals: Vec<Interval> = intervals.into_iter().collect();

    let mut order: Vec<usize> = (0..intervals.len()).collect();
    // sort_by is stable.
    order.sort_by(|&l, &r| cmp_f64(intervals[l].start, intervals[r].start));

    // End time of the last interval placed on each open row.
    let mut row_ends: Vec<f64> = Vec::new();
    let mut rows = vec![0usize; intervals.len()];

    for idx in order {
        let iv = intervals[idx];
        let row = match row_ends.iter().position(|&end| end <= iv.start) {
            Some(row) => row,
            None => {
                row_ends.push(iv.end);
                row_ends.len() - 1
            }
        };
        row_ends[row] = iv.end;
        rows[idx] = row;
    }

    log::debug!(
        "packed {} intervals into {} rows",
        intervals.len(),
        row_ends.len()
    );

    intervals
        .iter()
        .zip(rows)
        .map(|(iv, row)| RowAssignment {
            start: iv.start,
            end: iv.end,
            row,
        })
        .collect()
}

/// Number of distinct rows used by a packing.
pub fn row_count(assignments: &[RowAssignment]) -> usize {
    assignments.iter().map(|a| a.row + 1).max().unwrap_or(0)
}

/// Largest `end` across the packing, or `0` when empty.
pub fn total_duration(assignments: &[RowAssignment]) -> f64 {
    assignments.iter().fold(0.0, |acc, a| acc.max(a.end))
}

/// Maximum number of intervals simultaneously active, computed by a sweep
/// line. At equal instants ends are processed before starts so touching
/// intervals do not count as concurrent.
///
/// Matches `row_count(&pack_rows(..))` for intervals of positive length.
/// Zero-length intervals are empty under half-open semantics and never count
/// here, while the packer still gives them a row at their start instant.
pub fn max_concurrency(intervals: &[Interval]) -> usize {
    let mut events: Vec<(f64, i32)> = Vec::with_capacity(intervals.len() * 2);
    for iv in intervals {
        events.push((iv.start, 1));
        events.push((iv.end, -1));
    }
    events.sort_by(|l, r| cmp_f64(l.0, r.0).then(l.1.cmp(&r.1)));

    let mut active = 0i32;
    let mut peak = 0i32;
    for (_, delta) in events {
        active += delta;
        peak = peak.max(active);
    }
    peak as usize
}

/// Total order for sort keys. `-0.0` ties with `0.0`; NaN sorts after all
/// numbers (before them if its sign bit is set).
fn cmp_f64(a: f64, b: f64) -> Ordering {
    let unsigned_zero = |v: f64| if v == 0.0 { 0.0 } else { v };
    unsigned_zero(a).total_cmp(&unsigned_zero(b))
}
