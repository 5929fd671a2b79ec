//! Timeline extraction adapter and visual bar layout.
//!
//! Engines store their timelines however they like (linked nodes, private
//! offset fields). The only way intervals enter the packer is through an
//! adapter that yields an ordered, finite sequence of items convertible into
//! [`Interval`]; the sequence is consumed once.

use serde::{Deserialize, Serialize};

use crate::error::MotionError;
use crate::packing::{pack_rows, row_count, total_duration, Interval, RowAssignment};

/// Bar colours, cycled by input position.
pub const DEFAULT_PALETTE: [&str; 8] = [
    "#FF5733", "#33FF57", "#3357FF", "#FF33A1", "#A133FF", "#33FFF5", "#FF8F33", "#8FFF33",
];

pub fn default_palette() -> Vec<String> {
    DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect()
}

/// One child animation as an engine timeline reports it.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Position of the child on the parent timeline.
    pub offset: f64,
    pub delay: f64,
    pub duration: f64,
}

impl From<Segment> for Interval {
    fn from(s: Segment) -> Self {
        let start = s.offset + s.delay;
        Interval::new(start, start + s.duration)
    }
}

/// Drain a timeline source into intervals.
pub fn extract_intervals<S>(source: S) -> impl Iterator<Item = Interval>
where
    S: IntoIterator,
    S::Item: Into<Interval>,
{
    source.into_iter().map(Into::into)
}

/// Drain an untrusted source, failing on the first interval that is not
/// finite or ends before it starts.
pub fn checked_intervals<S>(source: S) -> Result<Vec<Interval>, MotionError>
where
    S: IntoIterator,
    S::Item: Into<Interval>,
{
    extract_intervals(source)
        .map(|iv| Interval::try_new(iv.start, iv.end))
        .collect()
}

/// Positioned bar for the visual timeline. Percentages are relative to the
/// timeline's total duration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BarLayout {
    pub row: usize,
    pub start: f64,
    pub end: f64,
    pub left_pct: f64,
    pub width_pct: f64,
    pub color: String,
}

/// Packed timeline: row assignments plus the derived total duration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    assignments: Vec<RowAssignment>,
    total_duration: f64,
}

impl Timeline {
    pub fn from_source<S>(source: S) -> Self
    where
        S: IntoIterator,
        S::Item: Into<Interval>,
    {
        let assignments = pack_rows(extract_intervals(source));
        let total_duration = total_duration(&assignments);
        Self {
            assignments,
            total_duration,
        }
    }

    /// Like [`Timeline::from_source`], but validates every interval first.
    pub fn try_from_source<S>(source: S) -> Result<Self, MotionError>
    where
        S: IntoIterator,
        S::Item: Into<Interval>,
    {
        Ok(Self::from_source(checked_intervals(source)?))
    }

    pub fn assignments(&self) -> &[RowAssignment] {
        &self.assignments
    }

    pub fn row_count(&self) -> usize {
        row_count(&self.assignments)
    }

    /// Largest segment end, `0` for an empty timeline.
    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// `time / total_duration`, or `0` when the timeline has no length.
    pub fn fraction_at(&self, time: f64) -> f64 {
        if self.total_duration > 0.0 {
            time / self.total_duration
        } else {
            0.0
        }
    }

    /// Lay bars out in input order. An empty palette falls back to
    /// [`DEFAULT_PALETTE`].
    pub fn layout(&self, palette: &[String]) -> Vec<BarLayout> {
        let fallback;
        let palette = if palette.is_empty() {
            fallback = default_palette();
            &fallback[..]
        } else {
            palette
        };
        self.assignments
            .iter()
            .enumerate()
            .map(|(i, a)| BarLayout {
                row: a.row,
                start: a.start,
                end: a.end,
                left_pct: self.fraction_at(a.start) * 100.0,
                width_pct: self.fraction_at(a.end - a.start) * 100.0,
                color: palette[i % palette.len()].clone(),
            })
            .collect()
    }
}
