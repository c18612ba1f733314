//! Half-open tick intervals
//!
//! Every timed object occupies an [`Interval`] on the tick axis. Containment
//! and overlap are half-open with one exception: a zero-length interval
//! sitting exactly on another interval's start counts as inside it. A
//! directive placed on a bar's first tick therefore belongs to that bar,
//! while one placed on the bar's closing tick does not.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::IntervalError;

/// Smallest unit of musical time
pub type Tick = i64;

/// A `[start, stop)` range of ticks.
///
/// Ordering is by `start`, then `stop`, so a zero-length marker sorts ahead
/// of a sounding event that starts on the same tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Interval {
    pub start: Tick,
    pub stop: Tick,
}

impl Interval {
    /// Sentinel for "unset", used as the aggregate of an empty sequence
    pub const EMPTY: Interval = Interval { start: -1, stop: -1 };

    pub fn new(start: Tick, stop: Tick) -> Self {
        debug_assert!(stop >= start, "interval ({}, {}) runs backwards", start, stop);
        Interval { start, stop }
    }

    /// Zero-length interval marking a single tick
    pub fn at(tick: Tick) -> Self {
        Interval { start: tick, stop: tick }
    }

    /// Smallest interval covering all the given ones, or [`Interval::EMPTY`]
    pub fn spanning<I: IntoIterator<Item = Interval>>(intervals: I) -> Self {
        intervals
            .into_iter()
            .fold(Interval::EMPTY, |acc, time| acc.union(time))
    }

    pub fn is_empty(&self) -> bool {
        *self == Interval::EMPTY
    }

    /// Length in ticks
    pub fn length(&self) -> Tick {
        self.stop - self.start
    }

    pub fn is_marker(&self) -> bool {
        self.length() == 0
    }

    pub fn union(&self, other: Interval) -> Interval {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return *self;
        }
        Interval {
            start: self.start.min(other.start),
            stop: self.stop.max(other.stop),
        }
    }

    /// Common part of two intervals.
    ///
    /// Fails unless the result lies inside both operands, so ranges that
    /// only touch at one end are disjoint.
    pub fn intersection(&self, other: Interval) -> Result<Interval, IntervalError> {
        let start = self.start.max(other.start);
        let stop = self.stop.min(other.stop);
        let disjoint = IntervalError::Disjoint {
            left: *self,
            right: other,
        };
        if stop < start {
            return Err(disjoint);
        }
        let common = Interval { start, stop };
        if !self.contains(common) || !other.contains(common) {
            return Err(disjoint);
        }
        Ok(common)
    }

    /// Whether `other` shares at least one tick with this interval.
    ///
    /// Not symmetric: `(20,30)` overlaps the marker `(20,20)` but the marker
    /// does not overlap `(20,30)`.
    pub fn overlaps(&self, other: Interval) -> bool {
        if other.stop <= self.start && !(other.is_marker() && other.start == self.start) {
            return false;
        }
        other.start < self.stop
    }

    pub fn contains(&self, other: Interval) -> bool {
        if other.stop > self.stop || other.start < self.start {
            return false;
        }
        if other.start >= self.stop {
            return other.is_marker() && other.start == self.start;
        }
        true
    }

    pub fn contains_tick(&self, tick: Tick) -> bool {
        self.contains(Interval::at(tick))
    }

    /// Rescale both ends by `numerator / denominator`, rounding down
    pub fn scale(&self, numerator: Tick, denominator: Tick) -> Interval {
        if self.is_empty() {
            return *self;
        }
        Interval {
            start: (self.start * numerator).div_euclid(denominator),
            stop: (self.stop * numerator).div_euclid(denominator),
        }
    }

    pub fn shift(&self, offset: Tick) -> Interval {
        Interval {
            start: self.start + offset,
            stop: self.stop + offset,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.start, self.stop)
    }
}
