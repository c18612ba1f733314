//! Error types for event sequencing and bar layout
//!
//! Interval and sequencing errors are fatal to the operation that raised
//! them and propagate to the caller. Rendering never fails on malformed
//! input: overlapping events are logged and skipped instead.

use thiserror::Error;

use crate::layout::Meter;
use crate::models::{Interval, Tick};

/// Interval algebra failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntervalError {
    /// The two ranges share no ticks (adjacent ranges included)
    #[error("{left} doesn't intersect {right}")]
    Disjoint { left: Interval, right: Interval },
}

/// Ordering violations in an event sequence
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// A sequential append tried to go back in time
    #[error("Cannot go back in time: {event} starts before {stop}")]
    Backwards { event: Interval, stop: Tick },

    /// A member event lies outside the aggregate time of the sequence
    #[error("{event} outside of {time}")]
    Outside { event: Interval, time: Interval },

    /// Member events are not in start order
    #[error("Sequence jumps back at {event}")]
    JumpsBack { event: Interval },

    /// A voice list has no voice of this name
    #[error("No voice named {name}")]
    UnknownVoice { name: String },

    #[error(transparent)]
    Interval(#[from] IntervalError),
}

/// Bar and timeline lookup failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// A boundary was asked about a tick before its first bar
    #[error("Cannot calculate bar at {tick}, prior to {start_tick}")]
    BeforeBoundary { tick: Tick, start_tick: Tick },

    /// The meter has no positive bar length at this resolution
    #[error("Invalid meter {meter} at resolution {resolution}")]
    InvalidMeter { meter: Meter, resolution: Tick },

    /// A pickup must be between zero and one full bar of the opening meter
    #[error("Pickup of {beats} beats doesn't fit a bar of {bar_beats}")]
    InvalidPartial { beats: i64, bar_beats: i64 },

    /// No boundary of the timeline covers the tick
    #[error("No bar boundary in effect at {tick}")]
    NoBoundary { tick: Tick },

    #[error(transparent)]
    Interval(#[from] IntervalError),

    #[error(transparent)]
    Sequence(#[from] SequenceError),
}

/// Failures reading note literals and MIDI files
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A literal token is not of the form `NAME-DURATION`
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Unknown note name in a literal token
    #[error("Unknown note name: {0}")]
    UnknownNote(String),

    /// Duration is not a non-negative integer
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    /// Meter text is not of the form `beats/unit`
    #[error("Invalid meter: {0}")]
    InvalidMeter(String),

    /// MIDI data could not be read
    #[error("MIDI import failed: {0}")]
    Midi(String),

    #[error(transparent)]
    Sequence(#[from] SequenceError),
}
