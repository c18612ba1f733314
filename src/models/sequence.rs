//! Ordered event container
//!
//! An [`EventSequence`] owns its events in start order together with a cached
//! aggregate interval and the resolution (ticks per quarter note) its ticks are
//! expressed in. Sequences nest: a sequence wrapped in
//! [`Payload::Sequence`] is an ordinary member of its parent.
//!
//! Gaps and overlaps between members are allowed. With validation enabled
//! (the default) every mutation re-checks that members stay inside the
//! aggregate and in start order, failing with a [`SequenceError`] otherwise.

use std::fmt;

use crate::errors::{IntervalError, SequenceError};
use crate::models::event::{Event, Payload};
use crate::models::interval::{Interval, Tick};

/// Ticks per quarter note used when nothing else is specified
pub const DEFAULT_RESOLUTION: Tick = 96;

/// Selector for [`EventSequence::get`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// Events starting exactly on this tick
    Tick(Tick),
    /// Events lying entirely inside this range
    Range(Interval),
}

impl From<Tick> for Window {
    fn from(tick: Tick) -> Self {
        Window::Tick(tick)
    }
}

impl From<Interval> for Window {
    fn from(range: Interval) -> Self {
        Window::Range(range)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventSequence {
    events: Vec<Event>,
    time: Interval,
    resolution: Tick,
    validating: bool,
}

impl EventSequence {
    pub fn new(resolution: Tick) -> Self {
        Self {
            events: Vec::new(),
            time: Interval::EMPTY,
            resolution,
            validating: true,
        }
    }

    /// Build from loose events; they are sorted and the aggregate is their union
    pub fn from_events(mut events: Vec<Event>, resolution: Tick) -> Self {
        events.sort_by_key(Event::time);
        let time = Interval::spanning(events.iter().map(Event::time));
        Self {
            events,
            time,
            resolution,
            validating: true,
        }
    }

    /// Override the aggregate interval, e.g. to include leading or trailing silence
    pub fn with_time(mut self, time: Interval) -> Self {
        self.time = time;
        self
    }

    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validating = enabled;
        self
    }

    pub fn time(&self) -> Interval {
        self.time
    }

    pub fn resolution(&self) -> Tick {
        self.resolution
    }

    pub fn duration(&self) -> Tick {
        self.time.length()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    pub fn payloads(&self) -> Vec<&Payload> {
        self.events.iter().map(Event::payload).collect()
    }

    /// True when no member starts before the previous one has stopped
    pub fn is_sequential(&self) -> bool {
        self.events
            .windows(2)
            .all(|pair| pair[1].time().start >= pair[0].time().stop)
    }

    /// Check the aggregate and ordering invariants.
    ///
    /// Zero-length markers always pass. Every mutation keeps members sorted,
    /// so [`SequenceError::JumpsBack`] only fires if that ordering was broken.
    pub fn validate(&self) -> Result<(), SequenceError> {
        let mut last_start: Option<Tick> = None;
        for event in &self.events {
            let time = event.time();
            if time.is_marker() {
                continue;
            }
            if !self.time.contains(time) {
                return Err(SequenceError::Outside {
                    event: time,
                    time: self.time,
                });
            }
            if last_start.map_or(false, |start| time.start < start) {
                return Err(SequenceError::JumpsBack { event: time });
            }
            last_start = Some(time.start);
        }
        Ok(())
    }

    /// Add one event.
    ///
    /// With `sequential` set the event must not start before the current
    /// aggregate stop. Otherwise an out-of-order event is accepted and lands
    /// after any members with an equal interval. A rejected event leaves the
    /// sequence untouched.
    pub fn append(&mut self, event: Event, sequential: bool) -> Result<&mut Self, SequenceError> {
        let time = event.time();
        if sequential && !time.is_marker() && !self.time.is_empty() && time.start < self.time.stop {
            return Err(SequenceError::Backwards {
                event: time,
                stop: self.time.stop,
            });
        }

        let index = self.events.partition_point(|member| member.time() <= time);
        let previous = self.time;
        self.events.insert(index, event);
        self.time = self.time.union(time);

        if self.validating {
            if let Err(err) = self.validate() {
                self.events.remove(index);
                self.time = previous;
                return Err(err);
            }
        }
        Ok(self)
    }

    pub fn insert(&mut self, event: Event) -> Result<&mut Self, SequenceError> {
        self.append(event, false)
    }

    /// Insert a zero-length directive such as `\ottava #1`
    pub fn add_directive(&mut self, tick: Tick, text: impl Into<String>) -> Result<&mut Self, SequenceError> {
        self.insert(Event::marker(tick, Payload::Directive(text.into())))
    }

    /// Bulk insert of events already at this sequence's resolution.
    ///
    /// Sorting and validation run once at the end. On failure the sequence
    /// is restored to its state before the call.
    pub fn extend_events<I: IntoIterator<Item = Event>>(&mut self, events: I) -> Result<&mut Self, SequenceError> {
        let incoming: Vec<Event> = events.into_iter().collect();
        if incoming.is_empty() {
            return Ok(self);
        }

        let mut events = self.events.clone();
        let mut time = self.time;
        for event in incoming {
            time = time.union(event.time());
            events.push(event);
        }
        // stable: events with equal intervals keep insertion order
        events.sort_by_key(Event::time);

        let candidate = EventSequence {
            events,
            time,
            resolution: self.resolution,
            validating: self.validating,
        };
        if candidate.validating {
            candidate.validate()?;
        }
        *self = candidate;
        Ok(self)
    }

    /// Merge another sequence, rescaling it first if its resolution differs
    pub fn extend(&mut self, other: EventSequence) -> Result<&mut Self, SequenceError> {
        if other.is_empty() {
            return Ok(self);
        }
        let other = if other.resolution != self.resolution {
            other.at_resolution(self.resolution)
        } else {
            other
        };
        self.extend_events(other.events)
    }

    /// Append `other` so that it starts `gap` ticks after the current stop.
    ///
    /// Into an empty sequence the passage keeps its own position, moved by `gap`.
    pub fn paste(&mut self, other: EventSequence, gap: Tick) -> Result<&mut Self, SequenceError> {
        if other.is_empty() {
            return Ok(self);
        }
        let other = if other.resolution != self.resolution {
            other.at_resolution(self.resolution)
        } else {
            other
        };

        let offset = if self.time.is_empty() {
            gap
        } else {
            self.time.stop - other.time.start + gap
        };
        log::debug!("Pasting {} events at offset {}", other.len(), offset);

        self.extend_events(other.events.iter().map(|event| event.shift(offset)))
    }

    /// Deep copy with every tick converted to `resolution`
    pub fn at_resolution(&self, resolution: Tick) -> EventSequence {
        if resolution == self.resolution {
            return self.clone();
        }
        self.rescaled(resolution, self.resolution)
    }

    pub(crate) fn rescaled(&self, numerator: Tick, denominator: Tick) -> EventSequence {
        EventSequence {
            events: self
                .events
                .iter()
                .map(|event| event.scale(numerator, denominator))
                .collect(),
            time: self.time.scale(numerator, denominator),
            resolution: self.resolution * numerator / denominator,
            validating: self.validating,
        }
    }

    pub(crate) fn shifted(&self, offset: Tick) -> EventSequence {
        EventSequence {
            events: self.events.iter().map(|event| event.shift(offset)).collect(),
            time: if self.time.is_empty() {
                self.time
            } else {
                self.time.shift(offset)
            },
            resolution: self.resolution,
            validating: self.validating,
        }
    }

    /// Select members without cutting them.
    ///
    /// A tick selects the events starting there; a range selects the events
    /// that lie entirely inside it and becomes the result's aggregate.
    pub fn get(&self, window: impl Into<Window>) -> EventSequence {
        let selected = match window.into() {
            Window::Tick(tick) => {
                let events: Vec<Event> = self
                    .events
                    .iter()
                    .filter(|event| event.time().start == tick)
                    .cloned()
                    .collect();
                EventSequence::from_events(events, self.resolution)
            }
            Window::Range(range) => {
                let events: Vec<Event> = self
                    .events
                    .iter()
                    .filter(|event| range.contains(event.time()))
                    .cloned()
                    .collect();
                EventSequence::from_events(events, self.resolution).with_time(range)
            }
        };
        selected.with_validation(self.validating)
    }

    /// Cut every member overlapping `window` down to the window.
    ///
    /// Notes that continue past the window's stop come back tied.
    pub fn slice(&self, window: Interval) -> Result<EventSequence, IntervalError> {
        let mut events = Vec::new();
        for event in &self.events {
            if window.overlaps(event.time()) {
                events.push(event.slice(window)?);
            }
        }
        Ok(EventSequence {
            events,
            time: window,
            resolution: self.resolution,
            validating: self.validating,
        })
    }

    /// Two slices meeting at `position`, which must lie within the aggregate
    pub fn split(&self, position: Tick) -> Result<(EventSequence, EventSequence), IntervalError> {
        if self.time.is_empty() || position < self.time.start || position > self.time.stop {
            return Err(IntervalError::Disjoint {
                left: self.time,
                right: Interval::at(position),
            });
        }
        Ok((
            self.slice(Interval::new(self.time.start, position))?,
            self.slice(Interval::new(position, self.time.stop))?,
        ))
    }

    /// All note events, descending into nested sequences
    pub fn note_events(&self) -> Vec<&Event> {
        let mut notes = Vec::new();
        for event in &self.events {
            match event.payload() {
                Payload::Note(_) => notes.push(event),
                Payload::Sequence(nested) => notes.extend(nested.note_events()),
                _ => {}
            }
        }
        notes
    }

    /// Append an attribute to every note, nested ones included
    pub fn add_attr(&mut self, attr: &str) {
        for event in &mut self.events {
            match event.payload_mut() {
                Payload::Note(note) => note.add_attr(attr),
                Payload::Sequence(nested) => nested.add_attr(attr),
                _ => {}
            }
        }
    }
}

impl Default for EventSequence {
    fn default() -> Self {
        Self::new(DEFAULT_RESOLUTION)
    }
}

impl<'a> IntoIterator for &'a EventSequence {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl fmt::Display for EventSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.events.is_empty() || self.events.len() > 20 {
            return write!(f, "[{} events]{}", self.events.len(), self.time);
        }
        let members: Vec<String> = self.events.iter().map(|event| event.to_string()).collect();
        write!(f, "[{}]{}", members.join(", "), self.time)
    }
}
