//! Piecewise meter and key timeline
//!
//! A [`Timeline`] holds the meter changes of a piece as a list of
//! [`Boundary`] spans and the key changes as bar-anchored entries. It maps
//! `(bar, beat)` coordinates to ticks and partitions an event sequence into
//! renderable [`Section`]s.
//!
//! Boundaries are rebuilt from scratch on every meter change because each
//! span's start tick depends on every bar before it. Key changes are stored
//! by bar and re-resolved to ticks on each rebuild.

use crate::errors::LayoutError;
use crate::layout::{Boundary, Meter};
use crate::models::{Event, EventSequence, Interval, KeySignature, Payload, Tick};
use crate::renderers::lilypond::duration_to_lilypond;

/// A key change taking effect on the first beat of `bar`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChange {
    pub bar: i64,
    pub tick: Tick,
    pub key: KeySignature,
}

/// One constant-meter, constant-key stretch of a sequence, ready to render
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub boundary: Boundary,
    pub key: KeySignature,
    pub events: EventSequence,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    resolution: Tick,
    /// Pickup length in beats of the first meter
    partial: i64,
    meters: Vec<(i64, Meter)>,
    boundaries: Vec<Boundary>,
    initial_key: KeySignature,
    keys: Vec<KeyChange>,
}

fn check_partial(beats: i64, meter: &Meter) -> Result<(), LayoutError> {
    if beats < 0 || beats > meter.beats {
        return Err(LayoutError::InvalidPartial {
            beats,
            bar_beats: meter.beats,
        });
    }
    Ok(())
}

impl Timeline {
    /// Timeline in 4/4 from bar 1, C major
    pub fn new(resolution: Tick) -> Result<Self, LayoutError> {
        let mut timeline = Timeline {
            resolution,
            partial: 0,
            meters: Vec::new(),
            boundaries: Vec::new(),
            initial_key: KeySignature::C_MAJOR,
            keys: Vec::new(),
        };
        timeline.set_meter(1, Meter::COMMON)?;
        Ok(timeline)
    }

    /// Replace the opening meter
    pub fn with_meter(mut self, meter: Meter) -> Result<Self, LayoutError> {
        self.set_meter(1, meter)?;
        Ok(self)
    }

    /// Start with a pickup of `beats` beats before bar 1
    pub fn with_partial(mut self, beats: i64) -> Result<Self, LayoutError> {
        if let Some((_, first)) = self.meters.first() {
            check_partial(beats, first)?;
        }
        self.partial = beats;
        self.rebuild();
        Ok(self)
    }

    pub fn with_key(mut self, key: KeySignature) -> Self {
        self.initial_key = key;
        self
    }

    pub fn resolution(&self) -> Tick {
        self.resolution
    }

    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }

    pub fn key_changes(&self) -> &[KeyChange] {
        &self.keys
    }

    /// Register a meter change at `start_bar`, replacing any earlier change
    /// registered for the same bar.
    pub fn set_meter(&mut self, start_bar: i64, meter: Meter) -> Result<(), LayoutError> {
        if meter.beats <= 0 || meter.bar_length(self.resolution) <= 0 {
            return Err(LayoutError::InvalidMeter {
                meter,
                resolution: self.resolution,
            });
        }

        let opens = self.meters.first().map_or(true, |(first, _)| start_bar <= *first);
        if opens {
            check_partial(self.partial, &meter)?;
        }

        self.meters.retain(|(bar, _)| *bar != start_bar);
        self.meters.push((start_bar, meter));
        self.meters.sort_by_key(|(bar, _)| *bar);
        self.rebuild();
        Ok(())
    }

    fn rebuild(&mut self) {
        let mut current_bar = 1;
        let mut bar_length = 0;
        let mut ticks = 0;

        if self.partial != 0 {
            if let Some((_, first)) = self.meters.first() {
                bar_length = first.bar_length(self.resolution);
                ticks = self.partial * bar_length / first.beats;
            }
        }

        self.boundaries.clear();
        for (start_bar, meter) in &self.meters {
            ticks += bar_length * (start_bar - current_bar);
            bar_length = meter.bar_length(self.resolution);
            self.boundaries
                .push(Boundary::new(*start_bar, ticks, bar_length, meter.beats));
            current_bar = *start_bar;
        }

        let keys = std::mem::take(&mut self.keys);
        self.keys = keys
            .into_iter()
            .map(|change| KeyChange {
                tick: self.beat(change.bar, 1, None),
                ..change
            })
            .collect();
        self.keys.sort_by_key(|change| change.tick);

        log::debug!("Rebuilt timeline: {:?}", self.boundaries);
    }

    /// Register a key change on the first beat of `bar`
    pub fn set_key(&mut self, bar: i64, key: KeySignature) {
        self.keys.retain(|change| change.bar != bar);
        self.keys.push(KeyChange {
            bar,
            tick: self.beat(bar, 1, None),
            key,
        });
        self.keys.sort_by_key(|change| change.tick);
    }

    fn boundary_for_bar(&self, bar: i64) -> Boundary {
        let fallback = self.boundaries.first().copied().unwrap_or(Boundary {
            start_bar: 1,
            start_tick: 0,
            bar_length: Meter::COMMON.bar_length(self.resolution),
            divisions: Meter::COMMON.beats,
        });
        self.boundaries
            .iter()
            .rev()
            .find(|b| b.start_bar <= bar)
            .copied()
            .unwrap_or(fallback)
    }

    /// Tick of `beat` (1-based) in `bar`.
    ///
    /// `divisions` overrides the meter's beat count to address a finer grid.
    pub fn beat(&self, bar: i64, beat: i64, divisions: Option<i64>) -> Tick {
        let b = self.boundary_for_bar(bar);
        let bar_start = b.start_tick + b.bar_length * (bar - b.start_bar);
        if beat == 1 {
            return bar_start;
        }
        let divisions = divisions.unwrap_or(b.divisions);
        bar_start + (beat - 1) * b.bar_length / divisions
    }

    /// Key in effect at the start of `bar`
    pub fn key(&self, bar: i64) -> KeySignature {
        self.key_at(self.beat(bar, 1, None))
    }

    fn key_at(&self, tick: Tick) -> KeySignature {
        self.keys
            .iter()
            .take_while(|change| change.tick <= tick)
            .last()
            .map_or(self.initial_key, |change| change.key)
    }

    /// Boundary in effect at `tick`
    pub fn bar_info(&self, tick: Tick) -> Option<Boundary> {
        self.boundaries
            .iter()
            .take_while(|b| b.start_tick <= tick)
            .last()
            .copied()
    }

    /// Bar number containing `tick`
    pub fn bar_at(&self, tick: Tick) -> Result<i64, LayoutError> {
        self.bar_info(tick)
            .ok_or(LayoutError::NoBoundary { tick })?
            .bar_at(tick)
    }

    /// Ticks spanned by bar `n`
    pub fn bar(&self, n: i64) -> Interval {
        self.get_range((n, 1), (n + 1, 1))
    }

    /// Ticks spanned by bars `first` through `last` inclusive
    pub fn bars(&self, first: i64, last: i64) -> Interval {
        self.get_range((first, 1), (last + 1, 1))
    }

    /// Ticks between two `(bar, beat)` positions
    pub fn get_range(&self, start: (i64, i64), stop: (i64, i64)) -> Interval {
        Interval::new(
            self.beat(start.0, start.1, None),
            self.beat(stop.0, stop.1, None),
        )
    }

    /// Partition a sequence at every meter and key change.
    ///
    /// Each section opens with a `\\time` directive. The first section and
    /// every section starting at a key change also carry a key signature
    /// marker. With a pickup, ticks before bar 1 form their own section
    /// announced by `\\partial`. Events before tick 0 are not covered.
    pub fn split_sections(&self, sequence: &EventSequence) -> Result<Vec<Section>, LayoutError> {
        let mut sections = Vec::new();
        let time = sequence.time();
        let first = match self.boundaries.first() {
            Some(first) => *first,
            None => return Ok(sections),
        };
        if time.is_empty() {
            return Ok(sections);
        }
        if time.start < 0 {
            log::warn!("Events before tick 0 in {} are left out", time);
        }

        let has_pickup = self.partial > 0 && time.start < first.start_tick;
        if has_pickup {
            sections.push(self.pickup_section(sequence, &first)?);
        }

        for (index, boundary) in self.boundaries.iter().enumerate() {
            if boundary.start_tick >= time.stop {
                break;
            }
            let span_stop = self
                .boundaries
                .get(index + 1)
                .map_or(time.stop, |next| next.start_tick.min(time.stop));
            let span = Interval::new(boundary.start_tick, span_stop);

            let mut section = sequence.slice(span)?;
            if index > 0 || !has_pickup {
                section.add_directive(
                    span.start,
                    format!("\\time {}", boundary.meter(self.resolution)),
                )?;
            }

            let mut key = self.key_at(span.start);
            if sections.is_empty() || self.keys.iter().any(|change| change.tick == span.start) {
                section.insert(Event::marker(span.start, Payload::KeySignature(key)))?;
            }

            let interior: Vec<KeyChange> = self
                .keys
                .iter()
                .filter(|change| change.tick > span.start && change.tick < span.stop)
                .copied()
                .collect();
            for change in interior {
                let (head, mut tail) = section.split(change.tick)?;
                sections.push(Section {
                    boundary: *boundary,
                    key,
                    events: head,
                });
                tail.insert(Event::marker(change.tick, Payload::KeySignature(change.key)))?;
                key = change.key;
                section = tail;
            }

            sections.push(Section {
                boundary: *boundary,
                key,
                events: section,
            });
        }
        Ok(sections)
    }

    /// The incomplete bar before bar 1, laid out as the tail of a bar 0
    fn pickup_section(&self, sequence: &EventSequence, first: &Boundary) -> Result<Section, LayoutError> {
        let boundary = Boundary::new(
            0,
            first.start_tick - first.bar_length,
            first.bar_length,
            first.divisions,
        );
        let span = Interval::new(0, first.start_tick.min(sequence.time().stop));

        let mut events = sequence.slice(span)?;
        events.add_directive(0, format!("\\time {}", first.meter(self.resolution)))?;
        events.add_directive(
            0,
            format!(
                "\\partial {}",
                duration_to_lilypond(first.start_tick, self.resolution)
            ),
        )?;
        let key = self.key_at(0);
        events.insert(Event::marker(0, Payload::KeySignature(key)))?;

        Ok(Section {
            boundary,
            key,
            events,
        })
    }
}
