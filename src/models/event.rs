//! Timed events and their payloads
//!
//! An [`Event`] pairs an [`Interval`] with a [`Payload`]. Events are values:
//! `shift`, `scale` and `slice` all return new events and leave the
//! original untouched.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::IntervalError;
use crate::models::interval::{Interval, Tick};
use crate::models::sequence::EventSequence;

/// MIDI-style pitch number (48 = the unmarked LilyPond `c`)
pub type Pitch = i32;

/// Attribute appended to a note fragment that continues past its window
pub const TIE: &str = "~";

/// A single pitch or a set of simultaneous pitches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotePitch {
    Single(Pitch),
    Chord(BTreeSet<Pitch>),
}

impl NotePitch {
    pub fn pitches(&self) -> Vec<Pitch> {
        match self {
            NotePitch::Single(pitch) => vec![*pitch],
            NotePitch::Chord(pitches) => pitches.iter().copied().collect(),
        }
    }

    fn from_set(pitches: BTreeSet<Pitch>) -> Self {
        if pitches.len() == 1 {
            if let Some(pitch) = pitches.iter().next() {
                return NotePitch::Single(*pitch);
            }
        }
        NotePitch::Chord(pitches)
    }
}

/// A sounding note or chord with its notation attributes (ties, slurs, accents)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub pitch: NotePitch,
    pub attributes: Vec<String>,
}

impl Note {
    pub fn new(pitch: Pitch) -> Self {
        Self {
            pitch: NotePitch::Single(pitch),
            attributes: Vec::new(),
        }
    }

    pub fn chord<I: IntoIterator<Item = Pitch>>(pitches: I) -> Self {
        Self {
            pitch: NotePitch::from_set(pitches.into_iter().collect()),
            attributes: Vec::new(),
        }
    }

    pub fn with_attr(mut self, attr: &str) -> Self {
        self.attributes.push(attr.to_string());
        self
    }

    pub fn add_attr(&mut self, attr: &str) {
        self.attributes.push(attr.to_string());
    }

    pub fn remove_attr(&mut self, attr: &str) {
        self.attributes.retain(|existing| existing != attr);
    }

    pub fn is_tied(&self) -> bool {
        self.attributes.iter().any(|attr| attr == TIE)
    }

    /// Combine two notes into one chord; attributes keep first-seen order
    pub fn merge(&self, other: &Note) -> Note {
        let pitches: BTreeSet<Pitch> = self
            .pitch
            .pitches()
            .into_iter()
            .chain(other.pitch.pitches())
            .collect();

        let mut attributes = self.attributes.clone();
        for attr in &other.attributes {
            if !attributes.contains(attr) {
                attributes.push(attr.clone());
            }
        }

        Note {
            pitch: NotePitch::from_set(pitches),
            attributes,
        }
    }
}

/// Rest token; `repeat > 1` marks a multi-measure rest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rest {
    pub marker: char,
    pub repeat: u32,
}

impl Rest {
    pub fn new() -> Self {
        Self { marker: 'r', repeat: 0 }
    }

    /// Whole-bar rest spanning `bars` consecutive bars
    pub fn multi_measure(bars: u32) -> Self {
        Self { marker: 'R', repeat: bars }
    }
}

impl Default for Rest {
    fn default() -> Self {
        Self::new()
    }
}

/// Key signature as a position on the circle of fifths
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeySignature {
    /// Sharps (positive) or flats (negative), -7 to +7
    pub fifths: i8,
    #[serde(default)]
    pub minor: bool,
}

impl KeySignature {
    pub const C_MAJOR: KeySignature = KeySignature { fifths: 0, minor: false };

    pub fn major(fifths: i8) -> Self {
        Self { fifths, minor: false }
    }

    pub fn minor(fifths: i8) -> Self {
        Self { fifths, minor: true }
    }

    /// Whether black keys are spelled with sharps in this key
    pub fn prefers_sharps(&self) -> bool {
        self.fifths >= 0
    }
}

/// What happens during an event's interval
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Note(Note),
    Rest(Rest),
    /// Raw markup such as `\time 3/4` or `\ottava #1`
    Directive(String),
    Comment(String),
    /// Marks the tick where the numbered bar begins
    BarCheck(i64),
    KeySignature(KeySignature),
    /// Nested group of simultaneous or grouped events
    Sequence(EventSequence),
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Note(note) => {
                match &note.pitch {
                    NotePitch::Single(pitch) => write!(f, "{}", pitch)?,
                    NotePitch::Chord(pitches) => {
                        let names: Vec<String> = pitches.iter().map(|p| p.to_string()).collect();
                        write!(f, "<{}>", names.join(" "))?
                    }
                }
                write!(f, "{}", note.attributes.concat())
            }
            Payload::Rest(rest) if rest.repeat > 1 => write!(f, "{}*{}", rest.marker, rest.repeat),
            Payload::Rest(rest) => write!(f, "{}", rest.marker),
            Payload::Directive(text) => write!(f, "'{}'", text),
            Payload::Comment(text) => write!(f, "%{}", text),
            Payload::BarCheck(bar) => write!(f, "|{}", bar),
            Payload::KeySignature(key) => {
                write!(f, "key({}{})", key.fifths, if key.minor { "m" } else { "" })
            }
            Payload::Sequence(sequence) => write!(f, "{}", sequence),
        }
    }
}

/// A payload occupying an interval of time
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    time: Interval,
    payload: Payload,
}

impl Event {
    pub fn new(time: Interval, payload: Payload) -> Self {
        Self { time, payload }
    }

    pub fn note(time: Interval, note: Note) -> Self {
        Self::new(time, Payload::Note(note))
    }

    /// Zero-length event at `tick`
    pub fn marker(tick: Tick, payload: Payload) -> Self {
        Self::new(Interval::at(tick), payload)
    }

    /// Wrap a whole sequence as a single event spanning its aggregate time
    pub fn group(sequence: EventSequence) -> Self {
        Self {
            time: sequence.time(),
            payload: Payload::Sequence(sequence),
        }
    }

    pub fn time(&self) -> Interval {
        self.time
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub(crate) fn payload_mut(&mut self) -> &mut Payload {
        &mut self.payload
    }

    pub fn length(&self) -> Tick {
        self.time.length()
    }

    pub fn is_note(&self) -> bool {
        matches!(self.payload, Payload::Note(_))
    }

    pub fn shift(&self, offset: Tick) -> Event {
        let payload = match &self.payload {
            Payload::Sequence(sequence) => Payload::Sequence(sequence.shifted(offset)),
            other => other.clone(),
        };
        Event::new(self.time.shift(offset), payload)
    }

    pub fn scale(&self, numerator: Tick, denominator: Tick) -> Event {
        let payload = match &self.payload {
            Payload::Sequence(sequence) => {
                Payload::Sequence(sequence.rescaled(numerator, denominator))
            }
            other => other.clone(),
        };
        Event::new(self.time.scale(numerator, denominator), payload)
    }

    /// Copy of this event bounded to `window`.
    ///
    /// A note cut short by the window's stop gains a tie so the fragment
    /// reads as continuing into the next one.
    pub fn slice(&self, window: Interval) -> Result<Event, IntervalError> {
        let time = self.time.intersection(window)?;
        let payload = match &self.payload {
            Payload::Note(note) if self.time.stop > window.stop => {
                Payload::Note(note.clone().with_attr(TIE))
            }
            Payload::Sequence(sequence) => Payload::Sequence(sequence.slice(time)?),
            other => other.clone(),
        };
        Ok(Event::new(time, payload))
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} {}>", self.payload, self.time)
    }
}
