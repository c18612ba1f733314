//! Models module for timed musical events
//!
//! Intervals, events, the sequences that hold them and named voice lists. Everything here is
//! expressed in ticks at a sequence-wide resolution.

pub mod event;
pub mod interval;
pub mod sequence;
pub mod voices;

// Re-export commonly used types
pub use event::{Event, KeySignature, Note, NotePitch, Payload, Pitch, Rest, TIE};
pub use interval::{Interval, Tick};
pub use sequence::{EventSequence, Window, DEFAULT_RESOLUTION};
pub use voices::{Voice, VoiceList};
