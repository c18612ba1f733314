//! Note literal reader
//!
//! Reads whitespace-separated `NAME-DURATION` tokens such as
//! `"A-2 Bb-1 R-1 D-1"`. `NAME` is an upper-case letter with an optional
//! `#` or `b`, or `R` for a rest. Durations are in ticks. Pitches land in
//! the octave starting at 48 (LilyPond `c`).

use crate::errors::ParseError;
use crate::models::{Event, EventSequence, Interval, Note, Pitch, Tick};

/// Pitch of the unmarked LilyPond octave's `c`
const BASE_PITCH: Pitch = 48;

fn pitch_class(name: &str) -> Result<Pitch, ParseError> {
    let unknown = || ParseError::UnknownNote(name.to_string());
    let mut chars = name.chars();

    let class: Pitch = match chars.next() {
        Some('C') => 0,
        Some('D') => 2,
        Some('E') => 4,
        Some('F') => 5,
        Some('G') => 7,
        Some('A') => 9,
        Some('B') => 11,
        _ => return Err(unknown()),
    };
    let alteration: Pitch = match chars.as_str() {
        "" => 0,
        "#" => 1,
        "b" => -1,
        _ => return Err(unknown()),
    };
    Ok((class + alteration).rem_euclid(12))
}

/// Events for every note in `s`, starting at `clock`; rests only advance time
pub fn notes_from_str(s: &str, clock: Tick) -> Result<Vec<Event>, ParseError> {
    let (events, _) = read_tokens(s, clock)?;
    Ok(events)
}

fn read_tokens(s: &str, start: Tick) -> Result<(Vec<Event>, Tick), ParseError> {
    let mut clock = start;
    let mut events = Vec::new();

    for token in s.split_whitespace() {
        let (name, duration) = token
            .split_once('-')
            .ok_or_else(|| ParseError::InvalidToken(token.to_string()))?;
        let duration: Tick = duration
            .parse()
            .ok()
            .filter(|d: &Tick| *d >= 0)
            .ok_or_else(|| ParseError::InvalidDuration(token.to_string()))?;

        if name != "R" {
            let pitch = pitch_class(name)? + BASE_PITCH;
            events.push(Event::note(Interval::new(clock, clock + duration), Note::new(pitch)));
        }
        clock += duration;
    }
    Ok((events, clock))
}

/// Sequence read from `s`, spanning from `start` to the end of its last token
/// including any leading or trailing rests.
pub fn sequence_from_str(s: &str, resolution: Tick, start: Tick) -> Result<EventSequence, ParseError> {
    let (events, stop) = read_tokens(s, start)?;
    let mut sequence = EventSequence::new(resolution);
    if stop > start {
        sequence = sequence.with_time(Interval::new(start, stop));
    }
    sequence.extend_events(events)?;
    Ok(sequence)
}
