//! Standard MIDI File import
//!
//! Every track becomes a voice of a [`VoiceList`], named `TrackA`, `TrackB`,
//! ... in track order. Note on/off pairs are quantized to a tick grid, sorted and grouped
//! into chords. The file's ticks-per-quarter becomes the voice resolution.

use std::collections::HashMap;
use std::path::Path;

use midly::{MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};

use crate::errors::ParseError;
use crate::models::{Event, EventSequence, Interval, Note, Pitch, Tick, VoiceList};
use crate::parse::group_chords;

/// Grid note boundaries are snapped to, in file ticks
pub const DEFAULT_QUANTIZE: Tick = 48;

fn voice_name(index: usize) -> String {
    match u8::try_from(index) {
        Ok(offset) if offset < 26 => format!("Track{}", char::from(b'A' + offset)),
        _ => format!("Track{}", index + 1),
    }
}

/// Round to the nearest multiple of `quantize`; non-positive disables snapping
fn quantize_tick(tick: Tick, quantize: Tick) -> Tick {
    if quantize <= 0 {
        return tick;
    }
    (tick + quantize / 2) / quantize * quantize
}

fn notes_from_track(track: &[TrackEvent], quantize: Tick) -> Vec<Event> {
    let mut clock: Tick = 0;
    let mut pending: HashMap<u8, Tick> = HashMap::new();
    let mut notes = Vec::new();

    for event in track {
        clock += Tick::from(event.delta.as_int());
        let tick = quantize_tick(clock, quantize);

        match &event.kind {
            TrackEventKind::Midi {
                message: MidiMessage::NoteOn { key, vel },
                ..
            } if vel.as_int() > 0 => {
                pending.insert(key.as_int(), tick);
            }
            TrackEventKind::Midi {
                message: MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. },
                ..
            } => match pending.remove(&key.as_int()) {
                // notes shorter than the grid vanish
                Some(start) if start != tick => notes.push(Event::note(
                    Interval::new(start, tick),
                    Note::new(Pitch::from(key.as_int())),
                )),
                Some(_) => {}
                None => log::debug!("Note off for {} without a note on", key.as_int()),
            },
            other => log::debug!("Skipping {:?}", other),
        }
    }

    notes.sort_by_key(Event::time);
    notes
}

/// Every track as a voice named `TrackA`, `TrackB`, ..., empty tracks included
pub fn voices_from_smf(smf: &Smf, quantize: Tick) -> Result<VoiceList, ParseError> {
    let resolution = match smf.header.timing {
        Timing::Metrical(ticks_per_quarter) => Tick::from(ticks_per_quarter.as_int()),
        Timing::Timecode(..) => {
            return Err(ParseError::Midi("SMPTE timecode timing is not supported".to_string()))
        }
    };

    let mut voices = VoiceList::new();
    for (index, track) in smf.tracks.iter().enumerate() {
        let mut events = EventSequence::new(resolution);
        events.extend_events(group_chords(notes_from_track(track, quantize)))?;
        log::debug!("Imported {} events from track {}", events.len(), index);
        voices.insert(voice_name(index), events);
    }
    Ok(voices)
}

pub fn voices_from_bytes(bytes: &[u8], quantize: Tick) -> Result<VoiceList, ParseError> {
    let smf = Smf::parse(bytes).map_err(|e| ParseError::Midi(format!("Failed to parse MIDI: {}", e)))?;
    voices_from_smf(&smf, quantize)
}

pub fn voices_from_file(path: &Path, quantize: Tick) -> Result<VoiceList, ParseError> {
    let bytes = std::fs::read(path)
        .map_err(|e| ParseError::Midi(format!("Failed to read {}: {}", path.display(), e)))?;
    voices_from_bytes(&bytes, quantize)
}
