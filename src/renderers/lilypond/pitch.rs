//! Pitch and key names in LilyPond's Dutch note language

use crate::models::{KeySignature, NotePitch, Pitch};

/// Letter names by pitch class; black keys are empty
const NOTE_LETTERS: [&str; 12] = ["c", "", "d", "", "e", "f", "", "g", "", "a", "", "b"];

/// Unmarked octave starts at this pitch (LilyPond `c`)
const BASE_OCTAVE: Pitch = 4;

/// Major key tonics from 7 flats to 7 sharps
const MAJOR_TONICS: [&str; 15] = [
    "ces", "ges", "des", "aes", "ees", "bes", "f", "c", "g", "d", "a", "e", "b", "fis", "cis",
];

/// Minor key tonics from 7 flats to 7 sharps
const MINOR_TONICS: [&str; 15] = [
    "aes", "ees", "bes", "f", "c", "g", "d", "a", "e", "b", "fis", "cis", "gis", "dis", "ais",
];

/// Name a single pitch with octave marks.
///
/// Black keys are spelled as sharps in sharp keys and C major, flats otherwise.
pub fn pitch_name(pitch: Pitch, key: KeySignature) -> String {
    let (base, accidental) = if NOTE_LETTERS[pitch.rem_euclid(12) as usize].is_empty() {
        if key.prefers_sharps() {
            (pitch - 1, "is")
        } else {
            (pitch + 1, "es")
        }
    } else {
        (pitch, "")
    };

    let letter = NOTE_LETTERS[base.rem_euclid(12) as usize];
    let octave = base.div_euclid(12) - BASE_OCTAVE;
    let marks = if octave > 0 {
        "'".repeat(octave as usize)
    } else {
        ",".repeat(octave.unsigned_abs() as usize)
    };

    format!("{}{}{}", letter, accidental, marks)
}

/// Name a note's pitch; chords render as `<...>`
pub fn pitch_to_lilypond(pitch: &NotePitch, key: KeySignature) -> String {
    match pitch {
        NotePitch::Single(pitch) => pitch_name(*pitch, key),
        NotePitch::Chord(pitches) => {
            let names: Vec<String> = pitches.iter().map(|p| pitch_name(*p, key)).collect();
            format!("<{}>", names.join(" "))
        }
    }
}

/// Convert a key signature to a `\key` command
pub fn key_to_lilypond(key: &KeySignature) -> String {
    let index = (i32::from(key.fifths) + 7) as usize;
    let (table, mode) = if key.minor {
        (&MINOR_TONICS, "\\minor")
    } else {
        (&MAJOR_TONICS, "\\major")
    };

    let tonic = match table.get(index) {
        Some(tonic) => *tonic,
        None => {
            log::warn!("Key with {} fifths out of range, using no accidentals", key.fifths);
            table[7]
        }
    };

    format!("\\key {} {}", tonic, mode)
}
