// MIDI file import into named voices

use midly::num::{u15, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};

use barline::api::render_midi_voices;
use barline::converters::{voices_from_bytes, voices_from_file, DEFAULT_QUANTIZE};
use barline::layout::Meter;
use barline::models::Interval;

fn midi(delta: u32, message: MidiMessage) -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(delta),
        kind: TrackEventKind::Midi {
            channel: u4::new(0),
            message,
        },
    }
}

fn end_of_track() -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    }
}

fn on(key: u8, vel: u8) -> MidiMessage {
    MidiMessage::NoteOn {
        key: u7::new(key),
        vel: u7::new(vel),
    }
}

fn off(key: u8) -> MidiMessage {
    MidiMessage::NoteOff {
        key: u7::new(key),
        vel: u7::new(0),
    }
}

/// Conductor track plus one track holding a note and a two-note chord
fn two_track_file() -> Vec<u8> {
    let mut smf = Smf::new(Header::new(Format::Parallel, Timing::Metrical(u15::new(96))));
    smf.tracks.push(vec![end_of_track()]);
    smf.tracks.push(vec![
        midi(5, on(60, 80)),
        midi(91, off(60)),
        midi(0, on(64, 80)),
        midi(0, on(67, 80)),
        // velocity zero closes the note
        midi(96, on(64, 0)),
        midi(0, off(67)),
        end_of_track(),
    ]);

    let mut bytes = Vec::new();
    smf.write_std(&mut bytes).unwrap();
    bytes
}

#[test]
fn test_voices_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("voices.mid");
    std::fs::write(&path, two_track_file()).unwrap();

    let voices = voices_from_file(&path, DEFAULT_QUANTIZE).unwrap();
    assert_eq!(voices.names(), vec!["TrackA", "TrackB"]);
    assert!(voices.voice("TrackA").unwrap().is_empty());

    let track = voices.voice("TrackB").unwrap();
    assert_eq!(track.resolution(), 96);
    assert_eq!(track.to_string(), "[<60 (0,96)>, <<64 67> (96,192)>](0,192)");
}

#[test]
fn test_select_and_slice_imported_voices() {
    let voices = voices_from_bytes(&two_track_file(), DEFAULT_QUANTIZE).unwrap();
    let piano = voices.select_as(&[("Piano", "TrackB")]).unwrap();
    assert_eq!(piano.names(), vec!["Piano"]);

    let second_beat = piano.slice(Interval::new(96, 144)).unwrap();
    assert_eq!(
        second_beat.voice("Piano").unwrap().to_string(),
        "[<<64 67>~ (96,144)>](96,144)"
    );
    assert!(voices.select(&["TrackC"]).is_err());
}

#[test]
fn test_unquantized_import_keeps_offsets() {
    let voices = voices_from_bytes(&two_track_file(), 0).unwrap();
    let track = voices.voice("TrackB").unwrap();
    assert_eq!(track.events()[0].to_string(), "<60 (5,96)>");
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(voices_from_file(&dir.path().join("absent.mid"), DEFAULT_QUANTIZE).is_err());
}

#[test]
fn test_render_midi_voices() {
    let rendered = render_midi_voices(&two_track_file(), DEFAULT_QUANTIZE, Meter::COMMON).unwrap();

    // the empty conductor track is skipped
    assert!(rendered.starts_with("TrackB = {"), "{}", rendered);
    assert!(rendered.contains("c'4 <e' g'>4"), "{}", rendered);
    assert!(rendered.ends_with("\n}"));
}
