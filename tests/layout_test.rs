// Boundary and timeline layout

use barline::layout::{Boundary, Meter, Timeline};
use barline::models::{Event, Interval, KeySignature, Note, Payload, Tick};
use barline::parse::sequence_from_str;
use barline::renderers::lilypond::render_event;
use barline::RenderContext;

fn joined(events: &[Event], resolution: Tick) -> String {
    let ctx = RenderContext::new(resolution);
    events
        .iter()
        .map(|e| render_event(e, &ctx))
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn test_get_rests() {
    let b = Boundary::new(3, 48, 24, 4);
    let rest_output = |tick, length| joined(&b.get_rests(tick, length).unwrap(), 6);

    assert_eq!(rest_output(54, 6), "r4");
    assert_eq!(rest_output(54, 48), "r4 r2 | R1 | r4");
    assert_eq!(rest_output(54, 96), "r4 r2 | R1*3 | r4");
    assert_eq!(rest_output(51, 48), "r8 r4 r2 | R1 | r8");
}

#[test]
fn test_get_rests_always_sum_to_length() {
    let boundaries = [
        Boundary::new(1, 0, 24, 4),
        Boundary::new(3, 48, 18, 3),
        Boundary::new(1, 0, 30, 5),
    ];
    for b in boundaries {
        for tick in [0, 1, 5, 13, 48, 50] {
            if tick < b.start_tick {
                continue;
            }
            for length in [0, 1, 7, 24, 61, 100] {
                let rests = b.get_rests(tick, length).unwrap();
                let total: Tick = rests.iter().map(Event::length).sum();
                assert_eq!(total, length, "{:?} from {} for {}", b, tick, length);
                if let Some(last) = rests.iter().filter(|e| e.length() > 0).last() {
                    assert_eq!(last.time().stop, tick + length);
                }
            }
        }
    }
}

#[test]
fn test_get_rests_before_start() {
    let b = Boundary::new(3, 48, 24, 4);
    assert!(b.get_rests(40, 10).is_err());
}

#[test]
fn test_split_note() {
    let b = Boundary::new(3, 48, 24, 4);
    let note_output = |start: Tick, length: Tick| {
        let e = Event::note(Interval::new(start, start + length), Note::new(57));
        joined(&b.split_note(&e).unwrap(), 6)
    };

    assert_eq!(note_output(54, 6), "a4");
    assert_eq!(note_output(54, 24), "a2.~ | a4");
    assert_eq!(note_output(48, 24), "a1 |");
    assert_eq!(note_output(48, 96), "a1~ | a1~ | a1~ | a1 |");
    assert_eq!(note_output(78, 6), "a4");
    assert_eq!(note_output(90, 6), "a4 |");
}

#[test]
fn test_split_note_across_two_bars() {
    let b = Boundary::new(1, 0, 24, 4);
    let e = Event::note(Interval::new(0, 48), Note::new(57));
    let pieces = b.split_note(&e).unwrap();

    assert_eq!(pieces.len(), 4);
    assert_eq!(pieces[0].time(), Interval::new(0, 24));
    assert_eq!(pieces[1].payload(), &Payload::BarCheck(2));
    assert_eq!(pieces[1].time(), Interval::at(24));
    assert_eq!(pieces[2].time(), Interval::new(24, 48));
    assert!(matches!(pieces[0].payload(), Payload::Note(n) if n.is_tied()));
    assert!(matches!(pieces[2].payload(), Payload::Note(n) if !n.is_tied()));
}

#[test]
fn test_bar_info() {
    let mut t = Timeline::new(1).unwrap().with_meter(Meter::new(3, 4)).unwrap();
    t.set_meter(3, Meter::new(2, 4)).unwrap();
    t.set_meter(4, Meter::new(3, 4)).unwrap();

    assert_eq!(t.beat(3, 1, None), 6);
    assert_eq!(t.bar_info(0), Some(Boundary::new(1, 0, 3, 3)));
    assert_eq!(t.bar_info(5), Some(Boundary::new(1, 0, 3, 3)));
    assert_eq!(t.bar_info(6), Some(Boundary::new(3, 6, 2, 2)));

    assert_eq!(t.beat(4, 1, None), 8);
    assert_eq!(t.bar_info(7), Some(Boundary::new(3, 6, 2, 2)));
    assert_eq!(t.bar_info(8), Some(Boundary::new(4, 8, 3, 3)));
    assert_eq!(t.bar_info(1000), Some(Boundary::new(4, 8, 3, 3)));
}

#[test]
fn test_bar_ranges() {
    let t = Timeline::new(3).unwrap();

    assert_eq!(t.bar(3), Interval::new(24, 36));
    assert_eq!(t.bars(3, 4), Interval::new(24, 48));
    assert_eq!(t.get_range((3, 2), (5, 1)), Interval::new(27, 48));
}

#[test]
fn test_keys() {
    let t = Timeline::new(3).unwrap();
    assert_eq!(t.key(12), KeySignature::C_MAJOR);

    let mut t = Timeline::new(3).unwrap().with_key(KeySignature::major(6));
    t.set_meter(3, Meter::new(3, 4)).unwrap();
    t.set_key(3, KeySignature::major(5));

    assert_eq!(t.key(2), KeySignature::major(6));
    assert_eq!(t.key(3), KeySignature::major(5));
}

#[test]
fn test_split_sections_by_meter() {
    let mut t = Timeline::new(1).unwrap().with_meter(Meter::new(3, 4)).unwrap();
    t.set_meter(2, Meter::new(2, 4)).unwrap();

    let seq = sequence_from_str("A-3 B-2", 1, 0).unwrap();
    let sections = t.split_sections(&seq).unwrap();

    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].boundary, Boundary::new(1, 0, 3, 3));
    assert_eq!(sections[0].events.time(), Interval::new(0, 3));
    assert_eq!(
        sections[0].events.payloads()[0],
        &Payload::Directive("\\time 3/4".to_string())
    );
    assert_eq!(sections[1].events.time(), Interval::new(3, 5));
    assert_eq!(
        sections[1].events.payloads()[0],
        &Payload::Directive("\\time 2/4".to_string())
    );
}

#[test]
fn test_split_sections_by_key() {
    let mut t = Timeline::new(1).unwrap();
    t.set_key(2, KeySignature::major(-1));

    let seq = sequence_from_str("A-6 B-2", 1, 0).unwrap();
    let sections = t.split_sections(&seq).unwrap();

    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].key, KeySignature::C_MAJOR);
    assert_eq!(sections[0].events.time(), Interval::new(0, 4));
    assert_eq!(sections[1].key, KeySignature::major(-1));
    assert_eq!(sections[1].events.time(), Interval::new(4, 8));
    assert_eq!(
        sections[1].events.payloads()[0],
        &Payload::KeySignature(KeySignature::major(-1))
    );

    // the note crossing the key change is cut and tied
    assert_eq!(sections[0].events.note_events()[0].to_string(), "<57~ (0,4)>");
}
