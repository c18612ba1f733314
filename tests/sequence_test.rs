// Event sequence behaviour through the public API

use barline::models::{Event, EventSequence, Interval, Note, Payload, Tick};
use barline::parse::sequence_from_str;
use barline::SequenceError;

fn test_events() -> Vec<Event> {
    vec![
        Event::note(Interval::new(10, 20), Note::new(1)),
        Event::note(Interval::new(20, 30), Note::new(2)),
    ]
}

fn intervals(seq: &EventSequence) -> Vec<Interval> {
    seq.iter().map(Event::time).collect()
}

#[test]
fn test_extend_from_iterator() {
    let mut c = EventSequence::new(1);
    c.extend_events(test_events().into_iter()).unwrap();
    assert_eq!(c.time(), Interval::new(10, 30));

    let mut c = EventSequence::new(1);
    c.extend_events(test_events().into_iter().map(|e| e.shift(5))).unwrap();
    assert_eq!(c.time(), Interval::new(15, 35));
}

#[test]
fn test_time_is_union_after_mutation() {
    let mut c = EventSequence::new(1);
    c.append(Event::note(Interval::new(20, 30), Note::new(1)), false).unwrap();
    c.append(Event::note(Interval::new(5, 15), Note::new(2)), false).unwrap();
    assert_eq!(intervals(&c), vec![Interval::new(5, 15), Interval::new(20, 30)]);

    c.paste(EventSequence::from_events(test_events(), 1), 0).unwrap();
    let union = Interval::spanning(c.iter().map(Event::time));
    assert_eq!(c.time(), union);
    assert_eq!(c.time(), Interval::new(5, 50));
}

#[test]
fn test_paste_literals() {
    let mut c = sequence_from_str("A-2 Bb-1 R-1 D-1", 1, 0).unwrap();
    let tail = sequence_from_str("D-1 E-1 R-2 G-1", 1, c.time().stop).unwrap();
    c.append(Event::group(tail), true).unwrap();
    assert_eq!(c.time().stop, 10);

    c.paste(sequence_from_str("A-6 R-1 D-3", 1, 0).unwrap(), 0).unwrap();
    assert_eq!(c.time().stop, 20);
}

#[test]
fn test_sequential_append_rejects_overlap() {
    let mut c = EventSequence::from_events(test_events(), 1);
    let result = c.append(Event::note(Interval::new(25, 35), Note::new(3)), true);
    assert!(matches!(result, Err(SequenceError::Backwards { .. })));

    // markers may always be added
    c.append(Event::marker(15, Payload::Comment("x".to_string())), true).unwrap();
    assert_eq!(c.len(), 3);
}

#[test]
fn test_slice_by_own_span_keeps_intervals() {
    let c = sequence_from_str("A-2 B-1 C-3 D-2", 1, 4).unwrap();
    let sliced = c.slice(c.time()).unwrap();
    assert_eq!(sliced.len(), c.len());
    assert_eq!(intervals(&sliced), intervals(&c));
    assert!(sliced.note_events().iter().all(|e| {
        matches!(e.payload(), Payload::Note(note) if !note.is_tied())
    }));
}

#[test]
fn test_split_and_paste_round_trip() {
    let c = sequence_from_str("A-2 B-2 C-2", 1, 0).unwrap();
    let (head, tail) = c.split(2).unwrap();
    assert_eq!(head.time(), Interval::new(0, 2));
    assert_eq!(tail.time(), Interval::new(2, 6));

    let mut joined = head.clone();
    joined.paste(tail, 0).unwrap();
    assert_eq!(intervals(&joined), intervals(&c));
    assert_eq!(joined.time(), c.time());
}

#[test]
fn test_split_inside_note_ties_head() {
    let c = sequence_from_str("A-4", 1, 0).unwrap();
    let (head, tail) = c.split(1).unwrap();
    assert_eq!(head.to_string(), "[<57~ (0,1)>](0,1)");
    assert_eq!(tail.to_string(), "[<57 (1,4)>](1,4)");
}

#[test]
fn test_at_resolution_rescales_nested() {
    let inner = sequence_from_str("C-1 D-1", 1, 2).unwrap();
    let mut outer = sequence_from_str("A-2", 1, 0).unwrap();
    outer.insert(Event::group(inner)).unwrap();

    let scaled = outer.at_resolution(4);
    assert_eq!(scaled.resolution(), 4);
    assert_eq!(scaled.time(), Interval::new(0, 16));

    let starts: Vec<Tick> = scaled.note_events().iter().map(|e| e.time().start).collect();
    assert_eq!(starts, vec![0, 8, 12]);
}

#[test]
fn test_get_by_tick_and_range() {
    let c = sequence_from_str("A-10 B-10 C-10 D-10", 10, 0).unwrap();
    assert_eq!(c.get(Interval::new(15, 40)).to_lilypond(), "c4 d4");
    assert_eq!(c.get(barline::models::Window::Tick(10)).to_lilypond(), "b4");
    assert_eq!(c.slice(Interval::new(15, 35)).unwrap().to_lilypond(), "b8 c4 d8~");

    let two = sequence_from_str("E-10 F-20 G-10", 10, 0).unwrap();
    assert_eq!(two.duration(), c.duration());
    assert_eq!(two.get(Interval::new(15, 40)).to_lilypond(), "g4");
}
