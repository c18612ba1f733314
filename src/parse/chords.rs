//! Chord grouping for imported note streams

use crate::models::{Event, Payload};

/// Merge runs of notes sharing the exact same interval into single chords.
///
/// Input must already be sorted; only neighbours are compared.
pub fn group_chords<I: IntoIterator<Item = Event>>(events: I) -> Vec<Event> {
    let mut grouped: Vec<Event> = Vec::new();
    for event in events {
        if let Some(last) = grouped.last_mut() {
            if last.time() == event.time() {
                if let (Payload::Note(existing), Payload::Note(incoming)) =
                    (last.payload_mut(), event.payload())
                {
                    *existing = existing.merge(incoming);
                    continue;
                }
            }
        }
        grouped.push(event);
    }
    grouped
}
