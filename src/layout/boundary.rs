//! Constant-meter bar spans
//!
//! A [`Boundary`] covers a run of bars that share one meter. It answers the
//! three questions rendering asks of the bar grid: which bar a tick falls in,
//! how to notate a rest of a given length, and how to cut a note at bar lines.
//!
//! All ticks passed in and returned are absolute.

use crate::errors::LayoutError;
use crate::layout::Meter;
use crate::models::{Event, Interval, Payload, Rest, Tick};

/// `(start_bar, start_tick, bar_length, divisions)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Boundary {
    pub start_bar: i64,
    pub start_tick: Tick,
    pub bar_length: Tick,
    /// Time-signature numerator, used as the subdivision count for rests
    pub divisions: Tick,
}

/// Compute GCD of two numbers
fn gcd(a: Tick, b: Tick) -> Tick {
    if b == 0 { a.abs() } else { gcd(b, a % b) }
}

/// Smallest divisor greater than one shared by `a` and `b`
fn smallest_common_divisor(a: Tick, b: Tick) -> Option<Tick> {
    let common = gcd(a, b);
    (2..=common).find(|d| common % d == 0)
}

impl Boundary {
    pub fn new(start_bar: i64, start_tick: Tick, bar_length: Tick, divisions: Tick) -> Self {
        debug_assert!(bar_length > 0, "bar length must be positive");
        Self {
            start_bar,
            start_tick,
            bar_length,
            divisions,
        }
    }

    fn check(&self, tick: Tick) -> Result<(), LayoutError> {
        if tick < self.start_tick {
            return Err(LayoutError::BeforeBoundary {
                tick,
                start_tick: self.start_tick,
            });
        }
        Ok(())
    }

    pub fn bar_at(&self, tick: Tick) -> Result<i64, LayoutError> {
        self.check(tick)?;
        Ok(self.start_bar + (tick - self.start_tick) / self.bar_length)
    }

    pub fn is_bar_break(&self, tick: Tick) -> Result<bool, LayoutError> {
        self.check(tick)?;
        Ok((tick - self.start_tick) % self.bar_length == 0)
    }

    /// Time signature this span was built from
    pub fn meter(&self, resolution: Tick) -> Meter {
        Meter::new(self.divisions, resolution * 4 * self.divisions / self.bar_length)
    }

    /// Zero-length bar check for the bar starting at `tick`
    pub fn bar_check(&self, tick: Tick) -> Result<Event, LayoutError> {
        Ok(Event::marker(tick, Payload::BarCheck(self.bar_at(tick)?)))
    }

    /// Break a rest length into bar-aligned chunks.
    ///
    /// Whole bars are taken first, then the chunk shrinks by the smallest
    /// divisor it shares with `divisions`. When no such divisor exists the
    /// remainder is emitted as one final chunk.
    pub fn rest_layout(&self, length: Tick) -> Vec<Tick> {
        let mut chunks = Vec::new();
        let mut remaining = length;
        let mut chunk = self.bar_length;

        while remaining > 0 {
            if chunk > 0 && chunk <= remaining {
                chunks.push(chunk);
                remaining -= chunk;
                continue;
            }
            match smallest_common_divisor(chunk, self.divisions) {
                Some(divisor) => chunk /= divisor,
                None => {
                    log::debug!(
                        "No subdivision of {} against {} divisions, emitting {} as one rest",
                        chunk,
                        self.divisions,
                        remaining
                    );
                    chunks.push(remaining);
                    break;
                }
            }
        }
        chunks
    }

    /// Rest events filling `length` ticks from `tick`, with bar checks at every
    /// bar line crossed.
    pub fn get_rests(&self, tick: Tick, length: Tick) -> Result<Vec<Event>, LayoutError> {
        self.check(tick)?;

        let mut events = Vec::new();
        let mut tick = tick;
        let mut remaining = length;

        // up to the next bar line
        let into_bar = (tick - self.start_tick) % self.bar_length;
        if into_bar != 0 {
            let filler = remaining.min(self.bar_length - into_bar);
            let mut chunks = self.rest_layout(filler);
            chunks.sort_unstable();
            for chunk in chunks {
                events.push(Event::new(Interval::new(tick, tick + chunk), Payload::Rest(Rest::new())));
                tick += chunk;
            }
            remaining -= filler;

            if !self.is_bar_break(tick)? {
                return Ok(events);
            }
            events.push(self.bar_check(tick)?);
        }

        // whole bars
        let full_bars = remaining / self.bar_length;
        if full_bars > 0 {
            let span = full_bars * self.bar_length;
            let bars = u32::try_from(full_bars).unwrap_or(u32::MAX);
            events.push(Event::new(
                Interval::new(tick, tick + span),
                Payload::Rest(Rest::multi_measure(bars)),
            ));
            tick += span;
            remaining -= span;
            events.push(self.bar_check(tick)?);
        }

        for chunk in self.rest_layout(remaining) {
            events.push(Event::new(Interval::new(tick, tick + chunk), Payload::Rest(Rest::new())));
            tick += chunk;
        }

        Ok(events)
    }

    /// Cut an event at every bar line it crosses.
    ///
    /// Fragments that continue into the next bar are tied, and a bar check
    /// follows every fragment that ends on a bar line.
    pub fn split_note(&self, event: &Event) -> Result<Vec<Event>, LayoutError> {
        let time = event.time();
        self.check(time.start)?;

        let offset = (time.start - self.start_tick).rem_euclid(self.bar_length);
        let bar_start = time.start - offset;
        let mut window = Interval::new(bar_start, bar_start + self.bar_length);

        let mut pieces = Vec::new();
        while window.start < time.stop {
            let piece = event.slice(window)?;
            window = window.shift(self.bar_length);
            let ends_bar = piece.time().stop == window.start;
            pieces.push(piece);
            if ends_bar {
                pieces.push(self.bar_check(window.start)?);
            }
        }
        Ok(pieces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Note;

    #[test]
    fn test_bar_at() {
        let b = Boundary::new(6, 60, 12, 4);

        assert_eq!(b.bar_at(60), Ok(6));
        assert_eq!(b.bar_at(71), Ok(6));
        assert_eq!(b.bar_at(72), Ok(7));
        assert_eq!(
            b.bar_at(59),
            Err(LayoutError::BeforeBoundary {
                tick: 59,
                start_tick: 60
            })
        );
    }

    #[test]
    fn test_is_bar_break() {
        let b = Boundary::new(6, 60, 12, 4);

        assert_eq!(b.is_bar_break(60), Ok(true));
        assert_eq!(b.is_bar_break(72), Ok(true));
        assert_eq!(b.is_bar_break(61), Ok(false));
        assert_eq!(b.is_bar_break(71), Ok(false));
        assert_eq!(
            b.is_bar_break(48),
            Err(LayoutError::BeforeBoundary {
                tick: 48,
                start_tick: 60
            })
        );
    }

    #[test]
    fn test_rest_layout() {
        let b = Boundary::new(1, 0, 12, 4);
        assert_eq!(b.rest_layout(12), vec![12]);
        assert_eq!(b.rest_layout(9), vec![6, 3]);
        assert_eq!(b.rest_layout(0), Vec::<Tick>::new());

        // 3/4 at resolution 3
        let b = Boundary::new(1, 0, 9, 3);
        assert_eq!(b.rest_layout(9), vec![9]);
        assert_eq!(b.rest_layout(7), vec![3, 3, 1]);

        // no shared subdivision, remainder comes out whole
        let b = Boundary::new(1, 0, 10, 3);
        assert_eq!(b.rest_layout(4), vec![4]);
        assert_eq!(b.rest_layout(14), vec![10, 4]);
    }

    #[test]
    fn test_meter() {
        assert_eq!(Boundary::new(1, 0, 12, 4).meter(3), Meter::new(4, 4));
        assert_eq!(Boundary::new(1, 0, 9, 3).meter(3), Meter::new(3, 4));
        assert_eq!(Boundary::new(1, 0, 288, 6).meter(96), Meter::new(6, 8));
    }

    #[test]
    fn test_get_rests_lengths() {
        let b = Boundary::new(1, 48, 48, 4);
        let rests = b.get_rests(54, 48).unwrap();

        let total: Tick = rests.iter().map(Event::length).sum();
        assert_eq!(total, 48);
        assert_eq!(rests.last().map(|e| e.time().stop), Some(102));

        let bar_checks: Vec<Tick> = rests
            .iter()
            .filter(|e| matches!(e.payload(), Payload::BarCheck(_)))
            .map(|e| e.time().start)
            .collect();
        assert_eq!(bar_checks, vec![96]);
    }

    #[test]
    fn test_split_note_two_bars() {
        let b = Boundary::new(1, 0, 12, 4);
        let note = Event::note(Interval::new(6, 18), Note::new(60));
        let pieces = b.split_note(&note).unwrap();

        let shown: Vec<String> = pieces.iter().map(|e| e.to_string()).collect();
        assert_eq!(shown, vec!["<60~ (6,12)>", "<|2 (12,12)>", "<60 (12,18)>"]);
    }

    #[test]
    fn test_split_note_before_start() {
        let b = Boundary::new(3, 48, 24, 4);
        let note = Event::note(Interval::new(40, 50), Note::new(60));
        assert!(b.split_note(&note).is_err());
    }
}
