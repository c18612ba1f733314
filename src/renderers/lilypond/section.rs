//! Bar-aware rendering of whole sequences
//!
//! [`render_section`] walks a sequence with a running clock against one
//! [`Boundary`]. Gaps become rests laid out by the boundary, notes are cut at
//! bar lines with ties, and bar checks mark every bar line crossed. An event
//! that starts before the clock overlaps what was already written; it is
//! logged and skipped so the rest of the passage still renders.

use crate::errors::LayoutError;
use crate::layout::{Boundary, Meter, Timeline};
use crate::models::{EventSequence, Payload, Tick, VoiceList};
use crate::renderers::lilypond::context::RenderContext;
use crate::renderers::lilypond::notation::{render_event, render_notes};

fn push_rests(
    tokens: &mut Vec<String>,
    boundary: &Boundary,
    ctx: &RenderContext,
    from: Tick,
    length: Tick,
) -> Result<(), LayoutError> {
    for rest in boundary.get_rests(from, length)? {
        tokens.push(render_event(&rest, ctx));
    }
    Ok(())
}

/// Render a sequence against a single constant-meter span
pub fn render_section(
    sequence: &EventSequence,
    boundary: &Boundary,
    ctx: &RenderContext,
) -> Result<String, LayoutError> {
    let time = sequence.time();
    if time.is_empty() {
        return Ok(String::new());
    }

    let ctx = ctx.with_resolution(sequence.resolution());
    let mut tokens = Vec::new();
    let mut clock = time.start;

    for event in sequence {
        let start = event.time().start;
        if clock < start {
            push_rests(&mut tokens, boundary, &ctx, clock, start - clock)?;
            clock = start;
        }

        if start < clock {
            log::warn!(
                "Dropping overlapping event {} at bar {}",
                render_event(event, &ctx),
                boundary.bar_at(start).unwrap_or(boundary.start_bar)
            );
            continue;
        }

        match event.payload() {
            Payload::Sequence(nested) => {
                let rendered = render_section(nested, boundary, &ctx)?;
                if !rendered.is_empty() {
                    tokens.push(rendered);
                }
            }
            Payload::Note(_) => {
                for piece in boundary.split_note(event)? {
                    tokens.push(render_event(&piece, &ctx));
                }
            }
            _ => tokens.push(render_event(event, &ctx)),
        }
        clock = event.time().stop;
    }

    if clock < time.stop {
        push_rests(&mut tokens, boundary, &ctx, clock, time.stop - clock)?;
    }

    Ok(tokens.join(" "))
}

/// Render every section of `sequence` under `timeline`, one section per line
pub fn render_track(
    sequence: &EventSequence,
    timeline: &Timeline,
    ctx: &RenderContext,
) -> Result<String, LayoutError> {
    let rescaled;
    let sequence = if sequence.resolution() != timeline.resolution() {
        rescaled = sequence.at_resolution(timeline.resolution());
        &rescaled
    } else {
        sequence
    };

    let mut output = Vec::new();
    for section in timeline.split_sections(sequence)? {
        let ctx = ctx.with_key(section.key);
        output.push(render_section(&section.events, &section.boundary, &ctx)?);
    }
    Ok(output.join("\n"))
}

/// Render every non-empty voice as a `Name = { ... }` block.
///
/// Blocks are separated by a blank line and bar checks carry bar numbers.
pub fn render_voices(
    voices: &VoiceList,
    timeline: &Timeline,
    ctx: &RenderContext,
) -> Result<String, LayoutError> {
    let ctx = ctx.with_bar_breaks(true);
    let mut blocks = Vec::new();
    for voice in voices {
        if voice.events.is_empty() {
            log::debug!("Skipping empty voice {}", voice.name);
            continue;
        }
        let body = render_track(&voice.events, timeline, &ctx)?;
        blocks.push(format!("{} = {{\n{}\n}}", voice.name, body));
    }
    Ok(blocks.join("\n\n"))
}

impl VoiceList {
    pub fn render_track(&self, timeline: &Timeline, ctx: &RenderContext) -> Result<String, LayoutError> {
        render_voices(self, timeline, ctx)
    }
}

impl EventSequence {
    /// Plain rendering with no bar layout
    pub fn to_lilypond(&self) -> String {
        render_notes(self, &RenderContext::new(self.resolution()))
    }

    pub fn render_section(&self, boundary: &Boundary, ctx: &RenderContext) -> Result<String, LayoutError> {
        render_section(self, boundary, ctx)
    }

    /// Render in 4/4 from tick 0
    pub fn render_bars(&self) -> Result<String, LayoutError> {
        let boundary = Boundary::new(
            1,
            0,
            Meter::COMMON.bar_length(self.resolution()),
            Meter::COMMON.beats,
        );
        render_section(self, &boundary, &RenderContext::new(self.resolution()))
    }

    pub fn render_track(&self, timeline: &Timeline, ctx: &RenderContext) -> Result<String, LayoutError> {
        render_track(self, timeline, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Event, Interval, Note};

    fn notes(ranges: &[(Tick, Tick, i32)]) -> EventSequence {
        let events = ranges
            .iter()
            .map(|(start, stop, pitch)| Event::note(Interval::new(*start, *stop), Note::new(*pitch)))
            .collect();
        EventSequence::from_events(events, 1)
    }

    #[test]
    fn test_gaps_become_rests() {
        let seq = notes(&[(0, 2, 57), (4, 6, 59)]);
        assert_eq!(seq.render_bars().unwrap(), "a2 r2 | b2");
    }

    #[test]
    fn test_overlap_is_dropped() {
        let seq = notes(&[(0, 2, 57), (1, 3, 59), (2, 4, 60)]);
        assert_eq!(seq.render_bars().unwrap(), "a2 c'2 |");
    }

    #[test]
    fn test_trailing_rests_to_sequence_stop() {
        let seq = notes(&[(0, 1, 57)]).with_time(Interval::new(0, 8));
        assert_eq!(seq.render_bars().unwrap(), "a4 r4 r2 | R1 |");
    }

    #[test]
    fn test_render_voices() {
        let mut voices = VoiceList::new();
        voices.insert("Upper", notes(&[(0, 4, 60)]));
        voices.insert("Empty", EventSequence::new(1));
        voices.insert("Lower", notes(&[(0, 2, 48), (2, 4, 50)]));
        let timeline = Timeline::new(1).unwrap();

        assert_eq!(
            voices.render_track(&timeline, &RenderContext::default()).unwrap(),
            "Upper = {\n\n\\time 4/4\n \\key c \\major c'1 | % bar 1\n\n}\n\n\
             Lower = {\n\n\\time 4/4\n \\key c \\major c2 d2 | % bar 1\n\n}"
        );
    }

    #[test]
    fn test_empty_sequence() {
        assert_eq!(EventSequence::new(1).render_bars().unwrap(), "");
    }
}
