//! Payload to LilyPond token mapping

use crate::models::{Event, EventSequence, Payload};
use crate::renderers::lilypond::context::RenderContext;
use crate::renderers::lilypond::duration::duration_to_lilypond;
use crate::renderers::lilypond::pitch::{key_to_lilypond, pitch_to_lilypond};

/// Render one payload; `ctx.tick_length` is its length
pub fn render_payload(payload: &Payload, ctx: &RenderContext) -> String {
    match payload {
        Payload::Note(note) => format!(
            "{}{}{}",
            pitch_to_lilypond(&note.pitch, ctx.key),
            duration_to_lilypond(ctx.tick_length, ctx.resolution),
            note.attributes.concat()
        ),
        Payload::Rest(rest) if rest.repeat > 1 => {
            let per_bar = ctx.tick_length / i64::from(rest.repeat);
            format!(
                "{}{}*{}",
                rest.marker,
                duration_to_lilypond(per_bar, ctx.resolution),
                rest.repeat
            )
        }
        Payload::Rest(rest) => format!(
            "{}{}",
            rest.marker,
            duration_to_lilypond(ctx.tick_length, ctx.resolution)
        ),
        Payload::Directive(text) => format!("\n{}\n", text),
        Payload::Comment(text) => format!("% {}\n", text),
        Payload::BarCheck(bar) if ctx.bar_breaks => format!("| % bar {}\n", bar - 1),
        Payload::BarCheck(_) => "|".to_string(),
        Payload::KeySignature(key) => key_to_lilypond(key),
        Payload::Sequence(sequence) => render_notes(sequence, ctx),
    }
}

pub fn render_event(event: &Event, ctx: &RenderContext) -> String {
    render_payload(event.payload(), &ctx.with_tick_length(event.length()))
}

/// Every event in order, with no rests or bar lines added
pub fn render_notes(sequence: &EventSequence, ctx: &RenderContext) -> String {
    let ctx = ctx.with_resolution(sequence.resolution());
    sequence
        .iter()
        .map(|event| render_event(event, &ctx))
        .collect::<Vec<_>>()
        .join(" ")
}
