//! LilyPond rendering
//!
//! Turns event sequences into LilyPond note lists, either plainly or laid
//! out against bar boundaries with rests, ties and bar checks.

pub mod context;
pub mod duration;
pub mod notation;
pub mod pitch;
pub mod section;

pub use context::RenderContext;
pub use duration::duration_to_lilypond;
pub use notation::{render_event, render_notes, render_payload};
pub use pitch::{key_to_lilypond, pitch_name, pitch_to_lilypond};
pub use section::{render_section, render_track, render_voices};
