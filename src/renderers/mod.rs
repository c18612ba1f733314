//! Renderers module
//!
//! Output formats for event sequences.

pub mod lilypond;

// Re-export commonly used types
pub use lilypond::{render_section, render_track, render_voices, RenderContext};
