//! Barline WASM Module
//!
//! Lays out timed musical events as LilyPond notation: events are held in
//! interval-ordered sequences, cut into bars by a meter/key timeline, and
//! rendered with rests, ties and bar checks.

pub mod api;
pub mod converters;
pub mod errors;
pub mod layout;
pub mod models;
pub mod parse;
pub mod renderers;

// Re-export commonly used types
pub use errors::{IntervalError, LayoutError, ParseError, SequenceError};
pub use layout::{Boundary, Meter, Section, Timeline};
pub use models::*;
pub use renderers::RenderContext;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // fails only when a logger is already installed
    #[cfg(feature = "console_log")]
    let _ = console_log::init_with_level(log::Level::Debug);

    log::info!("Barline WASM module initialized");
}
