//! Rendering context threaded through every payload

use crate::models::{KeySignature, Tick, DEFAULT_RESOLUTION};

/// Settings a payload needs to render itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    /// Ticks per quarter note
    pub resolution: Tick,
    /// Length of the event being rendered
    pub tick_length: Tick,
    /// Key used to spell black-key pitches
    pub key: KeySignature,
    /// Annotate bar checks with the bar number and break the line
    pub bar_breaks: bool,
}

impl RenderContext {
    pub fn new(resolution: Tick) -> Self {
        Self {
            resolution,
            ..Self::default()
        }
    }

    pub fn with_resolution(mut self, resolution: Tick) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_tick_length(mut self, tick_length: Tick) -> Self {
        self.tick_length = tick_length;
        self
    }

    pub fn with_key(mut self, key: KeySignature) -> Self {
        self.key = key;
        self
    }

    pub fn with_bar_breaks(mut self, bar_breaks: bool) -> Self {
        self.bar_breaks = bar_breaks;
        self
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            tick_length: 0,
            key: KeySignature::C_MAJOR,
            bar_breaks: false,
        }
    }
}
