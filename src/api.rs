//! WASM API
//!
//! JavaScript-facing entry points. Each exported function is a thin wrapper
//! around a native function that tests can call directly:
//! - `renderNotation`: note literal plus meter/key layout to LilyPond
//! - `renderMidi`: Standard MIDI File to one LilyPond block per voice

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::prelude::*;

use crate::converters::voices_from_bytes;
use crate::errors::{LayoutError, ParseError};
use crate::layout::{Meter, Timeline};
use crate::models::{KeySignature, Tick, DEFAULT_RESOLUTION};
use crate::parse::sequence_from_str;
use crate::renderers::{render_track, RenderContext};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("Invalid request: {0}")]
    Request(String),
}

/// Meter change at the start of `bar`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeterMark {
    pub bar: i64,
    pub meter: Meter,
}

/// Key change at the start of `bar`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMark {
    pub bar: i64,
    pub key: KeySignature,
}

/// A note literal and the layout to render it with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderRequest {
    /// `NAME-DURATION` tokens, durations in ticks
    pub notes: String,
    pub resolution: Tick,
    /// Tick of the first token
    pub start: Tick,
    /// Pickup length in beats
    pub partial: i64,
    /// Opening meter
    pub meter: Meter,
    pub meters: Vec<MeterMark>,
    /// Opening key
    pub key: KeySignature,
    pub keys: Vec<KeyMark>,
    pub bar_breaks: bool,
}

impl Default for RenderRequest {
    fn default() -> Self {
        Self {
            notes: String::new(),
            resolution: 1,
            start: 0,
            partial: 0,
            meter: Meter::COMMON,
            meters: Vec::new(),
            key: KeySignature::C_MAJOR,
            keys: Vec::new(),
            bar_breaks: false,
        }
    }
}

impl RenderRequest {
    fn timeline(&self) -> Result<Timeline, LayoutError> {
        let mut timeline = Timeline::new(self.resolution)?
            .with_meter(self.meter)?
            .with_partial(self.partial)?
            .with_key(self.key);
        for mark in &self.meters {
            timeline.set_meter(mark.bar, mark.meter)?;
        }
        for mark in &self.keys {
            timeline.set_key(mark.bar, mark.key);
        }
        Ok(timeline)
    }
}

// ============================================================================
// Native entry points
// ============================================================================

pub fn render_request(request: &RenderRequest) -> Result<String, ApiError> {
    let sequence = sequence_from_str(&request.notes, request.resolution, request.start)?;
    let timeline = request.timeline()?;
    let ctx = RenderContext::new(request.resolution).with_bar_breaks(request.bar_breaks);

    log::debug!(
        "Rendering {} events over {} boundaries",
        sequence.len(),
        timeline.boundaries().len()
    );
    Ok(render_track(&sequence, &timeline, &ctx)?)
}

/// [`render_request`] from its JSON form
pub fn render_request_json(json: &str) -> Result<String, ApiError> {
    let request: RenderRequest =
        serde_json::from_str(json).map_err(|e| ApiError::Request(e.to_string()))?;
    render_request(&request)
}

/// Render every non-empty voice of a MIDI file as `Name = { ... }` blocks
pub fn render_midi_voices(bytes: &[u8], quantize: Tick, meter: Meter) -> Result<String, ApiError> {
    let voices = voices_from_bytes(bytes, quantize)?;
    let resolution = voices
        .iter()
        .next()
        .map_or(DEFAULT_RESOLUTION, |voice| voice.events.resolution());
    let timeline = Timeline::new(resolution)?.with_meter(meter)?;
    Ok(voices.render_track(&timeline, &RenderContext::new(resolution))?)
}

// ============================================================================
// WASM exports
// ============================================================================

/// Render a note literal with bar layout
///
/// # Parameters
/// - `request`: object matching [`RenderRequest`] (camelCase keys, all optional)
///
/// # Returns
/// LilyPond note list, one line per meter/key section
#[wasm_bindgen(js_name = renderNotation)]
pub fn render_notation(request: JsValue) -> Result<String, JsValue> {
    let request: RenderRequest = serde_wasm_bindgen::from_value(request)
        .map_err(|e| JsValue::from_str(&format!("Invalid request: {}", e)))?;

    render_request(&request).map_err(|e| {
        log::error!("renderNotation failed: {}", e);
        JsValue::from_str(&e.to_string())
    })
}

/// Render a Standard MIDI File
///
/// # Parameters
/// - `bytes`: file contents
/// - `quantize`: grid in file ticks, 0 to disable
/// - `meter`: time signature such as `"3/4"`
#[wasm_bindgen(js_name = renderMidi)]
pub fn render_midi(bytes: &[u8], quantize: i32, meter: &str) -> Result<String, JsValue> {
    let meter: Meter = meter
        .parse()
        .map_err(|e: ParseError| JsValue::from_str(&e.to_string()))?;

    render_midi_voices(bytes, Tick::from(quantize), meter).map_err(|e| {
        log::error!("renderMidi failed: {}", e);
        JsValue::from_str(&e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request: RenderRequest = serde_json::from_str(r#"{"notes": "A-4"}"#).unwrap();
        assert_eq!(request.resolution, 1);
        assert_eq!(request.meter, Meter::COMMON);
        assert!(!request.bar_breaks);
    }

    #[test]
    fn test_request_json_keys() {
        let request: RenderRequest = serde_json::from_str(
            r#"{"notes": "A-3", "meter": "3/4", "barBreaks": true,
                "meters": [{"bar": 2, "meter": "2/4"}],
                "keys": [{"bar": 2, "key": {"fifths": -1}}]}"#,
        )
        .unwrap();
        assert_eq!(request.meter, Meter::new(3, 4));
        assert_eq!(request.meters[0].meter, Meter::new(2, 4));
        assert_eq!(request.keys[0].key, KeySignature::major(-1));
        assert!(request.bar_breaks);
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            render_request_json("{\"notes\": 3}"),
            Err(ApiError::Request(_))
        ));
    }

    #[test]
    fn test_oversized_pickup() {
        assert!(matches!(
            render_request_json(r#"{"notes": "A-4", "partial": 5}"#),
            Err(ApiError::Layout(LayoutError::InvalidPartial { beats: 5, bar_beats: 4 }))
        ));
    }

    #[test]
    fn test_bad_literal() {
        assert!(matches!(
            render_request_json(r#"{"notes": "A4"}"#),
            Err(ApiError::Parse(ParseError::InvalidToken(_)))
        ));
    }
}
