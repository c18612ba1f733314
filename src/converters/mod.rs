//! Format converters
//!
//! Importers that turn external formats into event sequences.

pub mod midi_import;

// Re-export for convenience
pub use midi_import::{voices_from_bytes, voices_from_file, voices_from_smf, DEFAULT_QUANTIZE};
