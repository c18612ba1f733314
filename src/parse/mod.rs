//! Parsing module
//!
//! Event producers: the note literal reader and chord grouping.

pub mod chords;
pub mod literal;

// Re-export commonly used types
pub use chords::group_chords;
pub use literal::{notes_from_str, sequence_from_str};
