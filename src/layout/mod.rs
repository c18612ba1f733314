//! Bar layout
//!
//! Meters, constant-meter bar spans and the timeline that strings them
//! together with key changes.

pub mod boundary;
pub mod meter;
pub mod timeline;

pub use boundary::Boundary;
pub use meter::Meter;
pub use timeline::{KeyChange, Section, Timeline};
