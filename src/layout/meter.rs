//! Time signatures

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ParseError;
use crate::models::Tick;

/// Time signature `beats / beat_unit`.
///
/// Serialized as its `"3/4"` text form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Meter {
    pub beats: i64,
    pub beat_unit: i64,
}

impl Meter {
    pub const COMMON: Meter = Meter { beats: 4, beat_unit: 4 };

    pub fn new(beats: i64, beat_unit: i64) -> Self {
        Self { beats, beat_unit }
    }

    /// Ticks in one bar at `resolution` ticks per quarter note
    pub fn bar_length(&self, resolution: Tick) -> Tick {
        if self.beat_unit <= 0 {
            return 0;
        }
        resolution * 4 * self.beats / self.beat_unit
    }
}

impl Default for Meter {
    fn default() -> Self {
        Meter::COMMON
    }
}

impl fmt::Display for Meter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.beats, self.beat_unit)
    }
}

impl FromStr for Meter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidMeter(s.to_string());
        let (beats, unit) = s.trim().split_once('/').ok_or_else(invalid)?;
        let beats: i64 = beats.trim().parse().map_err(|_| invalid())?;
        let beat_unit: i64 = unit.trim().parse().map_err(|_| invalid())?;
        if beats <= 0 || beat_unit <= 0 {
            return Err(invalid());
        }
        Ok(Meter { beats, beat_unit })
    }
}

impl TryFrom<String> for Meter {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Meter> for String {
    fn from(meter: Meter) -> Self {
        meter.to_string()
    }
}
