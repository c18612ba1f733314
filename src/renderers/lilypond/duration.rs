//! Tick lengths to LilyPond duration tokens
//!
//! A length is first expressed as a fraction of a whole note. Plain values
//! have numerator 1; dotted values have numerator `2^(dots+1) - 1` over a
//! power-of-two denominator, so `3/8` is `4.` and `7/16` is `4..`.

use num_rational::Ratio;

use crate::models::Tick;

/// Numerators of dotted values, indexed by dot count minus one
const DOTTED_NUMERATORS: [Tick; 5] = [3, 7, 15, 31, 63];

const MAX_DENOMINATOR: Tick = 128;

/// Convert a tick length at `resolution` to a LilyPond duration.
///
/// Lengths with no exact written form fall back to a scaled duration such
/// as `4*5/4` and log a warning.
pub fn duration_to_lilypond(ticks: Tick, resolution: Tick) -> String {
    if ticks <= 0 || resolution <= 0 {
        log::warn!("Cannot notate {} ticks at resolution {}", ticks, resolution);
        return String::new();
    }

    let fraction = Ratio::new(ticks, resolution * 4);
    let numerator = *fraction.numer();
    let denominator = *fraction.denom();

    if denominator <= MAX_DENOMINATOR && (denominator as u64).is_power_of_two() {
        if let Some(index) = DOTTED_NUMERATORS.iter().position(|n| *n == numerator) {
            let dots = index + 1;
            let base = denominator >> dots;
            if base >= 1 {
                return format!("{}{}", base, ".".repeat(dots));
            }
        }
        if numerator == 1 {
            return denominator.to_string();
        }
    }

    log::warn!("Unable to represent {} as a duration", fraction);
    let base = [1, 2, 4, 8, 16, 32]
        .into_iter()
        .find(|b| Ratio::new(1, *b) < fraction)
        .unwrap_or(32);
    format!("{}*{}", base, fraction * base)
}
