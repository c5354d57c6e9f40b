//! Temperature entity
//!
//! Celsius is the source of truth. Fahrenheit is trusted from the provider
//! when it supplies a non-zero value; otherwise it is derived. Kelvin is
//! always derived. All three readings are rounded to 2 decimal places.

/// Conversion offset from Celsius to Kelvin
pub const KELVIN_OFFSET: f64 = 273.15;

/// Current temperature in three scales
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Temperature {
    pub celsius: f64,
    pub fahrenheit: f64,
    pub kelvin: f64,
}

impl Temperature {
    /// Build from provider readings. A zero Fahrenheit is treated as absent.
    pub fn from_readings(celsius: f64, fahrenheit: Option<f64>) -> Self {
        let fahrenheit = fahrenheit
            .filter(|f| *f != 0.0)
            .unwrap_or_else(|| celsius_to_fahrenheit(celsius));

        Self {
            celsius: round_to_hundredths(celsius),
            fahrenheit: round_to_hundredths(fahrenheit),
            kelvin: round_to_hundredths(celsius + KELVIN_OFFSET),
        }
    }
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 1.8 + 32.0
}

/// Round to 2 decimal places, halves away from zero.
///
/// Positive halves round up (`0.125 -> 0.13`); negative values mirror them
/// (`-0.125 -> -0.13`), so a reading and its negation always have the same
/// magnitude after rounding.
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
