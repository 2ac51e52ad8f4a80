//! Unit conversions applied to raw OpenWeatherMap readings.
//!
//! Upstream temperatures arrive in Kelvin and wind speeds in m/s; both are
//! converted here so every tool reports the caller's requested system.

use serde::Deserialize;

/// Measurement system requested by the caller.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Celsius and metres per second.
    #[default]
    Metric,
    /// Fahrenheit and miles per hour.
    Imperial,
}

impl Units {
    /// Lowercase name echoed in payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }

    /// Temperature unit label.
    #[must_use]
    pub const fn temperature_label(self) -> &'static str {
        match self {
            Self::Metric => "°C",
            Self::Imperial => "°F",
        }
    }

    /// Wind speed unit label.
    #[must_use]
    pub const fn wind_label(self) -> &'static str {
        match self {
            Self::Metric => "m/s",
            Self::Imperial => "mph",
        }
    }
}

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

const MPS_TO_MPH: f64 = 2.237;

/// Round to one decimal place.
///
/// Rounds the exact binary value, so `0.35` (stored just below) becomes
/// `0.3` while `0.45` (stored just above) becomes `0.5`.
#[must_use]
pub fn round1(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

/// Convert a Kelvin reading, rounded to one decimal.
#[must_use]
pub fn format_temperature(kelvin: f64, units: Units) -> f64 {
    let celsius = kelvin - 273.15;
    match units {
        Units::Metric => round1(celsius),
        Units::Imperial => round1(celsius * 9.0 / 5.0 + 32.0),
    }
}

/// Convert a wind speed in m/s, rounded to one decimal.
#[must_use]
pub fn format_wind_speed(meters_per_second: f64, units: Units) -> f64 {
    match units {
        Units::Metric => round1(meters_per_second),
        Units::Imperial => round1(meters_per_second * MPS_TO_MPH),
    }
}

/// 16-point compass direction for a bearing in degrees.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn wind_direction(degrees: f64) -> &'static str {
    // Ties round to even so 11.25° stays N.
    let sector = (degrees / 22.5).round_ties_even() as i64;
    let index = usize::try_from(sector.rem_euclid(16)).unwrap_or(0);
    COMPASS_POINTS[index]
}

/// Label for an OpenWeatherMap air quality index (1-5).
#[must_use]
pub fn air_quality_label(aqi: i64) -> &'static str {
    match aqi {
        1 => "Good",
        2 => "Fair",
        3 => "Moderate",
        4 => "Poor",
        5 => "Very Poor",
        _ => "Unknown",
    }
}
