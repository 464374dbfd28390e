//! Serde mirror of the subset of the MET Norway `locationforecast` document that
//! the renderer needs.
//!
//! Everything not listed here (geometry, units, `next_1_hours` summaries, ...) is
//! ignored on decode. A missing field is a decode error rather than a default, so a
//! truncated or foreign document can never produce a partial chart.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Root of a cached or freshly downloaded forecast document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastDocument {
    pub properties: ForecastProperties,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastProperties {
    pub meta: ForecastMeta,
    pub timeseries: Vec<ForecastStep>,
}

/// Document level metadata. Only the update time is used, as a display label.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastMeta {
    pub updated_at: DateTime<Utc>,
}

/// One entry of `properties.timeseries`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastStep {
    pub time: DateTime<Utc>,
    pub data: ForecastStepData,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastStepData {
    pub instant: InstantForecast,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InstantForecast {
    pub details: InstantDetails,
}

/// Instantaneous values at `ForecastStep::time`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct InstantDetails {
    /// Degrees Celsius.
    pub air_temperature: f64,
    /// Percent, 0-100.
    pub cloud_area_fraction: f64,
    /// Metres per second.
    pub wind_speed: f64,
}
