use crate::render::error::RenderError;
use crate::types::document::ForecastDocument;
use crate::types::sample::{ForecastSeries, WeatherSample};
use std::fs;
use std::path::Path;

/// Reads a cached forecast document verbatim.
pub fn read_document(path: &Path) -> Result<String, RenderError> {
    fs::read_to_string(path).map_err(|e| RenderError::DocumentRead(path.to_path_buf(), e))
}

/// Decodes document content. Any missing or mistyped field required for the chart
/// fails the whole document.
pub fn parse_document(content: &str) -> Result<ForecastDocument, RenderError> {
    serde_json::from_str(content).map_err(RenderError::MalformedDocument)
}

/// Single pass over `properties.timeseries` in upstream order. No filtering,
/// sorting or resampling.
pub fn extract_series(document: &ForecastDocument) -> ForecastSeries {
    let steps = &document.properties.timeseries;
    let mut series = ForecastSeries::with_capacity(document.properties.meta.updated_at, steps.len());

    for step in steps {
        let details = &step.data.instant.details;
        series.push(WeatherSample {
            time: step.time,
            air_temperature: details.air_temperature,
            cloud_area_fraction: details.cloud_area_fraction,
            wind_speed: details.wind_speed,
        });
    }

    series
}

/// [`parse_document`] followed by [`extract_series`].
pub fn series_from_str(content: &str) -> Result<ForecastSeries, RenderError> {
    parse_document(content).map(|doc| extract_series(&doc))
}
