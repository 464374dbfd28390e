//! Fetch a daily weather forecast, cache it as `<cache_dir>/<YYYY-MM-DD>.json`
//! and render air temperature, cloud coverage and wind speed as a 2x2 chart.
//!
//! The pieces can be used on their own: [`ForecastFetcher`] for the
//! once-per-day download, [`Renderer`] with a [`ChartSink`] for drawing, and
//! [`select_forecast`] for choosing a cached document interactively.
//! [`Weathercast`] wires the fetcher and renderer together.

mod config;
mod error;
mod forecast;
mod render;
mod selection;
mod types;
mod utils;
mod weathercast;

pub use config::*;
pub use error::WeathercastError;
pub use weathercast::Weathercast;

pub use forecast::client::{ForecastClient, HttpForecastClient};
pub use forecast::error::FetchError;
pub use forecast::fetcher::{FetchOutcome, ForecastFetcher};

pub use render::chart::Renderer;
pub use render::error::RenderError;
pub use render::extractor::{extract_series, parse_document, read_document, series_from_str};
pub use render::sink::{ChartOutput, ChartSink, DisplaySink, ImageFileSink, DEFAULT_IMAGE_NAME};

pub use selection::{list_forecasts, select_forecast, SelectionError};

pub use types::document::{
    ForecastDocument, ForecastMeta, ForecastProperties, ForecastStep, ForecastStepData,
    InstantDetails, InstantForecast,
};
pub use types::sample::{ForecastSeries, WeatherSample, TICK_FORMAT, UPDATED_AT_FORMAT};

pub use utils::cache_file_path;
