//! Fetch-then-render pipeline combining [`ForecastFetcher`] and [`Renderer`].

use crate::config::{FetcherConfig, RenderConfig};
use crate::error::WeathercastError;
use crate::forecast::client::{ForecastClient, HttpForecastClient};
use crate::forecast::fetcher::{FetchOutcome, ForecastFetcher};
use crate::render::chart::Renderer;
use crate::render::sink::{ChartOutput, ChartSink};

/// The main entry point: today's forecast in, chart out.
///
/// # Examples
///
/// ```no_run
/// use weathercast::{FetcherConfig, ImageFileSink, RenderConfig, Weathercast};
///
/// # fn main() -> Result<(), weathercast::WeathercastError> {
/// let weathercast = Weathercast::new(FetcherConfig::from_env()?, RenderConfig::default())?;
/// let output = weathercast.run(&ImageFileSink::new("assets"))?;
/// println!("Plot saved as {}", output.path().display());
/// # Ok(())
/// # }
/// ```
pub struct Weathercast<C: ForecastClient = HttpForecastClient> {
    fetcher: ForecastFetcher<C>,
    renderer: Renderer,
}

impl Weathercast<HttpForecastClient> {
    pub fn new(
        fetcher_config: FetcherConfig,
        render_config: RenderConfig,
    ) -> Result<Self, WeathercastError> {
        Ok(Self {
            fetcher: ForecastFetcher::new(fetcher_config)?,
            renderer: Renderer::new(render_config),
        })
    }
}

impl<C: ForecastClient> Weathercast<C> {
    pub fn with_parts(fetcher: ForecastFetcher<C>, renderer: Renderer) -> Self {
        Self { fetcher, renderer }
    }

    pub fn fetcher(&self) -> &ForecastFetcher<C> {
        &self.fetcher
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Ensures today's document is cached, downloading it if needed.
    pub fn fetch(&self) -> Result<FetchOutcome, WeathercastError> {
        Ok(self.fetcher.fetch_or_load()?)
    }

    /// Fetches (or loads) today's document and renders it into `sink`.
    pub fn run(&self, sink: &dyn ChartSink) -> Result<ChartOutput, WeathercastError> {
        let outcome = self.fetch()?;
        Ok(self.renderer.render_file(outcome.path(), sink)?)
    }
}
