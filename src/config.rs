//! Explicit configuration for the fetcher and the renderer.
//!
//! Nothing in the library reads process state on its own; the environment is only
//! consulted through [`FetcherConfig::from_env`], which the binary does not even
//! need since `clap` already resolves the same variables.

use bon::{bon, Builder};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const API_URL_VAR: &str = "WEATHER_FORECAST_API_URL";
pub const USER_AGENT_VAR: &str = "USER_AGENT";
pub const CACHE_DIR_VAR: &str = "FORECAST_CACHE_DIR";
pub const TIMEOUT_SECS_VAR: &str = "FORECAST_TIMEOUT_SECS";
pub const OUTPUT_DIR_VAR: &str = "FORECAST_OUTPUT_DIR";
pub const LOCATION_VAR: &str = "FORECAST_LOCATION";

pub const DEFAULT_CACHE_DIR: &str = "forecasts";
pub const DEFAULT_OUTPUT_DIR: &str = "assets";
pub const DEFAULT_LOCATION: &str = "Oslo";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// 12x6 inches at 100 dpi.
pub const DEFAULT_CHART_SIZE: (u32, u32) = (1200, 600);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required configuration value '{0}'")]
    MissingValue(&'static str),

    #[error("Invalid value '{value}' for '{name}'")]
    InvalidValue { name: &'static str, value: String },
}

/// Settings for [`crate::ForecastFetcher`].
///
/// The endpoint and user agent are mandatory; a blank value is treated the same as
/// an absent one so that an empty CI secret fails here instead of at the API.
///
/// # Examples
///
/// ```
/// use weathercast::FetcherConfig;
/// use std::time::Duration;
///
/// let config = FetcherConfig::builder()
///     .api_url("https://api.met.no/weatherapi/locationforecast/2.0/compact?lat=59.91&lon=10.75")
///     .user_agent("weathercast/0.1 ops@example.com")
///     .cache_dir("forecasts")
///     .request_timeout(Duration::from_secs(10))
///     .build()?;
/// assert_eq!(config.request_timeout(), Duration::from_secs(10));
///
/// let missing = FetcherConfig::builder().user_agent("weathercast/0.1").build();
/// assert!(missing.is_err());
/// # Ok::<(), weathercast::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FetcherConfig {
    api_url: String,
    user_agent: String,
    cache_dir: PathBuf,
    request_timeout: Duration,
}

#[bon]
impl FetcherConfig {
    #[builder]
    pub fn new(
        #[builder(into)] api_url: Option<String>,
        #[builder(into)] user_agent: Option<String>,
        #[builder(into)] cache_dir: Option<PathBuf>,
        request_timeout: Option<Duration>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: require(API_URL_VAR, api_url)?,
            user_agent: require(USER_AGENT_VAR, user_agent)?,
            cache_dir: cache_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR)),
            request_timeout: request_timeout.unwrap_or(DEFAULT_TIMEOUT),
        })
    }

    /// Reads `WEATHER_FORECAST_API_URL`, `USER_AGENT` and the optional
    /// `FORECAST_CACHE_DIR` / `FORECAST_TIMEOUT_SECS` from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let request_timeout = match env::var(TIMEOUT_SECS_VAR) {
            Ok(raw) => Some(parse_timeout(&raw)?),
            Err(_) => None,
        };

        Self::builder()
            .maybe_api_url(env::var(API_URL_VAR).ok())
            .maybe_user_agent(env::var(USER_AGENT_VAR).ok())
            .maybe_cache_dir(env::var(CACHE_DIR_VAR).ok())
            .maybe_request_timeout(request_timeout)
            .build()
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn cache_dir(&self) -> &PathBuf {
        &self.cache_dir
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

/// Settings for [`crate::Renderer`].
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct RenderConfig {
    /// Place name shown in the label panel.
    #[builder(into, default = DEFAULT_LOCATION.to_string())]
    pub location: String,

    /// Canvas size in pixels, width first.
    #[builder(default = DEFAULT_CHART_SIZE)]
    pub size: (u32, u32),
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

fn require(name: &'static str, value: Option<String>) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingValue(name)),
    }
}

pub(crate) fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidValue {
            name: TIMEOUT_SECS_VAR,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_applies_defaults() -> Result<(), ConfigError> {
        let config = FetcherConfig::builder()
            .api_url("https://example.test/forecast")
            .user_agent("weathercast-test")
            .build()?;

        assert_eq!(config.api_url(), "https://example.test/forecast");
        assert_eq!(config.user_agent(), "weathercast-test");
        assert_eq!(config.cache_dir(), &PathBuf::from(DEFAULT_CACHE_DIR));
        assert_eq!(config.request_timeout(), DEFAULT_TIMEOUT);
        Ok(())
    }

    #[test]
    fn test_missing_api_url_is_reported_by_variable_name() {
        let err = FetcherConfig::builder()
            .user_agent("weathercast-test")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingValue(API_URL_VAR)));
    }

    #[test]
    fn test_blank_user_agent_counts_as_missing() {
        let err = FetcherConfig::builder()
            .api_url("https://example.test/forecast")
            .user_agent("   ")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingValue(USER_AGENT_VAR)));
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout(" 15 ").unwrap(), Duration::from_secs(15));
        assert!(matches!(
            parse_timeout("0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            parse_timeout("soon"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_render_config_default() {
        let config = RenderConfig::default();
        assert_eq!(config.location, "Oslo");
        assert_eq!(config.size, (1200, 600));

        let custom = RenderConfig::builder().location("Bergen").build();
        assert_eq!(custom.location, "Bergen");
    }
}
