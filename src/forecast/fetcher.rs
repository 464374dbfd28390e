//! Idempotent, once-per-day retrieval of the forecast document.

use crate::config::FetcherConfig;
use crate::forecast::client::{ForecastClient, HttpForecastClient};
use crate::forecast::error::FetchError;
use crate::utils::{cache_file_path, ensure_dir_exists};
use chrono::{Local, NaiveDate};
use log::{info, warn};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Where the returned document path came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A document for the date already existed and was returned untouched.
    Cached(PathBuf),
    /// The document was downloaded and written during this call.
    Downloaded(PathBuf),
}

impl FetchOutcome {
    pub fn path(&self) -> &Path {
        match self {
            FetchOutcome::Cached(p) | FetchOutcome::Downloaded(p) => p,
        }
    }

    pub fn into_path(self) -> PathBuf {
        match self {
            FetchOutcome::Cached(p) | FetchOutcome::Downloaded(p) => p,
        }
    }

    pub fn was_downloaded(&self) -> bool {
        matches!(self, FetchOutcome::Downloaded(_))
    }
}

/// Fetches the forecast at most once per calendar day and caches the verbatim body
/// as `<cache_dir>/<YYYY-MM-DD>.json`.
///
/// An existing file for the date is canonical: it is returned as-is even if the
/// upstream forecast has been updated since, and it is never overwritten.
pub struct ForecastFetcher<C: ForecastClient = HttpForecastClient> {
    config: FetcherConfig,
    client: C,
}

impl ForecastFetcher<HttpForecastClient> {
    /// Creates a fetcher backed by a blocking HTTP client honouring
    /// [`FetcherConfig::request_timeout`].
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let client = HttpForecastClient::new(config.request_timeout())?;
        Ok(Self { config, client })
    }
}

impl<C: ForecastClient> ForecastFetcher<C> {
    pub fn with_client(config: FetcherConfig, client: C) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Cache path for `date`.
    pub fn cache_path_for(&self, date: NaiveDate) -> PathBuf {
        cache_file_path(self.config.cache_dir(), date)
    }

    /// Returns today's document, downloading it only if it is not cached yet.
    /// "Today" is the local calendar date.
    pub fn fetch_or_load(&self) -> Result<FetchOutcome, FetchError> {
        self.fetch_or_load_on(Local::now().date_naive())
    }

    /// Same as [`Self::fetch_or_load`] for an explicit date.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NetworkRequest`] on transport failure and
    /// [`FetchError::HttpStatus`] for any status other than `200 OK`; in both cases
    /// nothing is written. Cache I/O failures surface as
    /// [`FetchError::CacheDirCreation`] or [`FetchError::CacheWrite`].
    pub fn fetch_or_load_on(&self, date: NaiveDate) -> Result<FetchOutcome, FetchError> {
        let path = self.cache_path_for(date);

        if path.exists() {
            info!(
                "Forecast for {} already cached at {:?}, skipping download",
                date, path
            );
            return Ok(FetchOutcome::Cached(path));
        }

        info!("No cached forecast for {}, downloading", date);
        let body = self
            .client
            .get(self.config.api_url(), self.config.user_agent())?;

        let cache_dir = self.config.cache_dir();
        ensure_dir_exists(cache_dir)
            .map_err(|e| FetchError::CacheDirCreation(cache_dir.clone(), e))?;
        write_new(&path, &body)?;

        info!("Cached forecast for {} to {:?}", date, path);
        Ok(FetchOutcome::Downloaded(path))
    }
}

/// Writes `body` to a file that must not exist yet. A half-written file is removed
/// so it cannot be mistaken for the day's canonical document later.
fn write_new(path: &Path, body: &[u8]) -> Result<(), FetchError> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| FetchError::CacheWrite(path.to_path_buf(), e))?;

    if let Err(e) = file.write_all(body).and_then(|_| file.sync_all()) {
        drop(file);
        if let Err(cleanup) = fs::remove_file(path) {
            warn!("Failed to remove partial cache file {:?}: {}", path, cleanup);
        }
        return Err(FetchError::CacheWrite(path.to_path_buf(), e));
    }
    Ok(())
}
