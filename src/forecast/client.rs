//! Transport used by the fetcher to download a forecast document.

use crate::forecast::error::FetchError;
use log::{info, warn};
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use reqwest::StatusCode;
use std::time::Duration;

/// Performs the single GET the fetcher needs.
///
/// Implementations must return the raw body only for a `200 OK` response and map
/// every other status to [`FetchError::HttpStatus`].
pub trait ForecastClient {
    fn get(&self, url: &str, user_agent: &str) -> Result<Vec<u8>, FetchError>;
}

/// Blocking `reqwest` client with an overall request timeout.
#[derive(Debug, Clone)]
pub struct HttpForecastClient {
    client: Client,
}

impl HttpForecastClient {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::ClientBuild)?;
        Ok(Self { client })
    }
}

impl ForecastClient for HttpForecastClient {
    fn get(&self, url: &str, user_agent: &str) -> Result<Vec<u8>, FetchError> {
        info!("Downloading forecast from {}", url);

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .send()
            .map_err(|e| FetchError::NetworkRequest(url.to_string(), e))?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("HTTP error for {}: {}", url, status);
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        let body = response
            .bytes()
            .map_err(|e| FetchError::NetworkRequest(url.to_string(), e))?;
        info!("Downloaded {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}
