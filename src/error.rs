use crate::config::ConfigError;
use crate::forecast::error::FetchError;
use crate::render::error::RenderError;
use crate::selection::SelectionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeathercastError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

impl WeathercastError {
    /// Process exit status for this error: `2` for configuration problems, `1` for
    /// everything else (including an upstream non-200 response).
    pub fn exit_code(&self) -> u8 {
        match self {
            WeathercastError::Config(_) => 2,
            _ => 1,
        }
    }
}
