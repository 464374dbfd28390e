use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to read forecast document '{0}'")]
    DocumentRead(PathBuf, #[source] std::io::Error),

    #[error("Malformed forecast document")]
    MalformedDocument(#[source] serde_json::Error),

    #[error("Forecast document contains no time series samples")]
    NoSamples,

    #[error("Failed to build forecast table")]
    Table(#[source] PolarsError),

    #[error("Failed to load chart font")]
    Font,

    #[error("Failed to draw chart: {0}")]
    Drawing(String),

    #[error("Failed to prepare chart output '{0}'")]
    Output(PathBuf, #[source] std::io::Error),

    #[error("Failed to open '{0}' in the system viewer")]
    Viewer(PathBuf, #[source] std::io::Error),
}
