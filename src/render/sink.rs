//! Output sinks decide where a rendered chart ends up.

use crate::render::error::RenderError;
use crate::utils::ensure_dir_exists;
use log::{info, warn};
use std::path::{Path, PathBuf};

pub const DEFAULT_IMAGE_NAME: &str = "forecast.png";

/// Result of a successful render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartOutput {
    /// Handed to the system image viewer; the path is the temporary PNG shown.
    Displayed(PathBuf),
    /// Written to the image file at this path.
    Written(PathBuf),
}

impl ChartOutput {
    pub fn path(&self) -> &Path {
        match self {
            ChartOutput::Displayed(p) | ChartOutput::Written(p) => p,
        }
    }
}

/// A destination for a PNG chart.
///
/// The renderer asks [`ChartSink::prepare`] for a target path, draws the PNG there,
/// then calls [`ChartSink::finish`] with that same path. If drawing fails in between,
/// [`ChartSink::abort`] gets the prepared path instead.
pub trait ChartSink {
    fn prepare(&self) -> Result<PathBuf, RenderError>;

    fn finish(&self, rendered: PathBuf) -> Result<ChartOutput, RenderError>;

    /// Release whatever [`ChartSink::prepare`] left behind.
    fn abort(&self, _prepared: &Path) {}
}

/// Writes `<output_dir>/forecast.png`, overwriting the previous render.
#[derive(Debug, Clone)]
pub struct ImageFileSink {
    output_dir: PathBuf,
    file_name: String,
}

impl ImageFileSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            file_name: DEFAULT_IMAGE_NAME.to_string(),
        }
    }

    pub fn target(&self) -> PathBuf {
        self.output_dir.join(&self.file_name)
    }
}

impl ChartSink for ImageFileSink {
    fn prepare(&self) -> Result<PathBuf, RenderError> {
        ensure_dir_exists(&self.output_dir)
            .map_err(|e| RenderError::Output(self.output_dir.clone(), e))?;
        Ok(self.target())
    }

    fn finish(&self, rendered: PathBuf) -> Result<ChartOutput, RenderError> {
        info!("Plot saved as {:?}", rendered);
        Ok(ChartOutput::Written(rendered))
    }
}

/// Renders into a kept temporary PNG and opens it with the platform's default
/// image viewer.
#[derive(Debug, Clone, Default)]
pub struct DisplaySink;

impl ChartSink for DisplaySink {
    fn prepare(&self) -> Result<PathBuf, RenderError> {
        let temp_dir = std::env::temp_dir();
        let file = tempfile::Builder::new()
            .prefix("weathercast-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| RenderError::Output(temp_dir.clone(), e))?;
        // The viewer runs detached and may outlive this process.
        file.into_temp_path()
            .keep()
            .map_err(|e| RenderError::Output(temp_dir, e.error))
    }

    fn finish(&self, rendered: PathBuf) -> Result<ChartOutput, RenderError> {
        info!("Opening {:?} in the system viewer", rendered);
        open::that(&rendered).map_err(|e| RenderError::Viewer(rendered.clone(), e))?;
        Ok(ChartOutput::Displayed(rendered))
    }

    fn abort(&self, prepared: &Path) {
        if let Err(e) = std::fs::remove_file(prepared) {
            warn!("Failed to remove temporary chart {:?}: {}", prepared, e);
        }
    }
}
