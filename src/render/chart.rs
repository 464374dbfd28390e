//! The fixed 2x2 forecast chart.
//!
//! ```text
//! +-----------------+-----------------+
//! | Air Temperature | Cloud Coverage  |
//! +-----------------+-----------------+
//! | Wind Speed      | location label  |
//! +-----------------+-----------------+
//! ```

use crate::config::RenderConfig;
use crate::render::error::RenderError;
use crate::render::extractor::{read_document, series_from_str};
use crate::render::sink::{ChartOutput, ChartSink};
use crate::types::sample::{ForecastSeries, UPDATED_AT_FORMAT};
use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle, FontTransform};
use std::path::Path;
use std::sync::OnceLock;

const FONT_FAMILY: &str = "sans-serif";
static FONT_BYTES: &[u8] = include_bytes!("../../resources/DejaVuSans.ttf");

/// Upper bound on x axis labels per panel; plotters thins them out evenly.
const MAX_X_LABELS: usize = 24;
const TICK_FONT_SIZE: u32 = 11;
const AXIS_DESC_FONT_SIZE: u32 = 14;
/// Holds a rotated `HH:MM` tick plus the "Time" description below it.
const X_LABEL_AREA: u32 = 75;
const Y_LABEL_AREA: u32 = 60;

struct Panel {
    title: &'static str,
    y_label: &'static str,
}

const AIR_TEMPERATURE: Panel = Panel {
    title: "Air Temperature",
    y_label: "Temperature (°C)",
};
const CLOUD_COVERAGE: Panel = Panel {
    title: "Cloud Coverage",
    y_label: "Cloud Coverage (%)",
};
const WIND_SPEED: Panel = Panel {
    title: "Wind Speed",
    y_label: "Wind Speed (m/s)",
};

/// Turns forecast documents into the 2x2 chart and hands the PNG to a [`ChartSink`].
///
/// # Examples
///
/// ```no_run
/// use weathercast::{ImageFileSink, RenderConfig, Renderer};
///
/// let renderer = Renderer::new(RenderConfig::builder().location("Tromsø").build());
/// let output = renderer.render_file(
///     "forecasts/2023-06-16.json".as_ref(),
///     &ImageFileSink::new("assets"),
/// )?;
/// println!("Plot saved as {}", output.path().display());
/// # Ok::<(), weathercast::RenderError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Reads the document at `path` and renders it.
    pub fn render_file(
        &self,
        path: &Path,
        sink: &dyn ChartSink,
    ) -> Result<ChartOutput, RenderError> {
        info!("Rendering forecast document {:?}", path);
        let content = read_document(path)?;
        self.render(&content, sink)
    }

    /// Parses `content`, extracts the series and renders it.
    ///
    /// # Errors
    ///
    /// [`RenderError::MalformedDocument`] if a required field is missing, and
    /// [`RenderError::NoSamples`] if the time series is empty. Nothing is written
    /// to the sink in either case.
    pub fn render(
        &self,
        content: &str,
        sink: &dyn ChartSink,
    ) -> Result<ChartOutput, RenderError> {
        let series = series_from_str(content)?;
        self.render_series(&series, sink)
    }

    pub fn render_series(
        &self,
        series: &ForecastSeries,
        sink: &dyn ChartSink,
    ) -> Result<ChartOutput, RenderError> {
        if series.is_empty() {
            return Err(RenderError::NoSamples);
        }
        register_chart_font()?;

        let target = sink.prepare()?;
        if let Err(e) = self.draw_png(series, &target) {
            sink.abort(&target);
            return Err(e);
        }
        sink.finish(target)
    }

    /// Text of the bottom-right panel, one entry per line.
    pub fn label_lines(&self, series: &ForecastSeries) -> Vec<String> {
        vec![
            format!("Weather forecast for {}:", self.config.location),
            String::new(),
            series.updated_at().format(UPDATED_AT_FORMAT).to_string(),
        ]
    }

    fn draw_png(&self, series: &ForecastSeries, path: &Path) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, self.config.size).into_drawing_area();
        root.fill(&WHITE).map_err(drawing_error)?;

        let panels = root.split_evenly((2, 2));
        let ticks = series.tick_labels();

        draw_series_panel(&panels[0], &AIR_TEMPERATURE, &ticks, series.air_temperatures())?;
        draw_series_panel(&panels[1], &CLOUD_COVERAGE, &ticks, series.cloud_coverages())?;
        draw_series_panel(&panels[2], &WIND_SPEED, &ticks, series.wind_speeds())?;
        draw_label_panel(&panels[3], &self.label_lines(series))?;

        root.present().map_err(drawing_error)?;
        Ok(())
    }
}

fn register_chart_font() -> Result<(), RenderError> {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    let ok = *REGISTERED
        .get_or_init(|| register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES).is_ok());
    if ok {
        Ok(())
    } else {
        Err(RenderError::Font)
    }
}

fn drawing_error<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> RenderError {
    RenderError::Drawing(e.to_string())
}

/// Y range covering `values` with a small margin. Flat series get a unit band so
/// the axis is never degenerate.
fn value_range(values: &[f64]) -> (f64, f64) {
    let (min, max) = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if !min.is_finite() {
        return (0.0, 1.0);
    }
    if (max - min).abs() < f64::EPSILON {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}

fn draw_series_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    ticks: &[String],
    values: &[f64],
) -> Result<(), RenderError> {
    let x_end = values.len().saturating_sub(1).max(1);
    let (y_min, y_max) = value_range(values);

    let mut chart = ChartBuilder::on(area)
        .caption(panel.title, (FONT_FAMILY, 18))
        .margin(10)
        .x_label_area_size(X_LABEL_AREA)
        .y_label_area_size(Y_LABEL_AREA)
        .build_cartesian_2d(0usize..x_end, y_min..y_max)
        .map_err(drawing_error)?;

    let tick_label = |i: &usize| ticks.get(*i).cloned().unwrap_or_default();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Time")
        .y_desc(panel.y_label)
        .x_labels(ticks.len().min(MAX_X_LABELS))
        .x_label_formatter(&tick_label)
        .x_label_style(
            (FONT_FAMILY, TICK_FONT_SIZE)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .axis_desc_style((FONT_FAMILY, AXIS_DESC_FONT_SIZE))
        .draw()
        .map_err(drawing_error)?;

    chart
        .draw_series(LineSeries::new(
            values.iter().enumerate().map(|(i, v)| (i, *v)),
            &BLUE,
        ))
        .map_err(drawing_error)?;

    Ok(())
}

fn draw_label_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    lines: &[String],
) -> Result<(), RenderError> {
    let (width, height) = area.dim_in_pixel();
    let style = TextStyle::from((FONT_FAMILY, 20).into_font()).color(&BLACK);
    let line_height = 28;

    let x = (width as f64 * 0.1) as i32;
    let mut y = (height as f64 * 0.5) as i32 - line_height * lines.len() as i32 / 2;
    for line in lines {
        if !line.is_empty() {
            area.draw_text(line, &style, (x, y))
                .map_err(drawing_error)?;
        }
        y += line_height;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::extractor::tests::{document_with_samples, SINGLE_SAMPLE};
    use crate::render::sink::ImageFileSink;
    use std::cell::RefCell;
    use std::path::PathBuf;

    /// Hands out a fixed target and records which completion hook ran.
    struct RecordingSink {
        target: PathBuf,
        finished: RefCell<bool>,
        aborted: RefCell<Option<PathBuf>>,
    }

    impl RecordingSink {
        fn new(target: PathBuf) -> Self {
            Self {
                target,
                finished: RefCell::new(false),
                aborted: RefCell::new(None),
            }
        }
    }

    impl ChartSink for RecordingSink {
        fn prepare(&self) -> Result<PathBuf, RenderError> {
            Ok(self.target.clone())
        }

        fn finish(&self, rendered: PathBuf) -> Result<ChartOutput, RenderError> {
            *self.finished.borrow_mut() = true;
            Ok(ChartOutput::Written(rendered))
        }

        fn abort(&self, prepared: &Path) {
            *self.aborted.borrow_mut() = Some(prepared.to_path_buf());
        }
    }

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    fn png_dimensions(bytes: &[u8]) -> (u32, u32) {
        // IHDR is always the first chunk: width and height follow the chunk type.
        let width = u32::from_be_bytes(bytes[16..20].try_into().unwrap());
        let height = u32::from_be_bytes(bytes[20..24].try_into().unwrap());
        (width, height)
    }

    #[test]
    fn test_label_lines() -> Result<(), RenderError> {
        let renderer = Renderer::default();
        let series = series_from_str(SINGLE_SAMPLE)?;

        assert_eq!(
            renderer.label_lines(&series),
            vec![
                "Weather forecast for Oslo:".to_string(),
                String::new(),
                "2023-06-16 06:00:00".to_string(),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_render_writes_png_of_configured_size() -> Result<(), RenderError> {
        let tmp = tempfile::tempdir().unwrap();
        let sink = ImageFileSink::new(tmp.path().join("assets"));
        let renderer = Renderer::default();

        let output = renderer.render(&document_with_samples(48), &sink)?;

        assert_eq!(
            output,
            ChartOutput::Written(tmp.path().join("assets").join("forecast.png"))
        );
        let bytes = std::fs::read(output.path()).unwrap();
        assert_eq!(bytes[..8], PNG_SIGNATURE);
        assert_eq!(png_dimensions(&bytes), (1200, 600));
        Ok(())
    }

    #[test]
    fn test_render_overwrites_previous_image() -> Result<(), RenderError> {
        let tmp = tempfile::tempdir().unwrap();
        let sink = ImageFileSink::new(tmp.path());
        let renderer = Renderer::new(RenderConfig::builder().size((400, 300)).build());

        let first = renderer.render(SINGLE_SAMPLE, &sink)?;
        let second = renderer.render(&document_with_samples(5), &sink)?;

        assert_eq!(first.path(), second.path());
        let entries = std::fs::read_dir(tmp.path()).unwrap().count();
        assert_eq!(entries, 1);
        let bytes = std::fs::read(second.path()).unwrap();
        assert_eq!(png_dimensions(&bytes), (400, 300));
        Ok(())
    }

    #[test]
    fn test_render_file_reads_from_disk() -> Result<(), RenderError> {
        let tmp = tempfile::tempdir().unwrap();
        let doc = tmp.path().join("2023-06-16.json");
        std::fs::write(&doc, SINGLE_SAMPLE).unwrap();

        let output = Renderer::default().render_file(&doc, &ImageFileSink::new(tmp.path()))?;

        assert!(output.path().is_file());
        Ok(())
    }

    #[test]
    fn test_empty_series_is_reported_and_nothing_written() {
        let tmp = tempfile::tempdir().unwrap();
        let out_dir = tmp.path().join("assets");

        let err = Renderer::default()
            .render(&document_with_samples(0), &ImageFileSink::new(&out_dir))
            .unwrap_err();

        assert!(matches!(err, RenderError::NoSamples));
        assert!(!out_dir.exists());
    }

    #[test]
    fn test_malformed_document_produces_no_chart() {
        let tmp = tempfile::tempdir().unwrap();
        let out_dir = tmp.path().join("assets");
        let content = r#"{"properties":{"meta":{"updated_at":"2023-06-16T06:00:00Z"}}}"#;

        let err = Renderer::default()
            .render(content, &ImageFileSink::new(&out_dir))
            .unwrap_err();

        assert!(matches!(err, RenderError::MalformedDocument(_)));
        assert!(!out_dir.exists());
    }

    #[test]
    fn test_value_range() {
        assert_eq!(value_range(&[]), (0.0, 1.0));
        assert_eq!(value_range(&[5.0, 5.0]), (4.0, 6.0));
        let (lo, hi) = value_range(&[0.0, 10.0, f64::NAN]);
        assert!((lo + 0.5).abs() < 1e-9);
        assert!((hi - 10.5).abs() < 1e-9);
    }

    #[test]
    fn test_failed_draw_aborts_the_sink() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("missing").join("forecast.png");
        let sink = RecordingSink::new(target.clone());

        let err = Renderer::default().render(SINGLE_SAMPLE, &sink).unwrap_err();

        assert!(matches!(err, RenderError::Drawing(_)), "unexpected: {err:?}");
        assert_eq!(*sink.aborted.borrow(), Some(target));
        assert!(!*sink.finished.borrow());
    }

    #[test]
    fn test_x_label_area_fits_rotated_ticks_and_description() -> Result<(), RenderError> {
        register_chart_font()?;
        let (tick_width, _) = (FONT_FAMILY, TICK_FONT_SIZE)
            .into_font()
            .box_size("00:00")
            .unwrap();
        let (_, desc_height) = (FONT_FAMILY, AXIS_DESC_FONT_SIZE)
            .into_font()
            .box_size("Time")
            .unwrap();

        // Rotated ticks stand as tall as they are wide; leave room for tick marks.
        assert!(
            tick_width + desc_height + 10 <= X_LABEL_AREA,
            "tick {tick_width}px + description {desc_height}px exceed {X_LABEL_AREA}px"
        );
        Ok(())
    }
}
