use chrono::{DateTime, NaiveDateTime, Utc};
use polars::prelude::*;

/// Format used for x axis tick labels.
pub const TICK_FORMAT: &str = "%H:%M";

/// Format used for the update timestamp in the label panel.
pub const UPDATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single timestamped reading taken from a forecast document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherSample {
    pub time: DateTime<Utc>,
    pub air_temperature: f64,
    pub cloud_area_fraction: f64,
    pub wind_speed: f64,
}

/// Chart-ready view of a forecast document: four parallel columns of equal length
/// in upstream order, plus the document's update time.
///
/// Columns are only ever grown together through [`ForecastSeries::push`], which keeps
/// the equal-length invariant.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSeries {
    updated_at: DateTime<Utc>,
    times: Vec<DateTime<Utc>>,
    air_temperatures: Vec<f64>,
    cloud_coverages: Vec<f64>,
    wind_speeds: Vec<f64>,
}

impl ForecastSeries {
    pub fn with_capacity(updated_at: DateTime<Utc>, capacity: usize) -> Self {
        Self {
            updated_at,
            times: Vec::with_capacity(capacity),
            air_temperatures: Vec::with_capacity(capacity),
            cloud_coverages: Vec::with_capacity(capacity),
            wind_speeds: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, sample: WeatherSample) {
        self.times.push(sample.time);
        self.air_temperatures.push(sample.air_temperature);
        self.cloud_coverages.push(sample.cloud_area_fraction);
        self.wind_speeds.push(sample.wind_speed);
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn times(&self) -> &[DateTime<Utc>] {
        &self.times
    }

    pub fn air_temperatures(&self) -> &[f64] {
        &self.air_temperatures
    }

    pub fn cloud_coverages(&self) -> &[f64] {
        &self.cloud_coverages
    }

    pub fn wind_speeds(&self) -> &[f64] {
        &self.wind_speeds
    }

    /// Returns the sample at `idx`, reassembled from the columns.
    pub fn get(&self, idx: usize) -> Option<WeatherSample> {
        Some(WeatherSample {
            time: *self.times.get(idx)?,
            air_temperature: self.air_temperatures[idx],
            cloud_area_fraction: self.cloud_coverages[idx],
            wind_speed: self.wind_speeds[idx],
        })
    }

    /// Tick labels shared by every time series panel, one per sample.
    pub fn tick_labels(&self) -> Vec<String> {
        self.times
            .iter()
            .map(|t| t.format(TICK_FORMAT).to_string())
            .collect()
    }

    /// Converts the columns into a Polars `DataFrame` with columns
    /// `time`, `air_temperature`, `cloud_area_fraction` and `wind_speed`.
    ///
    /// The `time` column holds timezone-naive UTC datetimes.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let times: Vec<NaiveDateTime> = self.times.iter().map(|t| t.naive_utc()).collect();
        df!(
            "time" => times,
            "air_temperature" => &self.air_temperatures,
            "cloud_area_fraction" => &self.cloud_coverages,
            "wind_speed" => &self.wind_speeds
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(hour: u32, temp: f64) -> WeatherSample {
        WeatherSample {
            time: Utc.with_ymd_and_hms(2023, 6, 16, hour, 0, 0).unwrap(),
            air_temperature: temp,
            cloud_area_fraction: 50.0,
            wind_speed: 1.5,
        }
    }

    #[test]
    fn test_push_keeps_columns_aligned() {
        let updated = Utc.with_ymd_and_hms(2023, 6, 16, 6, 0, 0).unwrap();
        let mut series = ForecastSeries::with_capacity(updated, 2);
        series.push(sample(7, 10.0));
        series.push(sample(8, 11.5));

        assert_eq!(series.len(), 2);
        assert_eq!(series.air_temperatures().len(), series.times().len());
        assert_eq!(series.cloud_coverages().len(), series.times().len());
        assert_eq!(series.wind_speeds().len(), series.times().len());
        assert_eq!(series.get(1), Some(sample(8, 11.5)));
        assert_eq!(series.get(2), None);
        assert_eq!(series.tick_labels(), vec!["07:00", "08:00"]);
    }

    #[test]
    fn test_to_frame_shape_and_values() -> Result<(), Box<dyn std::error::Error>> {
        let updated = Utc.with_ymd_and_hms(2023, 6, 16, 6, 0, 0).unwrap();
        let mut series = ForecastSeries::with_capacity(updated, 3);
        for (h, t) in [(6, 12.3), (7, 13.0), (8, 13.8)] {
            series.push(sample(h, t));
        }

        let frame = series.to_frame()?;

        assert_eq!(frame.shape(), (3, 4));
        assert!(matches!(
            frame.column("time")?.dtype(),
            DataType::Datetime(_, None)
        ));
        let temps: Vec<Option<f64>> = frame.column("air_temperature")?.f64()?.into_iter().collect();
        assert_eq!(temps, vec![Some(12.3), Some(13.0), Some(13.8)]);
        Ok(())
    }
}
