//! Daily weather forcing: validated date-indexed series and the
//! window-slicing used by the driver.
//!
//! The engine does not fetch or gap-fill climate data; it consumes
//! already-validated daily values behind the `WeatherSource` seam.

use chrono::NaiveDate;

use crate::error::BalanceError;

/// A date-sorted daily series with unique dates and no NaN values.
///
/// Dates and values are parallel vectors, validated at construction.
#[derive(Debug, Clone)]
pub struct DailySeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl DailySeries {
    /// Build a series from parallel date/value vectors.
    ///
    /// Rejects empty input, length mismatch, NaN values, and dates that
    /// are not strictly increasing (which also enforces uniqueness).
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self, BalanceError> {
        if dates.is_empty() {
            return Err(BalanceError::InvalidSeries("series is empty".to_string()));
        }
        if dates.len() != values.len() {
            return Err(BalanceError::InvalidSeries(format!(
                "dates length {} does not match values length {}",
                dates.len(),
                values.len()
            )));
        }
        if values.iter().any(|v| v.is_nan()) {
            return Err(BalanceError::InvalidSeries(
                "series contains NaN values".to_string(),
            ));
        }
        if dates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(BalanceError::InvalidSeries(
                "dates must be strictly increasing".to_string(),
            ));
        }
        Ok(Self { dates, values })
    }

    /// Build a gap-free series starting at `start`, one value per day.
    pub fn from_start(start: NaiveDate, values: Vec<f64>) -> Result<Self, BalanceError> {
        let dates = (0..values.len() as u64)
            .map(|d| start + chrono::Days::new(d))
            .collect();
        Self::new(dates, values)
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no samples.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Slice the values covering `[from, to]`, both endpoints inclusive.
    ///
    /// Requires gap-free daily coverage of the window: a sample on every
    /// day from `from` through `to`. `label` names the series in errors.
    pub fn slice_window(
        &self,
        label: &'static str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<&[f64], BalanceError> {
        let missing = || BalanceError::InsufficientData {
            series: label,
            from,
            to,
        };
        let first = *self.dates.first().ok_or_else(missing)?;
        let last = *self.dates.last().ok_or_else(missing)?;
        if first > from || last < to {
            return Err(missing());
        }
        let start_idx = self.dates.partition_point(|d| *d < from);
        let end_idx = self.dates.partition_point(|d| *d <= to);
        let expected = (to - from).num_days() + 1;
        if (end_idx - start_idx) as i64 != expected {
            // A hole inside the window would silently shift every later
            // day of the season; treat it as missing coverage.
            return Err(missing());
        }
        Ok(&self.values[start_idx..end_idx])
    }
}

/// Narrow seam over weather acquisition: the driver only ever asks for
/// the two daily series.
pub trait WeatherSource {
    fn precipitation(&self) -> &DailySeries;
    fn eto(&self) -> &DailySeries;
}

/// In-memory weather pair, the default source for tests and callers
/// that already hold their series.
#[derive(Debug, Clone)]
pub struct MemoryWeather {
    precipitation: DailySeries,
    eto: DailySeries,
}

impl MemoryWeather {
    pub fn new(precipitation: DailySeries, eto: DailySeries) -> Self {
        Self { precipitation, eto }
    }
}

impl WeatherSource for MemoryWeather {
    fn precipitation(&self) -> &DailySeries {
        &self.precipitation
    }

    fn eto(&self) -> &DailySeries {
        &self.eto
    }
}
