//! Daily temperature series and the date ranges they cover

use crate::{Result, SkyCastError};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Inclusive calendar date range, `start <= end`
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "DateRangeInput")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct DateRangeInput {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<DateRangeInput> for DateRange {
    type Error = SkyCastError;

    fn try_from(input: DateRangeInput) -> Result<Self> {
        DateRange::new(input.start, input.end)
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(SkyCastError::validation(format!(
                "Start date {start} is after end date {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// The range `end - days ..= end`, the dashboard's default window
    pub fn trailing(end: NaiveDate, days: u32) -> Result<Self> {
        let start = end
            .checked_sub_signed(Duration::days(i64::from(days)))
            .ok_or_else(|| SkyCastError::validation("Date range start is out of bounds"))?;
        Self::new(start, end)
    }

    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days covered, both ends included
    #[must_use]
    pub fn num_days(&self) -> usize {
        // start <= end is guaranteed by construction
        usize::try_from((self.end - self.start).num_days() + 1).unwrap_or(0)
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        self.start.iter_days().take(self.num_days())
    }
}

/// Parallel `time` / `temperature_2m_max` arrays as the archive API returns them
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct RawDailySeries {
    pub time: Vec<String>,
    pub temperature_max: Vec<Option<f64>>,
}

/// One day's maximum temperature in Celsius; `None` when the source has no value
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct DailyReading {
    pub date: NaiveDate,
    pub max_temperature: Option<f64>,
}

/// Readings for one city, in the order the source returned them
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CityTimeSeries {
    pub label: String,
    pub readings: Vec<DailyReading>,
}

impl CityTimeSeries {
    #[must_use]
    pub fn new(label: String, readings: Vec<DailyReading>) -> Self {
        Self { label, readings }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Iterate over the temperatures that are actually present
    pub fn present_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.readings.iter().filter_map(|r| r.max_temperature)
    }

    #[must_use]
    pub fn missing_count(&self) -> usize {
        self.readings
            .iter()
            .filter(|r| r.max_temperature.is_none())
            .count()
    }

    /// Convert back into the source's parallel-array shape
    #[must_use]
    pub fn to_raw(&self) -> RawDailySeries {
        RawDailySeries {
            time: self
                .readings
                .iter()
                .map(|r| r.date.format("%Y-%m-%d").to_string())
                .collect(),
            temperature_max: self.readings.iter().map(|r| r.max_temperature).collect(),
        }
    }
}
