//! Turns the source's parallel arrays into a labelled series

use crate::models::{CityTimeSeries, DailyReading, RawDailySeries};
use crate::{Result, SkyCastError};
use chrono::NaiveDate;

/// Pair up dates and values and tag the result with `city_label`.
///
/// Order is preserved and missing values stay missing. Fails with
/// `MalformedResponse` when the arrays differ in length or a date does not parse.
pub fn normalize(raw: &RawDailySeries, city_label: &str) -> Result<CityTimeSeries> {
    if raw.time.len() != raw.temperature_max.len() {
        return Err(SkyCastError::malformed(format!(
            "{} dates but {} temperature values",
            raw.time.len(),
            raw.temperature_max.len()
        )));
    }

    let readings = raw
        .time
        .iter()
        .zip(&raw.temperature_max)
        .map(|(time, value)| {
            let date = NaiveDate::parse_from_str(time, "%Y-%m-%d")
                .map_err(|e| SkyCastError::malformed(format!("Invalid date '{time}': {e}")))?;
            Ok(DailyReading {
                date,
                max_temperature: *value,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CityTimeSeries::new(city_label.to_string(), readings))
}
