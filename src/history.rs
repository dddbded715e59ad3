//! History Fetcher: daily maximum temperatures for a coordinate and date range

use crate::models::{Coordinate, DateRange, RawDailySeries};
use crate::weather::WeatherSource;
use crate::{Result, SkyCastError};
use tracing::{debug, instrument};

/// Fetch the raw daily series for `range` at `coordinate`.
///
/// The source's order is passed through untouched. The result always has one
/// date per day in `range`; a source that returns a different count is
/// reported as `MalformedResponse`.
#[instrument(skip_all, fields(coordinate = %coordinate.format(), start = %range.start(), end = %range.end()))]
pub async fn fetch(
    source: &dyn WeatherSource,
    coordinate: &Coordinate,
    range: &DateRange,
) -> Result<RawDailySeries> {
    let raw = source.daily_max_temperatures(coordinate, range).await?;

    if raw.time.len() != range.num_days() {
        return Err(SkyCastError::malformed(format!(
            "Expected {} days but the source returned {}",
            range.num_days(),
            raw.time.len()
        )));
    }

    debug!(
        "Fetched {} days, {} missing",
        raw.time.len(),
        raw.temperature_max.iter().filter(|v| v.is_none()).count()
    );
    Ok(raw)
}
