//! Comparison result model handed to the presentation layer

use super::CityTimeSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean of the present readings; `Undefined` when a series has none
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Average {
    Defined(f64),
    Undefined,
}

impl Average {
    /// Average of the given values, `Undefined` for an empty input
    pub fn of(values: impl IntoIterator<Item = f64>) -> Self {
        let (sum, count) = values
            .into_iter()
            .fold((0.0, 0_u32), |(sum, count), v| (sum + v, count + 1));
        if count == 0 {
            Average::Undefined
        } else {
            Average::Defined(sum / f64::from(count))
        }
    }

    #[must_use]
    pub fn value(&self) -> Option<f64> {
        match self {
            Average::Defined(v) => Some(*v),
            Average::Undefined => None,
        }
    }
}

impl fmt::Display for Average {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Average::Defined(v) => write!(f, "{v:.1}°C"),
            Average::Undefined => write!(f, "n/a"),
        }
    }
}

/// Summary metrics for one city
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CitySummary {
    pub label: String,
    pub average: Average,
    /// Readings with a value
    pub readings: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// One line on the chart
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChartTrace {
    pub label: String,
    /// CSS hex colour
    pub color: String,
    /// One entry per date on the shared axis
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChartDataset {
    pub title: String,
    pub y_axis_label: String,
    /// Sorted union of both series' dates
    pub dates: Vec<NaiveDate>,
    pub traces: Vec<ChartTrace>,
}

/// A row of the side-by-side raw data table
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TableRow {
    pub date: NaiveDate,
    pub city_a: Option<f64>,
    pub city_b: Option<f64>,
}

/// Everything the dashboard renders for one comparison run
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ComparisonResult {
    pub series_a: CityTimeSeries,
    pub series_b: CityTimeSeries,
    pub summary_a: CitySummary,
    pub summary_b: CitySummary,
    /// `summary_a.average - summary_b.average`
    pub average_difference: Average,
    pub chart: ChartDataset,
    /// Dates present in both series
    pub table: Vec<TableRow>,
}
