//! Data models for `SkyCast`
//!
//! - Location: geocoded places and validated coordinates
//! - Weather: date ranges and daily temperature series
//! - Comparison: the two-city result handed to the dashboard

pub mod comparison;
pub mod location;
pub mod weather;

pub use comparison::{
    Average, ChartDataset, ChartTrace, CitySummary, ComparisonResult, TableRow,
};
pub use location::{Coordinate, Location};
pub use weather::{CityTimeSeries, DailyReading, DateRange, RawDailySeries};
