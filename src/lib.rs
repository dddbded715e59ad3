//! `SkyCast` - historical temperature comparison between two cities
//!
//! This library geocodes two place names, fetches their daily maximum
//! temperatures from Open-Meteo, and builds a chart-ready comparison with
//! per-city summary statistics.

pub mod aggregator;
pub mod api;
pub mod config;
pub mod error;
pub mod history;
pub mod location_resolver;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use crate::config::SkyCastConfig;
pub use error::SkyCastError;
pub use location_resolver::LocationResolver;
pub use models::{Average, CityTimeSeries, ComparisonResult, Coordinate, DateRange, Location};
pub use pipeline::{ComparisonRequest, ComparisonRun, ComparisonService, RunState};
pub use weather::{OpenMeteoClient, WeatherSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SkyCastError>;
