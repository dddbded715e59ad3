//! Location model for geographic coordinates and metadata

use crate::{Result, SkyCastError};
use serde::{Deserialize, Serialize};

/// A validated latitude/longitude pair in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting values outside the WGS84 ranges
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(SkyCastError::validation(format!(
                "Latitude must be between -90 and 90, got: {latitude}"
            )));
        }

        if !(-180.0..=180.0).contains(&longitude) {
            return Err(SkyCastError::validation(format!(
                "Longitude must be between -180 and 180, got: {longitude}"
            )));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Format as a coordinates string
    #[must_use]
    pub fn format(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// A geocoded place
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Place name as reported by the geocoder
    pub name: String,
    pub coordinate: Coordinate,
    pub country: Option<String>,
    /// First-level administrative area (state, region)
    pub admin1: Option<String>,
}

impl Location {
    #[must_use]
    pub fn new(name: String, coordinate: Coordinate) -> Self {
        Self {
            name,
            coordinate,
            country: None,
            admin1: None,
        }
    }

    /// Name, region and country joined for display, e.g. "London, England, United Kingdom"
    #[must_use]
    pub fn display_name(&self) -> String {
        [Some(&self.name), self.admin1.as_ref(), self.country.as_ref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
