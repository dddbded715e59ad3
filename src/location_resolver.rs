//! Location Resolution Module
//!
//! Resolves free-text place names into geocoded locations.

use crate::models::Location;
use crate::weather::WeatherSource;
use crate::{Result, SkyCastError};
use tracing::{debug, instrument};

/// Service for resolving place names
pub struct LocationResolver;

impl LocationResolver {
    /// Resolve a place name to its best geocoding match.
    ///
    /// The name is trimmed before lookup. The first candidate the geocoder
    /// returns wins; no candidates is `NotFound`, a failed call is
    /// `ServiceUnavailable`.
    #[instrument(skip(source))]
    pub async fn resolve(source: &dyn WeatherSource, place_name: &str) -> Result<Location> {
        let name = place_name.trim();
        if name.is_empty() {
            return Err(SkyCastError::validation("Place name cannot be empty"));
        }

        debug!("Geocoding location name: {}", name);

        let location = source
            .search_locations(name)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| SkyCastError::not_found(name))?;

        debug!(
            "Resolved '{}' to {} at ({})",
            name,
            location.display_name(),
            location.coordinate.format()
        );

        Ok(location)
    }
}
