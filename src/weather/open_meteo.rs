//! Weather API client for Open-Meteo
//!
//! Geocoding goes through the search endpoint, history through the archive
//! endpoint. Neither needs an API key. Every request carries the configured
//! timeout and is attempted exactly once.

use super::WeatherSource;
use crate::config::WeatherConfig;
use crate::models::{Coordinate, DateRange, Location, RawDailySeries};
use crate::{Result, SkyCastError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// `WeatherSource` backed by the public Open-Meteo APIs
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    geocoding_url: String,
    archive_url: String,
    geocoding_count: u32,
}

impl OpenMeteoClient {
    /// Create a new client from the weather configuration
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone());

        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy.as_str())
                .map_err(|e| SkyCastError::config(format!("Invalid proxy '{proxy}': {e}")))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| SkyCastError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            geocoding_url: config.geocoding_url.clone(),
            archive_url: config.archive_url.clone(),
            geocoding_count: config.geocoding_count,
        })
    }

    fn geocoding_request_url(&self, name: &str) -> String {
        format!(
            "{}?name={}&count={}&language=en&format=json",
            self.geocoding_url,
            urlencoding::encode(name),
            self.geocoding_count
        )
    }

    fn archive_request_url(&self, coordinate: &Coordinate, range: &DateRange) -> String {
        format!(
            "{}?latitude={}&longitude={}&start_date={}&end_date={}&daily=temperature_2m_max&timezone=auto",
            self.archive_url,
            coordinate.latitude,
            coordinate.longitude,
            range.start().format("%Y-%m-%d"),
            range.end().format("%Y-%m-%d")
        )
    }

    /// Single GET; non-2xx becomes `ServiceUnavailable` with the upstream reason
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let start_time = Instant::now();
        debug!("Open-Meteo request URL: {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!("Network error after {:.3}s: {}", start_time.elapsed().as_secs_f64(), e);
            SkyCastError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let reason = serde_json::from_str::<UpstreamError>(&body)
                .map(|e| e.reason)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string()
                });
            warn!("Open-Meteo rejected request with {}: {}", status, reason);
            return Err(SkyCastError::service_unavailable(format!(
                "HTTP {}: {}",
                status.as_u16(),
                reason
            )));
        }

        let parsed = response.json::<T>().await?;
        debug!(
            "Open-Meteo response parsed in {:.3}s",
            start_time.elapsed().as_secs_f64()
        );
        Ok(parsed)
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoClient {
    #[instrument(skip(self))]
    async fn search_locations(&self, name: &str) -> Result<Vec<Location>> {
        let response: GeocodingResponse = self.get_json(&self.geocoding_request_url(name)).await?;
        let locations = into_locations(response)?;

        if locations.is_empty() {
            warn!("No results found for location '{}'", name);
        } else {
            info!("Found {} geocoding results for '{}'", locations.len(), name);
        }
        Ok(locations)
    }

    #[instrument(skip(self), fields(lat = coordinate.latitude, lon = coordinate.longitude))]
    async fn daily_max_temperatures(
        &self,
        coordinate: &Coordinate,
        range: &DateRange,
    ) -> Result<RawDailySeries> {
        let response: ArchiveResponse = self
            .get_json(&self.archive_request_url(coordinate, range))
            .await?;
        into_raw_series(response)
    }
}

/// Error body Open-Meteo sends with 4xx responses
#[derive(Debug, Deserialize)]
struct UpstreamError {
    reason: String,
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
    admin1: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    daily: Option<DailyData>,
}

#[derive(Debug, Deserialize)]
struct DailyData {
    time: Vec<String>,
    #[serde(rename = "temperature_2m_max")]
    temperature_max: Option<Vec<Option<f64>>>,
}

fn into_locations(response: GeocodingResponse) -> Result<Vec<Location>> {
    response
        .results
        .unwrap_or_default()
        .into_iter()
        .map(|result| {
            let coordinate = Coordinate::new(result.latitude, result.longitude).map_err(|e| {
                SkyCastError::malformed(format!("Geocoder returned bad coordinates: {e}"))
            })?;
            Ok(Location {
                name: result.name,
                coordinate,
                country: result.country,
                admin1: result.admin1,
            })
        })
        .collect()
}

fn into_raw_series(response: ArchiveResponse) -> Result<RawDailySeries> {
    let daily = response
        .daily
        .ok_or_else(|| SkyCastError::malformed("Archive response has no daily block"))?;
    let temperature_max = daily
        .temperature_max
        .ok_or_else(|| SkyCastError::malformed("Archive response has no temperature_2m_max"))?;

    Ok(RawDailySeries {
        time: daily.time,
        temperature_max,
    })
}
