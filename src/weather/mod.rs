//! Upstream weather data access
//!
//! `WeatherSource` is the seam between the pipeline and the network: the
//! production implementation talks to Open-Meteo, tests plug in a fake.

use crate::Result;
use crate::models::{Coordinate, DateRange, Location, RawDailySeries};
use async_trait::async_trait;

pub mod open_meteo;

pub use open_meteo::OpenMeteoClient;

#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Candidate locations for a free-text place name, best match first
    async fn search_locations(&self, name: &str) -> Result<Vec<Location>>;

    /// Daily maximum temperatures at `coordinate` for every day in `range`
    async fn daily_max_temperatures(
        &self,
        coordinate: &Coordinate,
        range: &DateRange,
    ) -> Result<RawDailySeries>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::SkyCastError;
    use std::collections::HashMap;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    pub(crate) struct FakePlace {
        location: Location,
        temperatures: Vec<Option<f64>>,
        failure: Option<String>,
        delay: Duration,
    }

    /// In-memory source keyed by lower-case place name
    #[derive(Default)]
    pub(crate) struct FakeWeatherSource {
        places: HashMap<String, FakePlace>,
    }

    impl FakeWeatherSource {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        /// Register a place whose daily values cycle through `temperatures`
        pub(crate) fn with_place(
            mut self,
            name: &str,
            latitude: f64,
            longitude: f64,
            temperatures: &[Option<f64>],
        ) -> Self {
            let coordinate = Coordinate::new(latitude, longitude).unwrap();
            self.places.insert(
                name.to_lowercase(),
                FakePlace {
                    location: Location::new(name.to_string(), coordinate),
                    temperatures: temperatures.to_vec(),
                    failure: None,
                    delay: Duration::ZERO,
                },
            );
            self
        }

        /// Make history requests for `name` fail with `ServiceUnavailable`
        pub(crate) fn failing(mut self, name: &str, message: &str) -> Self {
            if let Some(place) = self.places.get_mut(&name.to_lowercase()) {
                place.failure = Some(message.to_string());
            }
            self
        }

        pub(crate) fn delayed(mut self, name: &str, delay: Duration) -> Self {
            if let Some(place) = self.places.get_mut(&name.to_lowercase()) {
                place.delay = delay;
            }
            self
        }
    }

    #[async_trait]
    impl WeatherSource for FakeWeatherSource {
        async fn search_locations(&self, name: &str) -> Result<Vec<Location>> {
            Ok(self
                .places
                .get(&name.to_lowercase())
                .map(|place| vec![place.location.clone()])
                .unwrap_or_default())
        }

        async fn daily_max_temperatures(
            &self,
            coordinate: &Coordinate,
            range: &DateRange,
        ) -> Result<RawDailySeries> {
            let place = self
                .places
                .values()
                .find(|place| place.location.coordinate == *coordinate)
                .ok_or_else(|| SkyCastError::service_unavailable("unknown coordinate"))?;

            tokio::time::sleep(place.delay).await;

            if let Some(message) = &place.failure {
                return Err(SkyCastError::service_unavailable(message.clone()));
            }

            Ok(RawDailySeries {
                time: range.days().map(|d| d.to_string()).collect(),
                temperature_max: place
                    .temperatures
                    .iter()
                    .copied()
                    .cycle()
                    .take(range.num_days())
                    .collect(),
            })
        }
    }

    /// Local HTTP endpoint that accepts connections and never answers
    pub(crate) async fn stalled_endpoint() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        format!("http://{addr}")
    }

    /// Local HTTP endpoint that answers every request with `status` and a JSON `body`
    pub(crate) async fn fixed_response_endpoint(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut request = Vec::new();
                let mut buf = [0_u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let response = format!(
                    "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{addr}")
    }
}
