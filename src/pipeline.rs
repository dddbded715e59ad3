//! Two-city comparison runs
//!
//! Each run resolves, fetches and normalizes both cities concurrently, then
//! aggregates. Either branch failing fails the whole run.

use crate::aggregator;
use crate::history;
use crate::location_resolver::LocationResolver;
use crate::models::{CityTimeSeries, ComparisonResult, DateRange};
use crate::normalizer::normalize;
use crate::weather::WeatherSource;
use crate::{Result, SkyCastError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// The user's selections for one comparison
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonRequest {
    pub city_a: String,
    pub city_b: String,
    pub range: DateRange,
}

/// Runs the resolve → fetch → normalize pipeline for both cities
#[derive(Clone)]
pub struct ComparisonService {
    source: Arc<dyn WeatherSource>,
}

impl ComparisonService {
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        Self { source }
    }

    /// Compare both cities of `request`.
    ///
    /// The branches run concurrently. The first failure drops the other
    /// branch's future; `series_a` is always `city_a` whatever finishes first.
    #[instrument(skip(self), fields(city_a = %request.city_a, city_b = %request.city_b))]
    pub async fn compare(&self, request: &ComparisonRequest) -> Result<ComparisonResult> {
        let (series_a, series_b) = futures::future::try_join(
            self.city_series(&request.city_a, &request.range),
            self.city_series(&request.city_b, &request.range),
        )
        .await?;

        Ok(aggregator::compare(series_a, series_b))
    }

    /// Resolve → fetch → normalize for a single city
    pub async fn city_series(&self, place: &str, range: &DateRange) -> Result<CityTimeSeries> {
        let location = LocationResolver::resolve(self.source.as_ref(), place).await?;
        let raw = history::fetch(self.source.as_ref(), &location.coordinate, range).await?;
        normalize(&raw, place.trim())
    }

    /// Resolve a single place name
    pub async fn resolve(&self, place: &str) -> Result<crate::models::Location> {
        LocationResolver::resolve(self.source.as_ref(), place).await
    }
}

/// Observable state of one comparison run
#[derive(Debug)]
pub enum RunState {
    Idle,
    Loading,
    Ready(Box<ComparisonResult>),
    Failed(SkyCastError),
}

impl RunState {
    fn name(&self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Loading => "loading",
            RunState::Ready(_) => "ready",
            RunState::Failed(_) => "failed",
        }
    }
}

/// A single comparison run: `Idle → Loading → Ready | Failed`
#[derive(Debug)]
pub struct ComparisonRun {
    state: RunState,
}

impl Default for ComparisonRun {
    fn default() -> Self {
        Self::new()
    }
}

impl ComparisonRun {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RunState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> &RunState {
        &self.state
    }

    fn transition(&mut self, next: RunState) {
        info!("Comparison run {} -> {}", self.state.name(), next.name());
        self.state = next;
    }

    /// Execute `request`. A run that already finished starts over from `Idle`.
    pub async fn execute(
        &mut self,
        service: &ComparisonService,
        request: &ComparisonRequest,
    ) -> &RunState {
        if !matches!(self.state, RunState::Idle) {
            self.transition(RunState::Idle);
        }

        let start_time = Instant::now();
        self.transition(RunState::Loading);

        let next = match service.compare(request).await {
            Ok(result) => {
                info!(
                    "{} averaged {}, {} averaged {}",
                    result.summary_a.label,
                    result.summary_a.average,
                    result.summary_b.label,
                    result.summary_b.average
                );
                RunState::Ready(Box::new(result))
            }
            Err(e) => {
                warn!("Comparison failed: {}", e);
                RunState::Failed(e)
            }
        };
        self.transition(next);

        info!(
            "Comparison run finished in {:.3}s",
            start_time.elapsed().as_secs_f64()
        );
        &self.state
    }

    /// Consume the run, yielding the result of a finished run
    pub fn into_result(self) -> Result<ComparisonResult> {
        match self.state {
            RunState::Ready(result) => Ok(*result),
            RunState::Failed(e) => Err(e),
            RunState::Idle | RunState::Loading => Err(SkyCastError::validation(
                "Comparison run has not completed",
            )),
        }
    }
}
