use axum::{
    Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    SkyCastError, VERSION,
    models::{ComparisonResult, DateRange, Location},
    pipeline::{ComparisonRequest, ComparisonRun, ComparisonService},
};

/// Days before `end` covered when the caller gives no start date
const DEFAULT_WINDOW_DAYS: u32 = 30;

#[derive(Clone)]
pub struct AppState {
    service: ComparisonService,
}

impl AppState {
    pub fn new(service: ComparisonService) -> Self {
        Self { service }
    }
}

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    kind: &'static str,
    retryable: bool,
}

/// `SkyCastError` rendered as a JSON error response
pub struct ApiError(SkyCastError);

impl From<SkyCastError> for ApiError {
    fn from(err: SkyCastError) -> Self {
        Self(err)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(SkyCastError::validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            SkyCastError::NotFound { .. } => StatusCode::NOT_FOUND,
            SkyCastError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            SkyCastError::MalformedResponse { .. } => StatusCode::BAD_GATEWAY,
            SkyCastError::Validation { .. } => StatusCode::BAD_REQUEST,
            SkyCastError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ApiErrorBody {
            error: self.0.user_message(),
            kind: self.0.kind(),
            retryable: self.0.is_retryable(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

#[derive(Deserialize)]
pub struct ResolveQuery {
    pub name: Option<String>,
}

/// Dates arrive as raw strings so a cleared form field (`start=`) means "not given"
#[derive(Deserialize)]
pub struct CompareQuery {
    pub city_a: Option<String>,
    pub city_b: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

fn parse_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, SkyCastError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => NaiveDate::parse_from_str(v, "%Y-%m-%d").map(Some).map_err(|_| {
            SkyCastError::validation(format!("Invalid '{field}' date '{v}', expected YYYY-MM-DD"))
        }),
    }
}

impl CompareQuery {
    fn into_request(self, today: NaiveDate) -> Result<ComparisonRequest, SkyCastError> {
        let city_a = self
            .city_a
            .ok_or_else(|| SkyCastError::validation("Missing 'city_a' parameter"))?;
        let city_b = self
            .city_b
            .ok_or_else(|| SkyCastError::validation("Missing 'city_b' parameter"))?;

        let start = parse_date("start", self.start.as_deref())?;
        let end = parse_date("end", self.end.as_deref())?.unwrap_or(today);
        let range = match start {
            Some(start) => DateRange::new(start, end)?,
            None => DateRange::trailing(end, DEFAULT_WINDOW_DAYS)?,
        };

        Ok(ComparisonRequest {
            city_a,
            city_b,
            range,
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/resolve", get(resolve_location))
        .route("/compare", get(compare_cities))
        .with_state(state)
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: VERSION,
    })
}

async fn resolve_location(
    State(state): State<AppState>,
    params: Result<Query<ResolveQuery>, QueryRejection>,
) -> Result<Json<Location>, ApiError> {
    let Query(params) = params?;
    let name = params.name.unwrap_or_default();
    let location = state.service.resolve(&name).await?;
    Ok(Json(location))
}

async fn compare_cities(
    State(state): State<AppState>,
    params: Result<Query<CompareQuery>, QueryRejection>,
) -> Result<Json<ComparisonResult>, ApiError> {
    let Query(params) = params?;
    let request = params.into_request(Utc::now().date_naive())?;

    let mut run = ComparisonRun::new();
    run.execute(&state.service, &request).await;
    Ok(Json(run.into_result()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn query(start: Option<NaiveDate>, end: Option<NaiveDate>) -> CompareQuery {
        CompareQuery {
            city_a: Some("New York".to_string()),
            city_b: Some("London".to_string()),
            start: start.map(|d| d.to_string()),
            end: end.map(|d| d.to_string()),
        }
    }

    #[test]
    fn test_default_range_is_trailing_window() {
        let request = query(None, None).into_request(date(7, 31)).unwrap();
        assert_eq!(request.range.end(), date(7, 31));
        assert_eq!(request.range.start(), date(7, 1));
    }

    #[test]
    fn test_explicit_range() {
        let request = query(Some(date(1, 1)), Some(date(1, 30)))
            .into_request(date(7, 31))
            .unwrap();
        assert_eq!(request.range.num_days(), 30);
    }

    #[test]
    fn test_reversed_range_is_validation_error() {
        let err = query(Some(date(2, 1)), Some(date(1, 1)))
            .into_request(date(7, 31))
            .unwrap_err();
        assert!(matches!(err, SkyCastError::Validation { .. }));
    }

    #[test]
    fn test_empty_dates_fall_back_to_defaults() {
        let mut q = query(None, None);
        q.start = Some(String::new());
        q.end = Some(" ".to_string());
        let request = q.into_request(date(7, 31)).unwrap();
        assert_eq!(request.range.end(), date(7, 31));
        assert_eq!(request.range.num_days(), 31);
    }

    #[test]
    fn test_invalid_date_is_validation_error() {
        let mut q = query(None, None);
        q.start = Some("2024-13-01".to_string());
        let err = q.into_request(date(7, 31)).unwrap_err();
        assert!(matches!(err, SkyCastError::Validation { .. }));
        assert!(err.to_string().contains("start"));
    }

    #[test]
    fn test_missing_city_is_validation_error() {
        let mut q = query(None, None);
        q.city_b = None;
        let err = q.into_request(date(7, 31)).unwrap_err();
        assert!(err.to_string().contains("city_b"));
    }

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (SkyCastError::not_found("x"), StatusCode::NOT_FOUND),
            (SkyCastError::service_unavailable("x"), StatusCode::SERVICE_UNAVAILABLE),
            (SkyCastError::malformed("x"), StatusCode::BAD_GATEWAY),
            (SkyCastError::validation("x"), StatusCode::BAD_REQUEST),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }
}
