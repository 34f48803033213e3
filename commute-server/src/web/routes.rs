//! HTTP route handlers.

use std::sync::atomic::Ordering;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::bike::{BikeError, BikeMetrics, DirectionMetrics, direction_metrics, simple_metrics};
use crate::schedule::{self, ScheduleError};

use super::dto::*;
use super::state::AppState;

/// Default number of departures returned by `/bus`.
const DEFAULT_BUS_COUNT: usize = 5;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/congestion", get(congestion))
        .route("/bus", get(bus))
        .route("/timetable", get(timetable))
        .route("/bike", get(bike))
        .route("/bike-direction", get(bike_direction))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Band a raw object count into a congestion level.
fn congestion_level(count: usize) -> CongestionLevel {
    if count < 10 {
        CongestionLevel::Low
    } else if count <= 20 {
        CongestionLevel::Mid
    } else {
        CongestionLevel::High
    }
}

/// Latest object count with its congestion band.
async fn congestion(State(state): State<AppState>) -> Json<CongestionResponse> {
    let count = state.latest_count.load(Ordering::Relaxed);
    Json(CongestionResponse {
        count,
        level: congestion_level(count),
    })
}

/// Next departures, across all lines or for one line.
async fn bus(
    State(state): State<AppState>,
    Query(req): Query<BusRequest>,
) -> Result<Json<BusResponse>, AppError> {
    let now = Utc::now().with_timezone(&state.tz);
    let count = req.n.unwrap_or(DEFAULT_BUS_COUNT).clamp(1, 50);

    let departures = match req.line {
        Some(ref line) => schedule::next_buses(&state.timetable, line, now, count)?,
        None => schedule::next_across_all(&state.timetable, now, count),
    };

    let items: Vec<_> = departures.iter().map(|d| schedule::shape(now, d)).collect();
    Ok(Json(BusResponse {
        from: now.to_rfc3339(),
        count: items.len(),
        items,
    }))
}

/// The full static timetable with today's classification.
async fn timetable(State(state): State<AppState>) -> Json<TimetableResponse> {
    let now = Utc::now().with_timezone(&state.tz);
    Json(TimetableResponse {
        tz: state.tz_name.clone(),
        day_type_today: schedule::day_type_for(now.date_naive()),
        lines: state.timetable.lines().map(str::to_string).collect(),
        timetable: (*state.timetable).clone(),
    })
}

/// Simple bike availability, cached for 60 seconds.
async fn bike(State(state): State<AppState>) -> Result<Json<BikeMetrics>, AppError> {
    if let Some(cached) = state.bike_cache.fresh().await {
        return Ok(Json(cached));
    }

    match fetch_simple(&state).await {
        Ok(metrics) => {
            state.bike_cache.store(metrics.clone()).await;
            Ok(Json(metrics))
        }
        Err(e) => match state.bike_cache.last().await {
            Some(stale) => {
                warn!("bike fetch failed, serving stale cache: {e}");
                Ok(Json(stale))
            }
            None => Err(AppError::BadGateway {
                message: e.to_string(),
            }),
        },
    }
}

/// Directional bike availability; same policy, independent cache.
async fn bike_direction(
    State(state): State<AppState>,
) -> Result<Json<DirectionMetrics>, AppError> {
    if let Some(cached) = state.direction_cache.fresh().await {
        return Ok(Json(cached));
    }

    match fetch_direction(&state).await {
        Ok(metrics) => {
            state.direction_cache.store(metrics.clone()).await;
            Ok(Json(metrics))
        }
        Err(e) => match state.direction_cache.last().await {
            Some(stale) => {
                warn!("bike-direction fetch failed, serving stale cache: {e}");
                Ok(Json(stale))
            }
            None => Err(AppError::BadGateway {
                message: e.to_string(),
            }),
        },
    }
}

async fn fetch_simple(state: &AppState) -> Result<BikeMetrics, BikeError> {
    let (info, status) = state.bike.fetch_both().await?;
    Ok(simple_metrics(&info, &status))
}

async fn fetch_direction(state: &AppState) -> Result<DirectionMetrics, BikeError> {
    let (info, status) = state.bike.fetch_both().await?;
    Ok(direction_metrics(&info, &status))
}

/// Error responses for the web layer.
#[derive(Debug)]
pub enum AppError {
    NotFound { message: String },
    BadGateway { message: String },
}

impl From<ScheduleError> for AppError {
    fn from(e: ScheduleError) -> Self {
        match e {
            ScheduleError::UnknownLine(_) => AppError::NotFound {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
        };

        tracing::error!("[{status}] {message}");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
