use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::DateTime;
use chrono_tz::Tz;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{IntervalConfig, Timetable, TimetableConfig};

#[derive(Clone)]
pub struct AppState {
    timetable: Arc<RwLock<Timetable>>,
}

impl AppState {
    pub fn new(timetable: Timetable) -> Self {
        Self {
            timetable: Arc::new(RwLock::new(timetable)),
        }
    }

    fn timetable(&self) -> Arc<RwLock<Timetable>> {
        self.timetable.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    Invalid(String),
}

impl ApiError {
    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Invalid(message) => {
                tracing::debug!(%message, "rejecting request");
                let body = Json(ErrorBody {
                    error: "invalid_request",
                    message,
                });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ContainsQuery {
    at: String,
    #[serde(default)]
    tz: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ContainsResponse {
    pub at: String,
    pub contains: bool,
    pub matched_index: Option<usize>,
    pub matched_label: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/intervals", get(list_intervals).post(create_interval))
        .route("/contains", get(contains))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, timetable: Timetable) -> std::io::Result<()> {
    let state = AppState::new(timetable);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "timetable HTTP API listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_intervals(State(state): State<AppState>) -> Json<Vec<IntervalConfig>> {
    let timetable = state.timetable();
    let config = {
        let guard = timetable.read();
        TimetableConfig::from(&*guard)
    };
    Json(config.intervals)
}

async fn create_interval(
    State(state): State<AppState>,
    body: Result<Json<IntervalConfig>, JsonRejection>,
) -> Result<(StatusCode, Json<IntervalConfig>), ApiError> {
    let Json(config) = body.map_err(|rejection| ApiError::invalid(rejection.body_text()))?;
    let interval = config.to_interval();
    let created = IntervalConfig::from(&interval);
    let timetable = state.timetable();
    let count = {
        let mut guard = timetable.write();
        guard.push(interval);
        guard.len()
    };
    tracing::info!(intervals = count, "interval appended");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn contains(
    State(state): State<AppState>,
    Query(query): Query<ContainsQuery>,
) -> Result<Json<ContainsResponse>, ApiError> {
    let zone = match query.tz.as_deref() {
        None => Tz::UTC,
        Some(name) => name
            .parse::<Tz>()
            .map_err(|_| ApiError::invalid(format!("unknown timezone '{name}'")))?,
    };
    let at = DateTime::parse_from_rfc3339(&query.at)
        .map_err(|err| ApiError::invalid(format!("invalid instant '{}': {err}", query.at)))?
        .with_timezone(&zone);

    let timetable = state.timetable();
    let response = {
        let guard = timetable.read();
        let matched = guard.matching_interval(&at);
        ContainsResponse {
            at: at.to_rfc3339(),
            contains: matched.is_some(),
            matched_index: matched.map(|(idx, _)| idx),
            matched_label: matched.and_then(|(_, interval)| interval.label().map(str::to_string)),
        }
    };
    Ok(Json(response))
}
