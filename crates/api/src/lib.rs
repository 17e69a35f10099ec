use std::env;
use std::sync::Arc;

use anyhow::Result;
use axum::body::Body;
use axum::extract::{Json, Path, State};
use axum::http::{Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use flightdesk_agents::LiveFlightAgent;
use flightdesk_core::{normalize_flight_number, AppConfig, QueryInput};
use flightdesk_observability::{AppMetrics, MetricsSnapshot};
use serde::Serialize;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

const MAX_QUERY_CHARS: usize = 2_000;
const MAX_FLIGHT_NUMBER_CHARS: usize = 16;
const MAX_BODY_BYTES: usize = 16 * 1024;
const DEFAULT_BIND: &str = "0.0.0.0:8080";

#[derive(Clone)]
pub struct ApiState {
    pub agent: Arc<LiveFlightAgent>,
    pub metrics: Arc<AppMetrics>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub bind: String,
    pub api_key: Option<String>,
}

impl ApiSettings {
    pub fn from_env() -> Self {
        Self {
            bind: env::var("FLIGHTDESK_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string()),
            api_key: env::var("FLIGHTDESK_API_KEY")
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    metrics: MetricsSnapshot,
}

pub fn build_app(config: &AppConfig, api_key: Option<String>) -> Result<Router> {
    let metrics = AppMetrics::shared();
    let agent = Arc::new(LiveFlightAgent::from_config(config, metrics.clone())?);

    info!(
        model = %config.llm.model,
        flight_data = %config.flight_data.base_url,
        api_key_required = api_key.is_some(),
        "flightdesk api configured"
    );

    Ok(build_router(ApiState {
        agent,
        metrics,
        api_key,
    }))
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/answer", post(answer))
        .route("/v1/flights/:flight_number", get(flight_info))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api_key_middleware,
        ))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        // Set must wrap Propagate so the id exists before it is copied back.
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        metrics: state.metrics.snapshot(),
    })
}

async fn answer(State(state): State<ApiState>, Json(input): Json<QueryInput>) -> Response {
    if input.query.chars().count() > MAX_QUERY_CHARS {
        return invalid_request(format!(
            "query must be at most {MAX_QUERY_CHARS} characters"
        ));
    }

    let answer = state.agent.answer(&input.query).await;
    (StatusCode::OK, Json(answer)).into_response()
}

async fn flight_info(
    State(state): State<ApiState>,
    Path(flight_number): Path<String>,
) -> Response {
    let flight_number = normalize_flight_number(&flight_number);
    if flight_number.is_empty() || flight_number.chars().count() > MAX_FLIGHT_NUMBER_CHARS {
        return invalid_request(format!(
            "flight number must be between 1 and {MAX_FLIGHT_NUMBER_CHARS} characters"
        ));
    }

    match state.agent.flight_info(&flight_number).await {
        Some(record) if !record.has_error() => (StatusCode::OK, Json(record)).into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "error": "flight_not_found",
                "flight_number": flight_number
            })),
        )
            .into_response(),
    }
}

async fn api_key_middleware(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(expected) = state.api_key.as_deref() else {
        return next.run(request).await;
    };
    if is_public_endpoint(request.uri().path()) {
        return next.run(request).await;
    }

    let header_key = request
        .headers()
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if constant_time_eq(header_key.as_bytes(), expected.as_bytes()) {
        return next.run(request).await;
    }

    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": "unauthorized",
            "message": "missing or invalid x-api-key"
        })),
    )
        .into_response()
}

fn is_public_endpoint(path: &str) -> bool {
    path == "/health"
}

fn invalid_request(message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({
            "error": "invalid_request",
            "message": message
        })),
    )
        .into_response()
}

fn constant_time_eq(lhs: &[u8], rhs: &[u8]) -> bool {
    if lhs.len() != rhs.len() {
        return false;
    }
    let mut diff = 0_u8;
    for (a, b) in lhs.iter().zip(rhs.iter()) {
        diff |= a ^ b;
    }
    diff == 0
}
