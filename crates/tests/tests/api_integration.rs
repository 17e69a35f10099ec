use std::collections::HashMap;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use flightdesk_api::build_app;
use flightdesk_core::AppConfig;
use serde_json::{json, Value};
use tower::ServiceExt;

const RAPIDAPI_KEY: &str = "test-rapidapi-key";

#[derive(Clone)]
struct Upstream {
    llm_online: bool,
    flights: Arc<HashMap<String, (StatusCode, Value)>>,
}

impl Upstream {
    fn new(llm_online: bool) -> Self {
        Self {
            llm_online,
            flights: Arc::new(HashMap::new()),
        }
    }

    fn with_flight(mut self, flight_number: &str, status: StatusCode, body: Value) -> Self {
        Arc::make_mut(&mut self.flights).insert(flight_number.to_string(), (status, body));
        self
    }
}

async fn fake_completion(State(upstream): State<Upstream>, Json(body): Json<Value>) -> Response {
    if !upstream.llm_online {
        return (StatusCode::SERVICE_UNAVAILABLE, "model overloaded").into_response();
    }

    let system = body["messages"][0]["content"].as_str().unwrap_or_default();
    let user = body["messages"][1]["content"].as_str().unwrap_or_default();

    let content = if system.contains("extraction assistant") {
        fake_extract(user).unwrap_or_else(|| "NONE".to_string())
    } else {
        let record = user
            .split_once("flight data: ")
            .and_then(|(_, data)| serde_json::from_str::<Value>(data).ok())
            .unwrap_or_default();
        format!(
            "{} is currently {}.",
            record["flight_number"].as_str().unwrap_or("?"),
            record["status"].as_str().unwrap_or("?")
        )
    };

    Json(json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    }))
    .into_response()
}

/// Accepts airline-style tokens with one to four digits, which is looser
/// than the offline pattern.
fn fake_extract(text: &str) -> Option<String> {
    text.split(|ch: char| !ch.is_ascii_alphanumeric())
        .find(|word| {
            word.len() >= 3
                && word.len() <= 6
                && word[..2].chars().all(|ch| ch.is_ascii_alphabetic())
                && word[2..].chars().all(|ch| ch.is_ascii_digit())
        })
        .map(|word| word.to_uppercase())
}

async fn fake_flight(
    State(upstream): State<Upstream>,
    Path(flight_number): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if headers.get("x-rapidapi-key").and_then(|v| v.to_str().ok()) != Some(RAPIDAPI_KEY) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "bad key" }))).into_response();
    }
    if params.get("withAircraftImage").map(String::as_str) != Some("false")
        || params.get("withLocation").map(String::as_str) != Some("false")
    {
        return (StatusCode::BAD_REQUEST, "enrichment flags missing").into_response();
    }

    match upstream.flights.get(&flight_number) {
        Some((status, body)) => (*status, Json(body.clone())).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "message": "not found" }))).into_response(),
    }
}

async fn spawn_upstream(upstream: Upstream) -> String {
    let router = Router::new()
        .route("/chat/completions", post(fake_completion))
        .route("/flights/number/:flight_number", get(fake_flight))
        .with_state(upstream);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn app_for(upstream: Upstream, api_key: Option<&str>) -> Router {
    let base_url = spawn_upstream(upstream).await;
    let vars = HashMap::from([
        ("GROQ_API_KEY", "gsk_test".to_string()),
        ("GROQ_BASE_URL", base_url.clone()),
        ("AERODATA_API_KEY", RAPIDAPI_KEY.to_string()),
        ("AERODATA_BASE_URL", base_url),
        ("FLIGHTDESK_HTTP_TIMEOUT_SECONDS", "5".to_string()),
    ]);
    let config = AppConfig::from_lookup(|key| vars.get(key).cloned()).expect("config should load");
    build_app(&config, api_key.map(ToString::to_string)).expect("app should build")
}

fn live_flight() -> Value {
    json!([{
        "status": "Departed",
        "departure": {
            "airport": { "name": "London Heathrow" },
            "scheduledTime": { "utc": "2025-03-01 10:05Z", "local": "2025-03-01 10:05+00:00" }
        },
        "arrival": { "airport": { "name": "New York John F Kennedy" } },
        "aircraft": { "model": "Boeing 777-200" }
    }])
}

async fn ask(app: Router, query: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/v1/answer")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "query": query }).to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn health_is_public() {
    let app = app_for(Upstream::new(true), Some("desk-key")).await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn answer_requires_api_key_when_configured() {
    let app = app_for(Upstream::new(true), Some("desk-key")).await;

    let request = Request::builder()
        .method("POST")
        .uri("/v1/answer")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "query": "status of DL47" }).to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key("x-request-id"));

    let request = Request::builder()
        .method("POST")
        .uri("/v1/answer")
        .header("content-type", "application/json")
        .header("x-api-key", "desk-key")
        .body(Body::from(json!({ "query": "status of BA456" }).to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn live_data_is_phrased_by_the_model() {
    let upstream = Upstream::new(true).with_flight("DL47", StatusCode::OK, live_flight());
    let app = app_for(upstream, None).await;

    let (status, body) = ask(app, "Has flight dl47 left yet?").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "answer": "DL47 is currently Departed." }));
}

#[tokio::test]
async fn model_outage_uses_pattern_and_template() {
    let upstream = Upstream::new(false).with_flight("EK101", StatusCode::OK, live_flight());
    let app = app_for(upstream, None).await;

    let (_, body) = ask(app, "Has flight EK101 left yet?").await;
    assert_eq!(
        body["answer"],
        "Flight EK101 departs at 2025-03-01 10:05 from London Heathrow to New York John F Kennedy. Current status: Departed."
    );
}

#[tokio::test]
async fn flight_api_outage_uses_builtin_table() {
    let upstream = Upstream::new(true).with_flight(
        "BA456",
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "message": "upstream exploded" }),
    );
    let app = app_for(upstream, None).await;

    let (_, body) = ask(app, "is BA456 on time").await;
    assert_eq!(body["answer"], "BA456 is currently On Time.");
}

#[tokio::test]
async fn model_and_flight_api_failures_fall_back_together() {
    let app = app_for(Upstream::new(false), None).await;

    let (_, body) = ask(app, "Flight EI525 status please").await;
    assert_eq!(
        body["answer"],
        "Flight EI525 departs at 10:30 AM to Dublin. Current status: On Time."
    );
}

#[tokio::test]
async fn empty_live_response_is_not_found() {
    let upstream = Upstream::new(true).with_flight("AI123", StatusCode::OK, json!([]));
    let app = app_for(upstream, None).await;

    let (_, body) = ask(app, "what about AI123").await;
    assert_eq!(body, json!({ "answer": "Flight AI123 not found in database." }));
}

#[tokio::test]
async fn unknown_flight_is_not_found() {
    let app = app_for(Upstream::new(true), None).await;

    let (_, body) = ask(app, "where is ZZ999").await;
    assert_eq!(body, json!({ "answer": "Flight ZZ999 not found in database." }));
}

#[tokio::test]
async fn query_without_flight_number_gets_apology() {
    let app = app_for(Upstream::new(true), None).await;

    let (_, body) = ask(app, "when does my plane leave?").await;
    assert_eq!(
        body,
        json!({ "answer": "Sorry, I couldn't identify a flight number in your query." })
    );
}

#[tokio::test]
async fn blank_query_gets_apology() {
    let app = app_for(Upstream::new(true), None).await;

    let (status, body) = ask(app, "   ").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "answer": "Sorry, I couldn't identify a flight number in your query." })
    );
}

#[tokio::test]
async fn oversized_query_is_rejected() {
    let app = app_for(Upstream::new(true), None).await;

    let (status, body) = ask(app, &"a".repeat(2_001)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_request");
}

#[tokio::test]
async fn flight_endpoint_returns_record_or_404() {
    let upstream = Upstream::new(true).with_flight("DL47", StatusCode::OK, live_flight());
    let app = app_for(upstream, None).await;

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/v1/flights/dl47").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let record: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(record["flight_number"], "DL47");
    assert_eq!(record["aircraft"], "Boeing 777-200");

    let response = app
        .oneshot(Request::builder().uri("/v1/flights/ZZ999").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn repeated_questions_get_identical_answers() {
    let upstream = Upstream::new(true).with_flight("DL47", StatusCode::OK, live_flight());
    let app = app_for(upstream, None).await;

    let (_, first) = ask(app.clone(), "status of DL47").await;
    let (_, second) = ask(app, "status of DL47").await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn escaped_flight_number_stays_in_one_path_segment() {
    let upstream = Upstream::new(true).with_flight("DL47?X#", StatusCode::OK, live_flight());
    let app = app_for(upstream, None).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/flights/dl47%3Fx%23")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let record: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(record["flight_number"], "DL47?X#");
}
