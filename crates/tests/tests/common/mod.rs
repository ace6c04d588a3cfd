#![allow(dead_code)]

use std::collections::HashMap;
use std::time::Duration;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use yatra_gateway::{GatewayConfig, RequestGateway};

/// Serves a stand-in for the travel backend on an ephemeral port and returns
/// its base URL.
pub async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/", get(health))
        .route("/plan-trip", post(plan_trip))
        .route("/travel-guide", post(travel_guide))
        .route("/itinerary", get(itinerary))
        .route("/stay-options", get(server_error))
        .route("/local-conveyance", get(empty_body))
        .route("/nearby-attractions", get(slow))
        .route("/markets", get(malformed))
        .route("/food-restaurants", get(missing_payload))
        .route("/things-to-do", get(rejected))
        .route("/quick-info/:category", get(quick_info))
        .route("/destinations/popular", get(popular))
        .route("/weather/:location", get(weather))
        .route("/budget-estimate/:location", get(budget_estimate));

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub backend");
    let addr = listener.local_addr().expect("stub backend address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub backend serves");
    });

    format!("http://{addr}")
}

pub fn gateway_for(base_url: &str) -> RequestGateway {
    RequestGateway::new(&GatewayConfig::default().with_base_url(base_url))
        .expect("gateway builds")
}

/// A local address with nothing listening on it.
pub async fn dead_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe listener");
    let addr = listener.local_addr().expect("probe address");
    drop(listener);
    format!("http://{addr}")
}

async fn health() -> Json<Value> {
    Json(json!({
        "message": "Travel Recommendation API is running!",
        "version": "2.0.0",
        "status": "healthy",
        "timestamp": "2025-01-01T00:00:00"
    }))
}

async fn plan_trip(Json(body): Json<Value>) -> Json<Value> {
    let field = |key: &str| body[key].as_str().unwrap_or("-").to_string();
    let text = format!(
        "## Trip to {}\n**From {}**\n* Mode: {}\n* Dates: {}\nDay 1: Arrive after {} days of planning\nBudget: ₹5000 ({})",
        field("location"),
        field("origin"),
        field("preferred_mode"),
        field("travel_dates"),
        body["days"],
        field("budget"),
    );

    Json(json!({ "success": true, "response": text }))
}

async fn travel_guide(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "success": true,
        "location": body["location"],
        "days": body["days"],
        "data": {
            "itinerary": "Day 1: Ghats at dawn",
            "food": "* Kachori Sabzi",
            "metadata": { "budget": body["budget"] }
        }
    }))
}

async fn itinerary(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let location = query.get("location").cloned().unwrap_or_default();
    let days = query.get("days").cloned().unwrap_or_default();
    Json(json!({
        "success": true,
        "response": format!("## {days}-day itinerary for {location}\nDay 1: Fort walk")
    }))
}

async fn server_error() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

async fn empty_body() -> StatusCode {
    StatusCode::OK
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({ "success": true, "response": "too late" }))
}

async fn malformed() -> impl IntoResponse {
    ([("content-type", "application/json")], "{not json")
}

async fn missing_payload() -> Json<Value> {
    Json(json!({ "success": true }))
}

async fn rejected() -> Json<Value> {
    Json(json!({ "success": false, "response": "", "error": "quota exhausted" }))
}

async fn quick_info(
    Path(category): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if category == "shopping" {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "detail": "model overloaded" })),
        )
            .into_response();
    }

    let location = query.get("location").cloned().unwrap_or_default();
    let budget = query.get("budget").cloned().unwrap_or_default();
    Json(json!({
        "success": true,
        "response": format!("## {category} in {location}\n* tier {budget}")
    }))
    .into_response()
}

async fn popular() -> Json<Value> {
    Json(json!({ "success": true, "response": "* Goa\n* Manali\n* Varanasi" }))
}

async fn weather(Path(location): Path<String>) -> Json<Value> {
    Json(json!({ "success": true, "response": format!("Weather in {location}: 31°C") }))
}

async fn budget_estimate(
    Path(location): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let days = query.get("days").cloned().unwrap_or_default();
    let travelers = query.get("travelers").cloned().unwrap_or_default();
    Json(json!({
        "success": true,
        "response": format!("Budget for {location}: {travelers} travelers x {days} days")
    }))
}
