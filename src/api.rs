//! HTTP facade over the two tools.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::tools::{CreateMarketTool, SearchEventsTool};

pub struct AppState {
    pub search_events: SearchEventsTool,
    pub create_market: CreateMarketTool,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub keyword: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub events: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMarketRequest {
    pub title: String,
    pub description: String,
    pub end_time: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateMarketResponse {
    pub tx: String,
}

/// Any tool failure becomes a 500.
pub struct ApiError(anyhow::Error);

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("request failed: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/search-events", post(search_events))
        .route("/create-market", post(create_market))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn search_events(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let events = state.search_events.search(&req.keyword).await?;
    Ok(Json(SearchResponse { events }))
}

async fn create_market(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateMarketRequest>,
) -> Result<Json<CreateMarketResponse>, ApiError> {
    let tx = state
        .create_market
        .create_market(&req.title, &req.description, req.end_time)
        .await?;
    Ok(Json(CreateMarketResponse { tx }))
}
