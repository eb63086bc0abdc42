//! REST API Server for the Sam Tool
//!
//! Exposes entity search and compliance summaries via HTTP endpoints
//! consumed by the front-end

use axum::{
    extract::{Host, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::error::SamToolError;
use crate::models::{EntitySummaryDocument, ErrorResponse, SearchResponse};
use crate::query_builder::SearchRequest;
use crate::service::{SearchService, SUMMARY_PATH};

pub const SEARCH_PATH: &str = "/api/entity-information/v3/entities";

const BAD_REQUEST_MESSAGE: &str = "400 Bad Request";

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<SearchService>,
}

type ApiResult<T> = std::result::Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

fn bad_request(message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message)))
}

/// Registry outages keep their user-facing message on searches.
fn search_error(e: SamToolError) -> (StatusCode, Json<ErrorResponse>) {
    error!("Entity search failed: {}", e);
    match e {
        SamToolError::Registry(message) => bad_request(message),
        _ => bad_request(BAD_REQUEST_MESSAGE),
    }
}

fn summary_error(e: SamToolError) -> (StatusCode, Json<ErrorResponse>) {
    error!("Compliance summary failed: {}", e);
    bad_request(BAD_REQUEST_MESSAGE)
}

fn host_url(host: &str) -> String {
    format!("http://{}", host)
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Entity Search Endpoint
/// =============================

async fn search_entities(
    State(state): State<ApiState>,
    Host(host): Host,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<SearchResponse> {
    info!("Received entity search: {} parameter(s)", params.len());

    let request = SearchRequest::from_query_pairs(params);
    state
        .service
        .search(request, &host_url(&host))
        .await
        .map(Json)
        .map_err(search_error)
}

/// =============================
/// Compliance Summary Endpoint
/// =============================

async fn compliance_summary(
    State(state): State<ApiState>,
    Host(host): Host,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<EntitySummaryDocument> {
    info!("Received compliance summary request");

    let request = SearchRequest::from_query_pairs(params);
    state
        .service
        .summary(request, &host_url(&host))
        .await
        .map(Json)
        .map_err(summary_error)
}

/// =============================
/// Router
/// =============================

pub fn create_router(service: Arc<SearchService>) -> Router {
    let state = ApiState { service };

    Router::new()
        .route("/health", get(health))
        .route(SEARCH_PATH, get(search_entities))
        .route(SUMMARY_PATH, get(compliance_summary))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    service: Arc<SearchService>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(service);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
