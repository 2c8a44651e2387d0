//! HTTP route definitions

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    compression::CompressionLayer,
    cors::{self, CorsLayer},
    trace::TraceLayer,
};

use crate::app::AppState;
use crate::game::r#match::MatchCommand;
use crate::util::time::uptime_secs;
use crate::ws::handler::ws_handler;
use crate::ws::protocol::Team;

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    // CORS configuration - "*" allows any origin, otherwise a comma-separated
    // list of allowed origins
    let cors = if state.config.client_origin == "*" {
        CorsLayer::new()
            .allow_origin(cors::Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let allowed_origins: Vec<HeaderValue> = state
            .config
            .client_origin
            .split(',')
            .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(allowed_origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    Router::new()
        .route("/health", get(health_handler))
        .route("/map", post(change_map_handler))
        .route("/ws", get(ws_handler))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// ============================================================================
// Health endpoint
// ============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    map: Option<String>,
    phase: &'static str,
    zones: usize,
    players: usize,
    connections: usize,
    winner: Option<Team>,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = state.match_handle.status.read().clone();

    Json(HealthResponse {
        status: "ok",
        uptime_secs: uptime_secs(),
        map: status.map,
        phase: status.phase.as_str(),
        zones: status.zone_count,
        players: status.player_count,
        connections: state.connections.len(),
        winner: status.winner,
    })
}

// ============================================================================
// Map change endpoint (lifecycle hook for map rotations)
// ============================================================================

#[derive(Deserialize)]
struct ChangeMapRequest {
    map: String,
}

#[derive(Serialize)]
struct ChangeMapResponse {
    status: &'static str,
    map: String,
}

async fn change_map_handler(
    State(state): State<AppState>,
    Json(req): Json<ChangeMapRequest>,
) -> Result<Json<ChangeMapResponse>, AppError> {
    let map = req.map.trim().to_string();
    if map.is_empty() {
        return Err(AppError::BadRequest("map name must not be empty".to_string()));
    }

    state
        .match_handle
        .command_tx
        .send(MatchCommand::ChangeMap(map.clone()))
        .await
        .map_err(|_| AppError::Internal("match task is not running".to_string()))?;

    Ok(Json(ChangeMapResponse {
        status: "accepted",
        map,
    }))
}

// ============================================================================
// Error handling
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}
