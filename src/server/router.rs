use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use factlens_core_types::{FactCheckRequest, FactCheckResponse};
use factlens_orchestrator::FactCheckError;

use super::state::ServeState;

pub fn build_relay_router(state: ServeState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/fact-check", post(fact_check_handler))
        .layer(cors_layer())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

async fn health_handler(State(state): State<ServeState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "busy": state.orchestrator.is_busy(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn fact_check_handler(
    State(state): State<ServeState>,
    Json(request): Json<FactCheckRequest>,
) -> (StatusCode, Json<FactCheckResponse>) {
    info!(chars = request.text.chars().count(), "relay fact-check request");
    match state.orchestrator.check_text(&request.text, None).await {
        Ok(result) => (StatusCode::OK, Json(FactCheckResponse::ok(result))),
        Err(err @ FactCheckError::ConcurrentSessionRejected) => {
            warn!("relay request rejected, session in progress");
            (StatusCode::CONFLICT, Json(FactCheckResponse::failed(err.to_string())))
        }
        Err(err) => (StatusCode::OK, Json(FactCheckResponse::failed(err.to_string()))),
    }
}
