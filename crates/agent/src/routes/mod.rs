//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /            - Welcome document
//! POST /api/agent   - Answer a natural-language order query
//! GET  /api/health  - Health check
//! ```

pub mod agent;

use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::Serialize;

use crate::state::AppState;

/// Body of `GET /`.
#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    message: &'static str,
    documentation: &'static str,
    health: &'static str,
}

/// Build all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .nest("/api", api_routes())
}

/// Create the `/api` routes router.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/agent", post(agent::query))
        .route("/health", get(agent::health))
}

async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the Printavo Agent Service",
        documentation: "/api/agent",
        health: "/api/health",
    })
}
