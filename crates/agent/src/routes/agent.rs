//! Agent API handlers.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use printavo_agent_core::{AgentRequest, AgentResponse, HealthResponse};
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;

/// Answer a natural-language order query.
///
/// Agent failures still return 200 with `success: false`.
#[instrument(skip(state, payload))]
pub async fn query(
    State(state): State<AppState>,
    payload: Result<Json<AgentRequest>, JsonRejection>,
) -> Result<Json<AgentResponse>, AppError> {
    let Json(request) = payload?;

    tracing::info!(
        query_len = request.query.len(),
        exclude_completed = request.exclude_completed,
        exclude_quotes = request.exclude_quotes,
        "Processing agent query"
    );

    let outcome = state
        .agent()
        .process_query(
            &request.query,
            request.exclude_completed,
            request.exclude_quotes,
        )
        .await;

    Ok(Json(outcome.into()))
}

/// Health check. Does not call upstream services.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.environment().to_string(),
        agent: state.agent().name().to_string(),
    })
}
