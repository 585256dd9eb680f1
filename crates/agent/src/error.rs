//! HTTP-facing error handling.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
};
use printavo_agent_core::AgentResponse;
use thiserror::Error;

/// Application-level error type for the agent API.
///
/// Agent failures are not errors at this level (they are successful HTTP
/// responses with `success: false`); only malformed requests end up here.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request body could not be read as an agent request.
    #[error("Invalid request body: {}", .0.body_text())]
    InvalidBody(#[from] JsonRejection),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidBody(rejection) => rejection.status(),
        };

        tracing::warn!(error = %self, status = status.as_u16(), "Rejected request");

        (status, Json(AgentResponse::failure(self.to_string()))).into_response()
    }
}
