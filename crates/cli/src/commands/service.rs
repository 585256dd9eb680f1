//! Agent service commands.
//!
//! # Usage
//!
//! ```bash
//! pa-cli query "Show me recent orders" --url http://localhost:8000
//! pa-cli health
//! ```

use std::time::{Duration, Instant};

use printavo_agent_core::{AgentRequest, AgentResponse, HealthResponse};

use super::{CliError, print_json};

/// Client-side request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

fn http_client() -> Result<reqwest::Client, CliError> {
    Ok(reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

/// Join a base URL and a path without doubling slashes.
fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

/// Decode a JSON body. Error statuses are accepted when the body is still
/// the expected shape (the service wraps rejected requests in the envelope).
async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, CliError> {
    let status = response.status();
    let body = response.text().await?;
    match serde_json::from_str(&body) {
        Ok(value) => Ok(value),
        Err(_) if !status.is_success() => Err(CliError::Status {
            status: status.as_u16(),
            body,
        }),
        Err(e) => Err(e.into()),
    }
}

/// POST a query to `/api/agent` and print the envelope.
pub async fn query(
    base_url: &str,
    text: &str,
    exclude_completed: bool,
    exclude_quotes: bool,
) -> Result<(), CliError> {
    let request = AgentRequest {
        query: text.to_string(),
        exclude_completed,
        exclude_quotes,
    };

    tracing::info!(
        url = %base_url,
        exclude_completed,
        exclude_quotes,
        "Sending query"
    );

    let started = Instant::now();
    let response = http_client()?
        .post(endpoint(base_url, "/api/agent"))
        .json(&request)
        .send()
        .await?;
    let envelope: AgentResponse = read_json(response).await?;
    let round_trip = started.elapsed().as_secs_f64();

    print_json(&envelope)?;
    tracing::info!(
        success = envelope.success,
        round_trip_seconds = round_trip,
        "Query finished"
    );
    Ok(())
}

/// GET `/api/health` and print the result.
pub async fn health(base_url: &str) -> Result<(), CliError> {
    let response = http_client()?
        .get(endpoint(base_url, "/api/health"))
        .send()
        .await?;
    let health: HealthResponse = read_json(response).await?;

    print_json(&health)
}
