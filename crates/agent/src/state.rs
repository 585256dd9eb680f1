//! Application state shared across handlers.

use std::sync::Arc;

use crate::agent::OrderAgent;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Everything inside is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    agent: OrderAgent,
    environment: String,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `agent` - The order agent answering queries
    /// * `environment` - Deployment environment reported by the health check
    #[must_use]
    pub fn new(agent: OrderAgent, environment: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                agent,
                environment: environment.into(),
            }),
        }
    }

    /// Get the order agent.
    #[must_use]
    pub fn agent(&self) -> &OrderAgent {
        &self.inner.agent
    }

    /// Get the deployment environment name.
    #[must_use]
    pub fn environment(&self) -> &str {
        &self.inner.environment
    }
}
