//! Printavo agent service.
//!
//! Serves the agent API (default port 8000).
//!
//! # Architecture
//!
//! - Axum web framework
//! - Printavo GraphQL API for order data (read-only)
//! - `OpenAI` Chat Completions with function calling for the agent
//! - No database: every answer is built from live API calls

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use printavo_agent::agent::OrderAgent;
use printavo_agent::config::AgentServiceConfig;
use printavo_agent::llm::{OpenAiClient, ToolLoopRuntime};
use printavo_agent::printavo::PrintavoClient;
use printavo_agent::state::AppState;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &AgentServiceConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let environment = config
        .sentry_environment
        .clone()
        .unwrap_or_else(|| config.environment().to_string());

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some(std::borrow::Cow::Owned(environment)),
            attach_stacktrace: true,
            // Queries may name customers
            send_default_pii: false,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Initialize tracing with `EnvFilter` and Sentry integration.
///
/// Defaults to info level for our crate if `RUST_LOG` is not set.
fn init_tracing(debug: bool, json: bool) {
    let default_filter = if debug {
        "printavo_agent=debug,tower_http=debug"
    } else {
        "printavo_agent=info,tower_http=info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = match AgentServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(false, false);
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);
    init_tracing(config.debug, config.log_json);

    tracing::info!(
        model = %config.openai.model,
        printavo_endpoint = %config.printavo.graphql_endpoint(),
        environment = config.environment(),
        "Configuration loaded"
    );

    let printavo = PrintavoClient::new(&config.printavo);
    let runtime = ToolLoopRuntime::new(OpenAiClient::new(&config.openai));
    let agent = OrderAgent::new(&config.openai.model, Arc::new(runtime), Arc::new(printavo));
    let state = AppState::new(agent, config.environment());

    let app = printavo_agent::app(state);

    // Start server
    let addr = config.socket_addr();
    tracing::info!("agent listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
