//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `OPENAI_API_KEY` - Language-model provider API key
//! - `PRINTAVO_EMAIL` - Printavo account email (sent as the `email` header)
//! - `PRINTAVO_TOKEN` - Printavo API token (sent as the `token` header)
//!
//! ## Optional
//! - `OPENAI_MODEL` - Model ID (default: gpt-4o)
//! - `OPENAI_BASE_URL` - Provider API base URL (default: <https://api.openai.com/v1>)
//! - `PRINTAVO_API_URL` - Printavo API base URL (default: <https://www.printavo.com/api/v2>)
//! - `HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 8000)
//! - `DEBUG` - `true` enables development mode and debug logging (default: false)
//! - `LOG_FORMAT` - `json` for JSON log lines, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment (default: derived from `DEBUG`)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_PRINTAVO_API_URL: &str = "https://www.printavo.com/api/v2";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: &str = "8000";

/// Required variables, in the order they are reported when missing.
const REQUIRED_VARS: [&str; 3] = ["OPENAI_API_KEY", "PRINTAVO_EMAIL", "PRINTAVO_TOKEN"];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingEnvVars(Vec<String>),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Agent service configuration.
#[derive(Debug, Clone)]
pub struct AgentServiceConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Development mode (verbose logging, `"development"` environment)
    pub debug: bool,
    /// Emit JSON log lines instead of text
    pub log_json: bool,
    /// Printavo GraphQL API configuration
    pub printavo: PrintavoConfig,
    /// Language-model provider configuration
    pub openai: OpenAIConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment override
    pub sentry_environment: Option<String>,
}

/// Printavo API configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct PrintavoConfig {
    /// API base URL (the GraphQL endpoint is `<api_url>/graphql`)
    pub api_url: Url,
    /// Account email
    pub email: String,
    /// API token
    pub token: SecretString,
}

impl std::fmt::Debug for PrintavoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrintavoConfig")
            .field("api_url", &self.api_url.as_str())
            .field("email", &self.email)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl PrintavoConfig {
    /// Load only the Printavo settings from the environment.
    ///
    /// Used by tools that talk to Printavo without running the agent.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the email or token is missing, or the API
    /// URL is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the Printavo settings through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the email or token is missing, or the API
    /// URL is invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let missing: Vec<String> = ["PRINTAVO_EMAIL", "PRINTAVO_TOKEN"]
            .into_iter()
            .filter(|key| get(*key).is_none())
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingEnvVars(missing));
        }

        Ok(Self {
            api_url: parse_url(
                "PRINTAVO_API_URL",
                get("PRINTAVO_API_URL").as_deref(),
                DEFAULT_PRINTAVO_API_URL,
            )?,
            email: get("PRINTAVO_EMAIL").unwrap_or_default(),
            token: SecretString::from(get("PRINTAVO_TOKEN").unwrap_or_default()),
        })
    }

    /// The GraphQL endpoint derived from the base URL.
    #[must_use]
    pub fn graphql_endpoint(&self) -> String {
        format!("{}/graphql", self.api_url.as_str().trim_end_matches('/'))
    }
}

/// `OpenAI` API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct OpenAIConfig {
    /// `OpenAI` API key
    pub api_key: SecretString,
    /// Model ID (e.g., gpt-4o)
    pub model: String,
    /// API base URL
    pub base_url: Url,
}

impl std::fmt::Debug for OpenAIConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl OpenAIConfig {
    /// The chat completions endpoint derived from the base URL.
    #[must_use]
    pub fn chat_completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.base_url.as_str().trim_end_matches('/')
        )
    }
}

impl AgentServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or any value
    /// fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVars` naming every missing required
    /// variable, or `ConfigError::InvalidEnvVar` for the first value that
    /// fails to parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let missing: Vec<String> = REQUIRED_VARS
            .iter()
            .copied()
            .filter(|key| get(*key).is_none())
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingEnvVars(missing));
        }

        let host = get("HOST")
            .unwrap_or_else(|| DEFAULT_HOST.to_string())
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HOST".to_string(), e.to_string()))?;
        let port = get("PORT")
            .unwrap_or_else(|| DEFAULT_PORT.to_string())
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;
        let debug = get("DEBUG").is_some_and(|v| v.eq_ignore_ascii_case("true"));
        let log_json = get("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json"));

        let printavo = PrintavoConfig::from_lookup(&lookup)?;

        let openai = OpenAIConfig {
            api_key: SecretString::from(get("OPENAI_API_KEY").unwrap_or_default()),
            model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            base_url: parse_url(
                "OPENAI_BASE_URL",
                get("OPENAI_BASE_URL").as_deref(),
                DEFAULT_OPENAI_BASE_URL,
            )?,
        };

        Ok(Self {
            host,
            port,
            debug,
            log_json,
            printavo,
            openai,
            sentry_dsn: get("SENTRY_DSN"),
            sentry_environment: get("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Deployment environment name reported by the health endpoint.
    #[must_use]
    pub const fn environment(&self) -> &'static str {
        if self.debug {
            "development"
        } else {
            "production"
        }
    }
}

/// Parse a URL variable, falling back to a default when unset.
fn parse_url(key: &str, value: Option<&str>, default: &str) -> Result<Url, ConfigError> {
    Url::parse(value.unwrap_or(default))
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
