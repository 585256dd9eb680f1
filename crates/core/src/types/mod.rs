//! Core types for the Printavo agent.
//!
//! This module provides the canonical record shapes every adapter path
//! converges on, plus the request/response envelopes of the HTTP API.

pub mod api;
pub mod order;
pub mod usage;

pub use api::{AgentRequest, AgentResponse, AgentResponseData, HealthResponse};
pub use order::{Customer, Order, Status};
pub use usage::TokenUsage;
