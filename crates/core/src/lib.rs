//! Printavo Agent Core - Shared types library.
//!
//! This crate provides the types shared by every Printavo agent component:
//! - `agent` - HTTP service, Printavo adapter and agent orchestrator
//! - `cli` - Smoke-test command-line client
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no model
//! access. This keeps it lightweight and usable by both the server and clients.
//!
//! # Modules
//!
//! - [`types`] - Canonical order records, token usage, and API envelopes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
