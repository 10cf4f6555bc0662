//! PABX Billing HTTP API Service.
//!
//! This crate exposes the plan-change preview used by the admin and reseller
//! dashboards:
//!
//! - Health check
//! - Preview of a single candidate plan
//! - Side-by-side comparison of several candidate plans
//!
//! The service is stateless. Plans and subscriptions are supplied by the
//! caller in the request body; the actual plan switch and its ledger entry
//! are posted by the user service, not here.
//!
//! # Authentication
//!
//! `/v1` routes require the operator API key in the `x-api-key` header.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers are async for Axum

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
