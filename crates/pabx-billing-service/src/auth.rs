//! Authentication extractors.
//!
//! The dashboards call this service through their backend with a shared
//! operator API key. The key identifies the caller as an admin or reseller
//! console; per-user authorization is enforced upstream.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::state::AppState;

/// An operator console authenticated via API key.
#[derive(Debug, Clone)]
pub struct OperatorAuth {
    /// The console name from `x-operator-name`, or "unknown".
    pub operator: String,
}

impl FromRequestParts<Arc<AppState>> for OperatorAuth {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Self, Self::Rejection>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let api_key = parts
                .headers
                .get("x-api-key")
                .and_then(|v| v.to_str().ok())
                .ok_or(ApiError::Unauthorized)?;

            if !state.accepts_operator_key(api_key) {
                tracing::debug!("Rejected request with invalid operator key");
                return Err(ApiError::Unauthorized);
            }

            let operator = parts
                .headers
                .get("x-operator-name")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown")
                .to_string();

            Ok(OperatorAuth { operator })
        })
    }
}
