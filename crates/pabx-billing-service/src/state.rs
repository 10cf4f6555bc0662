//! Application state.

use crate::config::ServiceConfig;

/// Application state shared across handlers.
///
/// Read-only after startup; handlers share it through an `Arc`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServiceConfig) -> Self {
        if config.operator_api_key.is_some() {
            tracing::info!("Operator API key configured");
        }
        Self { config }
    }

    /// Check whether a presented key matches the configured operator key.
    #[must_use]
    pub fn accepts_operator_key(&self, presented: &str) -> bool {
        self.config
            .operator_api_key
            .as_deref()
            .is_some_and(|expected| constant_time_eq(expected.as_bytes(), presented.as_bytes()))
    }
}

/// Compare two byte strings without short-circuiting on the first mismatch.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
