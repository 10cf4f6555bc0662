//! Common test utilities for pabx-billing integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use axum::Router;
use axum_test::TestServer;

use pabx_billing_service::{create_router, AppState, ServiceConfig};

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// The operator API key accepted by the server.
    pub operator_api_key: String,
}

impl TestHarness {
    /// Create a new test harness with an operator key configured.
    pub fn new() -> Self {
        let operator_api_key = "test-operator-key".to_string();

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            operator_api_key: Some(operator_api_key.clone()),
            cors_origins: vec!["*".into()],
            max_body_bytes: 64 * 1024,
            request_timeout_seconds: 30,
        };

        Self::with_config(config, operator_api_key)
    }

    /// Create a harness whose server has no operator key configured.
    pub fn without_operator_key() -> Self {
        Self::with_config(ServiceConfig::default(), String::new())
    }

    fn with_config(config: ServiceConfig, operator_api_key: String) -> Self {
        let state = AppState::new(config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            operator_api_key,
        }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
