//! PABX Billing Service - plan-change previews for the admin dashboards
//!
//! This is the main entry point for the pabx-billing service.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pabx_billing_service::{create_router, AppState, ServiceConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pabx_billing=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting PABX Billing Service");

    let config = ServiceConfig::from_env();

    tracing::info!(
        listen_addr = %config.listen_addr,
        operator_key_configured = %config.operator_api_key.is_some(),
        cors_origins = ?config.cors_origins,
        max_body_bytes = config.max_body_bytes,
        request_timeout_seconds = config.request_timeout_seconds,
        "Service configuration loaded"
    );

    let state = AppState::new(config.clone());
    let app = create_router(state);

    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
