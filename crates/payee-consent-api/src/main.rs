//! # payee-consent-api: Binary Entry Point
//!
//! Starts the Axum HTTP server for the payee consent broker.
//! Binds to configurable port (default 8080).

use std::sync::Arc;

use payee_consent_api::state::{AppConfig, AppState};
use payee_consent_client::{BrokerClient, ClientConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Configuration error: {e}");
        e
    })?;
    let port = config.port;

    let client_config = ClientConfig::from_env().map_err(|e| {
        tracing::error!("Collaborator configuration error: {e}");
        e
    })?;
    tracing::info!(
        token_service = %client_config.token_service_url,
        privacy_service = %client_config.privacy_service_url,
        "collaborators configured"
    );
    let (oauth, privacy) = BrokerClient::new(client_config)?.into_parts();

    let state = AppState::new(config, Arc::new(oauth), Arc::new(privacy)).map_err(|e| {
        tracing::error!("Consent token signer rejected: {e}");
        e
    })?;

    let app = payee_consent_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Payee consent broker listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
