//! Core library for the storefront contact pipeline: the client-side form
//! controller and the server-side relay to the email provider.

pub mod client;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod relay;
pub mod validation;

pub use client::{FormController, HttpRelayTransport, Outcome, SubmissionState, SubmitOutcome};
pub use config::{AppConfig, FailureStatus, ProviderConfig};
pub use error::{RelayError, Result};
pub use handlers::create_routes;
pub use models::{ContactSubmission, Field, FormValues, RelayResult};
pub use relay::{EmailJsProvider, EmailProvider};
pub use validation::{validate_form, FieldErrors};

use axum::{extract::DefaultBodyLimit, Router};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    pub provider: Arc<dyn EmailProvider>,
    pub provider_config: Arc<ProviderConfig>,
    pub failure_status: FailureStatus,
}

impl AppState {
    pub fn new(config: &AppConfig, provider: Arc<dyn EmailProvider>) -> Self {
        Self {
            app_name: "Contact Relay".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            provider,
            provider_config: Arc::new(config.provider.clone()),
            failure_status: config.relay.failure_status,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config, Arc::new(EmailJsProvider::new(&config.provider)))
    }
}

pub fn create_app(state: AppState) -> Router {
    create_app_with_config(state, &AppConfig::default())
}

pub fn create_app_with_config(state: AppState, config: &AppConfig) -> Router {
    create_routes()
        .layer(DefaultBodyLimit::max(config.relay.max_body_bytes))
        .layer(middleware::panic::catch_panic_layer())
        .layer(middleware::cors::cors_layer_from_config(&config.cors))
        .layer(middleware::logging::logging_layer())
        .with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
