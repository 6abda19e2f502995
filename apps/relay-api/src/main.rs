//! # RisingHorn Relay API
//!
//! Serves `POST /api/contact` and `GET /api/health`.
//!
//! ## Environment
//! ```text
//! RESEND_API_KEY, RESEND_FROM      required
//! RELAY_PORT                       default 3000
//! RESEND_API_URL                   default https://api.resend.com/emails
//! CONTACT_EMAIL_INFO|ORDERS|SALES  default *@risinghorn.com
//! RELAY_ALLOWED_ORIGIN             optional CORS origin
//! RUST_LOG                         default relay_api=info,tower_http=info
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use relay_api::{app, config::RelayConfig, mailer::ResendMailer, AppState};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relay_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting RisingHorn relay...");

    let config = RelayConfig::load()?;
    info!(
        port = config.port,
        provider = %config.resend_api_url,
        cors = config.allowed_origin.as_deref().unwrap_or("(same origin)"),
        "Configuration loaded"
    );

    let mailer = ResendMailer::new(config.resend_api_url.clone(), config.resend_api_key.clone())?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState {
        config: Arc::new(config),
        mailer: Arc::new(mailer),
    };

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
