//! Portcullis Session API
//!
//! Issues, revokes and checks cookie sessions backed by an external identity
//! provider. See the library docs for the endpoint list.

use std::net::SocketAddr;
use std::sync::Arc;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use portcullis_auth_core::{AuthService, JwksIdentityProvider};
use session_api::config::Config;
use session_api::state::AppState;
use tokio::signal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::from_default_env()
                .add_directive("session_api=debug".parse()?)
                .add_directive("portcullis_auth_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Portcullis Session API");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        http_port = config.http_port,
        issuer = %config.auth.issuer,
        cookie_name = %config.auth.cookie_name,
        session_ttl_secs = config.auth.session_ttl.as_secs(),
        "Configuration loaded"
    );

    // Initialize metrics
    let metrics_handle = if config.metrics_enabled {
        Some(setup_metrics()?)
    } else {
        None
    };

    // Identity provider and session service
    let provider = Arc::new(JwksIdentityProvider::new(config.auth.clone()));
    let auth = AuthService::new(config.auth.clone(), provider)?;

    let state = AppState::new(auth, config.clone());
    let app = session_api::build_router(state, metrics_handle);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    tracing::info!("HTTP server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn setup_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    metrics::describe_counter!(
        "portcullis_sessions_issued_total",
        "Total session cookies issued"
    );
    metrics::describe_counter!(
        "portcullis_guard_resolutions_total",
        "Session resolutions by status and invalid reason"
    );
    metrics::describe_counter!(
        "portcullis_upstream_revocation_failures_total",
        "Upstream revocations that failed while the local session was still cleared"
    );

    Ok(handle)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
