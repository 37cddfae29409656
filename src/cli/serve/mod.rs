//! `serve`: the CMS web server
//!
//! Sessions are stored in the application database so logins survive a
//! restart. Expired session rows are purged in the background while the
//! server runs.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use crate::api::create_router_with_state;
use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::storage::{open_session_store, spawn_expired_session_cleanup};

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    init_logging(&config.logging);

    let addr = listen_addr(&config)?;
    let cleanup_interval = config.session.cleanup_interval();
    let state = crate::create_app_state(config);

    let session_store = open_session_store(&state.storage).await?;
    let cleanup = spawn_expired_session_cleanup(session_store.clone(), cleanup_interval);

    let app = create_router_with_state(state, session_store);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "CMS listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    cleanup.abort();
    served?;

    info!("CMS stopped");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix
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
        _ = ctrl_c => info!("Ctrl+C received, draining requests"),
        _ = terminate => info!("SIGTERM received, draining requests"),
    }
}

fn listen_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    let ip: std::net::IpAddr = config.server.host.parse()?;
    Ok(SocketAddr::new(ip, config.server.port))
}
