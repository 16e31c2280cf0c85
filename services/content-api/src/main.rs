//! Cleanclip Content API server

use std::net::SocketAddr;
use std::sync::Arc;

use cleanclip_auth_core::{CachingIdentityProvider, HostedIdentityProvider};
use cleanclip_types::SystemClock;
use tokio::signal;

use content_api::config::Config;
use content_api::state::AppState;
use content_api::{build_router, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    telemetry::init_tracing()?;
    tracing::info!("Starting Cleanclip Content API");

    let config = Config::from_env()?;
    tracing::info!(
        http_port = config.http_port,
        run_migrations = config.run_migrations,
        "Configuration loaded"
    );

    let metrics_handle = if config.metrics_enabled {
        Some(telemetry::setup_metrics()?)
    } else {
        None
    };

    let pool = cleanclip_db::create_pool_with_options(&config.database_url, &config.db).await?;
    tracing::info!("Database pool created");

    if config.run_migrations {
        cleanclip_db::migrate(&pool).await?;
        tracing::info!("Schema applied");
    }

    let identity = Arc::new(CachingIdentityProvider::new(
        Arc::new(HostedIdentityProvider::new(config.auth.clone())),
        &config.auth,
    ));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let state = AppState::new(pool, identity, Arc::new(SystemClock), config);
    let app = build_router(state, metrics_handle);

    tracing::info!("HTTP server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = ?e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = ?e, "Failed to install SIGTERM handler");
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
