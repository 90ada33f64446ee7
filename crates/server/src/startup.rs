use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, ServerState};
use service::subscription::{repo::seaorm::SeaOrmSubscriptionRepository, SubscriptionRepository};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    let raw = cfg.server.bind_addr();
    raw.parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {raw}: {e}")))
}

/// Resolves on Ctrl+C or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => { sig.recv().await; }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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
    info!("shutdown signal received");
}

/// Public entry: connect, migrate, build the app and run the HTTP server until shutdown
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    serve(cfg, shutdown_signal()).await
}

pub async fn serve<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    // DB connection
    let db = models::db::connect_with_config(&cfg.database).await?;
    models::db::ping(&db)
        .await
        .map_err(|e| StartupError::Runtime(format!("database unreachable: {e}")))?;
    migration::Migrator::up(&db, None).await?;
    info!("database migrations applied");

    let repo: Arc<dyn SubscriptionRepository> = Arc::new(SeaOrmSubscriptionRepository::new(db));
    let app: Router = routes::build_router(ServerState::new(repo), build_cors());

    // Bind and serve
    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting subscriptions api");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!("server stopped");
    Ok(())
}
