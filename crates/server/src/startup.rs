use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use configs::AppConfig;
use migration::MigrationOutcome;
use service::subscription::repo::seaorm::SeaOrmSubscriptionRepository;
use service::subscription::SubscriptionService;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::routes::{self, ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Wire the router over an existing connection handle.
pub fn build_app(db: sea_orm::DatabaseConnection, statement_timeout: Duration) -> Router {
    let repo = SeaOrmSubscriptionRepository::new(db).with_timeout(statement_timeout);
    let state = ServerState::new(SubscriptionService::new(Arc::new(repo)));
    routes::build_router(state, build_cors())
}

/// Public entry: connect, migrate, serve until a shutdown signal, then close the pool.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let addr = cfg.server.bind_addr()?;

    let db = models::db::connect_with_config(&cfg.database).await?;

    if cfg.database.run_migrations {
        match migration::apply_pending(&db).await {
            Ok(MigrationOutcome::NoChange) => info!(event = "migrations", "schema is up to date"),
            Ok(MigrationOutcome::Applied(n)) => info!(event = "migrations", applied = n, "schema migrated"),
            Err(e) => {
                error!(event = "migrations", error = %e, "failed to apply migrations");
                let _ = db.close().await;
                return Err(e.into());
            }
        }
    } else {
        warn!(event = "migrations", "skipping migrations at startup");
    }

    let app = build_app(db.clone(), Duration::from_secs(cfg.database.statement_timeout_secs));

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            let _ = db.close().await;
            return Err(e.into());
        }
    };
    info!(%addr, "starting subscription server");

    let grace = Duration::from_secs(cfg.server.shutdown_grace_secs);
    let served = serve_until_shutdown(listener, app, grace, shutdown_signal()).await;

    match db.close().await {
        Ok(()) => info!(event = "db_closed", "database connection closed"),
        Err(e) => error!(event = "db_closed", error = %e, "failed to close database connection"),
    }
    served?;
    info!("server shutdown complete");
    Ok(())
}

/// Serve until `signal` resolves, then give in-flight requests at most `grace`.
pub async fn serve_until_shutdown<F>(
    listener: TcpListener,
    app: Router,
    grace: Duration,
    signal: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let serve = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            signal.await;
            let _ = stop_tx.send(());
        })
        .into_future();

    let drain_deadline = async move {
        match stop_rx.await {
            Ok(()) => tokio::time::sleep(grace).await,
            Err(_) => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        res = serve => res,
        _ = drain_deadline => {
            warn!(grace_secs = grace.as_secs(), "drain window elapsed, dropping open connections");
            Ok(())
        }
    }
}

/// Wait for a shutdown signal: Ctrl+C, SIGTERM or SIGQUIT.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = unix_signal(tokio::signal::unix::SignalKind::terminate(), "SIGTERM");
    #[cfg(unix)]
    let quit = unix_signal(tokio::signal::unix::SignalKind::quit(), "SIGQUIT");

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();
    #[cfg(not(unix))]
    let quit = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, starting shutdown"),
        _ = terminate => info!("received SIGTERM, starting shutdown"),
        _ = quit => info!("received SIGQUIT, starting shutdown"),
    }
}

/// The handler is installed on call, before the returned future is polled.
/// A failed install never resolves.
#[cfg(unix)]
fn unix_signal(kind: tokio::signal::unix::SignalKind, name: &'static str) -> impl Future<Output = ()> {
    let installed = tokio::signal::unix::signal(kind);
    async move {
        match installed {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(signal = name, error = %e, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    }
}
