//! REST API and notification socket for the Bulletin announcement board
//!
//! This crate provides:
//! - Category and announcement endpoints under `/api`
//! - Admin-secret protection for every write
//! - A WebSocket at `/ws` announcing newly created announcements
//! - `/health` and `/metrics` service endpoints
//!
//! # Example
//!
//! ```rust,no_run
//! use bulletin_core::config::Config;
//!
//! # async fn start() -> bulletin_core::Result<()> {
//! let config = Config::from_env(None)?;
//! bulletin_server::run(&config).await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod error;
pub mod middleware;
pub mod notify;
pub mod repository;
pub mod routes;
pub mod state;
pub mod ws;

pub use notify::NotificationHub;
pub use repository::{MemoryRepository, Repository};
pub use routes::router;
pub use state::{AppState, ServerSettings};

use bulletin_core::config::Config;
use bulletin_core::seed::default_dataset;
use bulletin_core::{Error, Result};
use std::future::Future;
use tokio::net::TcpListener;

/// Bind the configured address and serve until Ctrl-C or SIGTERM
pub async fn run(config: &Config) -> Result<()> {
    let repo = if config.schema.storage.seed_defaults {
        MemoryRepository::with_dataset(default_dataset())
    } else {
        MemoryRepository::new()
    };
    let state = AppState::new(repo, ServerSettings::from_config(config)?);

    let address = config.schema.server.bind_address();
    let listener = TcpListener::bind(&address).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::AddrInUse {
            Error::address_in_use(config.schema.server.port)
        } else {
            Error::from(e)
        }
    })?;

    tracing::info!(
        %address,
        seeded = config.schema.storage.seed_defaults,
        "Bulletin server listening"
    );

    serve(listener, state, shutdown_signal()).await
}

/// Serve `state` on `listener` until `shutdown` resolves
///
/// Open notification sockets are closed once shutdown starts.
pub async fn serve<R, F>(listener: TcpListener, state: AppState<R>, shutdown: F) -> Result<()>
where
    R: Repository,
    F: Future<Output = ()> + Send + 'static,
{
    let hub = state.hub.clone();
    let app = router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            tracing::info!("Shutting down");
            hub.close();
        })
        .await?;

    Ok(())
}

/// Resolve on Ctrl-C or, on Unix, SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
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
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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
}
