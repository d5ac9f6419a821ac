//! HTTP surface for the veterinary clinic records.
//!
//! Resource handlers live under `/api` and are never gated. Everything else
//! passes through [`session::session_gate`], which redirects anonymous
//! visitors away from the protected prefixes (by default `/dashboard`).

use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    middleware,
    routing::get,
    Router,
};
use tokio::{
    net::TcpListener,
    signal::{self, ctrl_c},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

pub mod config;
pub mod error;
pub mod gateway;
pub mod routes;
pub mod session;
pub mod state;

use config::ClinicConfig;
use state::AppState;

/// Install the global subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second call (tests, embedding) keeps the first subscriber.
    let _ = fmt().with_env_filter(filter).try_init();
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .nest("/api", routes::api_router())
        .route("/healthz", get(|| async { "ok" }))
        .route("/dashboard", get(routes::dashboard))
        .layer(middleware::from_fn_with_state(state.clone(), session::session_gate))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn start_server(config: ClinicConfig) -> std::io::Result<()> {
    info!(?config, "Initializing state...");
    let state = AppState::new(&config);

    // Open eagerly so a bad path shows up at startup; requests retry anyway.
    if let Err(e) = state.gateway.acquire().await {
        warn!(error = %e, "Database not ready at startup");
    }

    let address = config.server.address();
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "Failed to install signal handler");
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
}
