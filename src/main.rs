//! LIC Branch Site Backend
//!
//! Feedback, query, review and rating endpoints for the branch marketing site,
//! backed by SQLite.

mod aggregation;
mod api;
mod config;
mod db;
mod errors;
mod keepalive;
mod models;
mod validation;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Config, LogFormat};
use db::Repository;
use errors::AppError;
use keepalive::KeepAlive;

/// Upper bound on a single keep-alive request.
const KEEPALIVE_PING_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }

    tracing::info!("Starting LIC branch site backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    let keepalive = match &config.keepalive_url {
        Some(url) => {
            tracing::info!(
                "Keep-alive pinging {} every {}s",
                url,
                config.keepalive_interval.as_secs()
            );
            let client = reqwest::Client::builder()
                .timeout(KEEPALIVE_PING_TIMEOUT.min(config.keepalive_interval))
                .build()?;
            Some(KeepAlive::spawn(client, url.clone(), config.keepalive_interval))
        }
        None => {
            tracing::info!("Keep-alive disabled (LIC_KEEPALIVE_URL not set)");
            None
        }
    };

    // Create application state
    let state = AppState {
        repo: repo.clone(),
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(job) = keepalive {
        let pings = job.shutdown().await;
        tracing::info!("Keep-alive stopped after {} pings", pings);
    }
    repo.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Collection endpoints
    let api_routes = Router::new()
        .route("/submit-feedback", post(api::submit_feedback))
        .route("/feedbacks", get(api::list_feedbacks))
        .route("/submit-query", post(api::submit_query))
        .route("/queries", get(api::list_queries))
        .route("/reviews", get(api::list_reviews).post(api::create_review))
        .route("/ratings", get(api::list_ratings).post(api::upsert_rating));

    // Reviews page endpoints
    let review_page_routes = Router::new()
        .route("/submit-feedback", post(api::submit_contact_form))
        .route("/submit-review", post(api::submit_review))
        .route("/summary", get(api::review_summary))
        .route("/structured-data", get(api::structured_data));

    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api/lic", api_routes)
        .nest("/reviews", review_page_routes)
        .merge(health_routes)
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

async fn not_found() -> AppError {
    AppError::NotFound("No such endpoint".to_string())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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

    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests;
