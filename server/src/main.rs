//! Summit Server - Conference management API.
//!
//! This server exposes HTTP endpoints for organizing conferences and
//! sessions, registering attendance, and querying the catalog using the
//! summit-engine filter compiler and registration state machine.

mod auth;
mod cache;
mod config;
mod db;
mod error;
mod handlers;
mod routes;
mod tasks;

use crate::cache::Cache;
use crate::config::Config;
use crate::db::Pool;
use crate::tasks::TaskQueue;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: Pool,
    pub config: Arc<Config>,
    pub cache: Cache,
    pub tasks: TaskQueue,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "summit_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!("Starting Summit Server on {}:{}", config.host, config.port);

    // Create database pool
    let pool = db::create_pool(&config).await?;

    // Run migrations
    tracing::info!("Running database migrations...");
    db::run_migrations(&pool).await?;

    // Build application state and the deferred task worker
    let cache = Cache::new();
    let (tasks, task_rx) = TaskQueue::new();
    tasks::spawn_worker(task_rx, pool.clone(), cache.clone());

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        cache,
        tasks,
    };

    // Build router
    let app = Router::new()
        .merge(routes::create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
