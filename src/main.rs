use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use clinicbot::config::AppConfig;
use clinicbot::db::{self, SqliteStore};
use clinicbot::handlers;
use clinicbot::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;
    tracing::info!(database = %config.database_url, clinic = %config.clinic.name, "database ready");

    let state = Arc::new(AppState {
        store: Box::new(SqliteStore::new(conn)),
        config: config.clone(),
        conversations: Mutex::new(HashMap::new()),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/chat", post(handlers::chat::send_message))
        .route("/api/chat/:session_id/history", get(handlers::chat::history))
        .route("/api/chat/:session_id/reset", post(handlers::chat::reset))
        .route("/api/services", get(handlers::clinic::list_services))
        .route("/api/doctors", get(handlers::clinic::list_doctors))
        .route("/api/status", get(handlers::clinic::get_status))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
