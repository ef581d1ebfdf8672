use axum::extract::State;
use axum::{http::Method, response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber;

mod catalog;
mod config;
mod dtos;
mod errors;
mod handlers;
mod models;
mod routes;
mod services;
mod state;

use catalog::load_catalog;
use config::AppConfig;
use state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = AppConfig::from_env();
    let app_state = initialize_app_state(config);

    let app = build_router(app_state.clone());
    start_server(app, &app_state).await;
}

fn initialize_app_state(config: AppConfig) -> AppState {
    // Missing data files are the one hard failure: without a catalog the
    // engine cannot answer anything.
    let (catalog, stats) = match load_catalog(&config.data_dir) {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!("❌ Failed to load catalog from {}: {e:#}", config.data_dir.display());
            std::process::exit(1);
        }
    };

    tracing::info!(
        "✅ Catalog loaded: {} games, {} packages, {} offers ({} rows skipped)",
        stats.games,
        stats.packages,
        stats.offers,
        stats.skipped_rows
    );
    if stats.skipped_rows > 0 {
        tracing::warn!("⚠️ {} invalid rows were skipped during import", stats.skipped_rows);
    }

    AppState::new(catalog, config)
}

fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .allow_credentials(false);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .nest("/api/teams", routes::teams::routes())
        .nest("/api/games", routes::games::routes())
        .nest("/api/packages", routes::packages::routes())
        .nest("/api/admin", routes::admin::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

async fn start_server(app: Router, app_state: &AppState) {
    let addr = SocketAddr::new(
        app_state
            .config
            .host
            .parse()
            .unwrap_or_else(|_| [0, 0, 0, 0].into()),
        app_state.config.port,
    );

    tracing::info!("🚀 Server starting on {}", addr);

    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            axum::serve(listener, app).await.unwrap();
        }
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    }
}

async fn root_handler() -> &'static str {
    "📺 Streaming Package Comparison API"
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let stats = state.catalog().stats();
    Json(json!({
        "status": "healthy",
        "catalog": stats,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
