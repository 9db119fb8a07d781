mod routes;
mod controllers;
mod services;
mod models;
mod api_docs;
mod shared_state;
mod config;
mod error;
mod telemetry;

use std::net::SocketAddr;
use axum::{Router, routing::get, response::Html};
use crate::routes::simulation_routes::api_routes;
use utoipa::OpenApi;
use utoipa_scalar::Scalar;
use crate::api_docs::ApiDoc;
use crate::shared_state::AppState;
use crate::config::Config;

use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

const CONFIG_ENV: &str = "SOLAR_THERMAL_CONFIG";

#[tokio::main]
async fn main() {
    // 1. Load configuration
    let config_path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| "config.json".to_string());
    let config = match Config::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load {}: {}", config_path, e);
            return;
        }
    };

    // 2. Logging
    telemetry::init_tracing(&config.logging);
    info!(path = %config_path, max_duration_steps = config.max_duration_steps, "configuration loaded");

    // 3. Shared state
    let server_port = config.server.port;
    let static_dir = config.server.static_dir.clone().unwrap_or_else(|| "static".to_string());
    let cors = if config.cors.allow_any_origin {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    };
    let state = AppState::new(config);

    // 4. Axum HTTP server
    let app = Router::new()
        .nest("/api", api_routes(state))
        .route("/scalar", get(|| async {
            Html(Scalar::new(ApiDoc::openapi()).to_html())
        }))
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], server_port));
    info!("API Server listening on http://{}", addr);
    info!("Scalar UI: http://{}/scalar", addr);

    if let Err(e) = axum_server::bind(addr)
        .serve(app.into_make_service())
        .await
    {
        error!(error = %e, "server stopped");
    }
}
