//! Rutas HTTP
//!
//! Este módulo monta todos los routers sobre el estado compartido.

pub mod agent_routes;
pub mod analytics_routes;
pub mod event_routes;
pub mod mechanic_routes;
pub mod service_log_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_middleware;
use crate::state::AppState;

/// Crear el router principal de la aplicación
pub fn create_app_router(state: AppState) -> Router {
    let cors = cors_middleware(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health_check))
        .nest("/vehicle_service_logs", service_log_routes::create_service_log_router())
        .nest("/agent", agent_routes::create_agent_router())
        .nest("/events", event_routes::create_event_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check simple
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
