//! Rutas de analytics sobre los registros de servicio
//!
//! Cada endpoint devuelve el `Report` tal cual: `status`, `summary` y `data`.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::models::analytics::{
    AverageCost, DueSoon, Overdue, RecentService, Report, ServiceCount, ServiceTypeFrequency, TopOwner,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

#[derive(Debug, Default, Deserialize)]
pub struct DueSoonQuery {
    pub days: Option<u32>,
}

pub fn create_analytics_router() -> Router<AppState> {
    Router::new()
        .route("/total", get(total_services))
        .route("/average_cost", get(average_cost))
        .route("/most_frequent_service", get(most_frequent_service))
        .route("/most_recent", get(most_recent_service))
        .route("/due_soon", get(due_soon))
        .route("/overdue", get(overdue))
        .route("/top_owner", get(top_owner))
}

async fn total_services(State(state): State<AppState>) -> Result<Json<Report<ServiceCount>>, AppError> {
    Ok(Json(state.analytics.total_count().await?))
}

async fn average_cost(State(state): State<AppState>) -> Result<Json<Report<AverageCost>>, AppError> {
    Ok(Json(state.analytics.average_cost().await?))
}

async fn most_frequent_service(
    State(state): State<AppState>,
) -> Result<Json<Report<ServiceTypeFrequency>>, AppError> {
    Ok(Json(state.analytics.most_frequent_service_type().await?))
}

async fn most_recent_service(State(state): State<AppState>) -> Result<Json<Report<RecentService>>, AppError> {
    Ok(Json(state.analytics.most_recent_service().await?))
}

async fn due_soon(
    State(state): State<AppState>,
    Query(query): Query<DueSoonQuery>,
) -> Result<Json<Report<DueSoon>>, AppError> {
    Ok(Json(state.analytics.vehicles_due_soon(query.days).await?))
}

async fn overdue(State(state): State<AppState>) -> Result<Json<Report<Overdue>>, AppError> {
    Ok(Json(state.analytics.overdue_services().await?))
}

async fn top_owner(State(state): State<AppState>) -> Result<Json<Report<TopOwner>>, AppError> {
    Ok(Json(state.analytics.owner_with_most_services().await?))
}
