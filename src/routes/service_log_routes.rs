use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::dto::service_log_dto::{DeleteConfirmation, ListLogsQuery, ServiceLogInput};
use crate::dto::ApiResponse;
use crate::models::VehicleServiceLog;
use crate::routes::{analytics_routes, mechanic_routes};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_service_log_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_log).get(list_logs))
        .route("/:id", get(get_log).put(update_log).delete(delete_log))
        .nest("/analytics", analytics_routes::create_analytics_router())
        .nest("/api/mechanics", mechanic_routes::create_mechanic_router())
}

async fn create_log(
    State(state): State<AppState>,
    Json(input): Json<ServiceLogInput>,
) -> Result<(StatusCode, Json<ApiResponse<VehicleServiceLog>>), AppError> {
    let log = state.service_logs.create_log(input).await?;
    let message = format!("Vehicle service log {} created successfully", log.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(log, message)),
    ))
}

async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<ListLogsQuery>,
) -> Result<Json<Vec<VehicleServiceLog>>, AppError> {
    let logs = state.service_logs.list_logs(query.vehicle_id.as_deref()).await?;
    Ok(Json(logs))
}

async fn get_log(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VehicleServiceLog>, AppError> {
    Ok(Json(state.service_logs.get_log(&id).await?))
}

async fn update_log(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ServiceLogInput>,
) -> Result<Json<ApiResponse<VehicleServiceLog>>, AppError> {
    let log = state.service_logs.update_log(&id, input).await?;
    Ok(Json(ApiResponse::success_with_message(
        log,
        format!("Vehicle service log {} updated successfully", id),
    )))
}

async fn delete_log(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteConfirmation>, AppError> {
    Ok(Json(state.service_logs.delete_log(&id).await?))
}
