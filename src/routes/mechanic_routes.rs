use axum::{extract::State, routing::get, Json, Router};

use crate::models::analytics::{MechanicCosts, Report, TopMechanic};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_mechanic_router() -> Router<AppState> {
    Router::new()
        .route("/top", get(top_mechanic))
        .route("/costs", get(mechanic_costs))
}

async fn top_mechanic(State(state): State<AppState>) -> Result<Json<Report<TopMechanic>>, AppError> {
    Ok(Json(state.analytics.mechanic_with_most_services().await?))
}

async fn mechanic_costs(State(state): State<AppState>) -> Result<Json<Report<MechanicCosts>>, AppError> {
    Ok(Json(state.analytics.total_cost_by_mechanic().await?))
}
