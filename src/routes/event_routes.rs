use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use crate::dto::ApiResponse;
use crate::services::RegisteredUser;
use crate::state::AppState;

pub fn create_event_router() -> Router<AppState> {
    Router::new().route("/user_registered", post(user_registered))
}

// La entrega del webhook no bloquea la respuesta
async fn user_registered(
    State(state): State<AppState>,
    Json(user): Json<RegisteredUser>,
) -> (StatusCode, Json<ApiResponse<RegisteredUser>>) {
    log::info!("👤 Usuario registrado: {}", user.email);

    let message = if state.webhooks.is_configured() {
        "User registration webhook scheduled"
    } else {
        "Webhook not configured; notification skipped"
    };
    state.webhooks.notify_user_registered(user.clone());

    (
        StatusCode::ACCEPTED,
        Json(ApiResponse::success_with_message(user, message)),
    )
}
