//! Rutas de la superficie de herramientas del agente conversacional

use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::agent::TOOL_NAMES;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, AppError};

pub fn create_agent_router() -> Router<AppState> {
    Router::new()
        .route("/tools", get(list_tools))
        .route("/tools/:name", post(invoke_tool))
}

async fn list_tools() -> Json<Value> {
    Json(json!({ "tools": TOOL_NAMES }))
}

// Cuerpo vacío equivale a `{}`
async fn invoke_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let args = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| bad_request_error(&format!("Invalid JSON arguments: {}", e)))?
    };

    Ok(Json(state.tools.invoke(&name, args).await?))
}
