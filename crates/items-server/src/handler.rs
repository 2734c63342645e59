use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use items_store::{Collection, Item};
use serde_json::{json, Value};

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Plain-text banner at the root path.
pub async fn root_handler() -> &'static str {
    "Welcome to the items server!"
}

/// Health check handler.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `GET /api/items`
pub async fn list_items(State(state): State<AppState>) -> ServerResult<Json<Collection>> {
    Ok(Json(state.store().list().await?))
}

/// `POST /api/items`
pub async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<Item>)> {
    let candidate = json_body(payload)?;
    let _guard = state.write_guard().await;
    let item = state.store().create(candidate).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// `PUT /api/items/:id`
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ServerResult<Json<Item>> {
    let patch = json_body(payload)?;
    let _guard = state.write_guard().await;
    Ok(Json(state.store().update(&id, patch).await?))
}

/// `DELETE /api/items/:id`
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<StatusCode> {
    let _guard = state.write_guard().await;
    state.store().remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn json_body(payload: Result<Json<Value>, JsonRejection>) -> ServerResult<Value> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ServerError::BadRequest(rejection.body_text()))
}
