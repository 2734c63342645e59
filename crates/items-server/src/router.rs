use axum::http::HeaderValue;
use axum::routing::{get, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler;
use crate::state::AppState;

/// Build the axum router with all item endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handler::root_handler))
        .route("/health", get(handler::health_handler))
        .route("/api/items", get(handler::list_items).post(handler::create_item))
        .route(
            "/api/items/:id",
            put(handler::update_item).delete(handler::delete_item),
        )
        .with_state(state)
}

/// The router wrapped in CORS and request tracing, as served.
pub fn build_app(state: AppState, config: &ServerConfig) -> ServerResult<Router> {
    Ok(build_router(state)
        .layer(cors_layer(config.cors_allow_origin.as_deref())?)
        .layer(TraceLayer::new_for_http()))
}

/// Any origin when `origin` is `None`, otherwise exactly that origin.
pub fn cors_layer(origin: Option<&str>) -> ServerResult<CorsLayer> {
    let Some(origin) = origin else {
        return Ok(CorsLayer::permissive());
    };
    let origin = HeaderValue::from_str(origin)
        .map_err(|e| ServerError::Config(format!("invalid CORS origin {origin:?}: {e}")))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any))
}
