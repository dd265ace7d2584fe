use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
    routing::get,
};
use serde_json::json;
use tracing::{debug, instrument};

use crate::{services::connection_registry::ConnectionRegistry, utilities::app_state::AppState};

pub fn base_routes(
    cargo_pkg_name: &'static str,
    cargo_pkg_version: &'static str,
) -> Router<AppState> {
    let name = cargo_pkg_name;
    let version = cargo_pkg_version;

    Router::new()
        .route(
            "/",
            get(move |registry| root_handler(name, version, registry)),
        )
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .fallback(not_found_handler)
}

#[instrument(name = "root_handler", skip_all)]
pub async fn root_handler(
    cargo_pkg_name: &'static str,
    cargo_pkg_version: &'static str,
    State(registry): State<Arc<ConnectionRegistry>>,
) -> impl IntoResponse {
    Json(json!({
        "service": cargo_pkg_name,
        "version": cargo_pkg_version,
        "status": "ok",
        "activeCluster": registry.current().identity(),
    }))
}

#[instrument(name = "health_handler", skip_all)]
pub async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

/// Ready once a cluster handle is installed, which holds from start-up on.
#[instrument(name = "ready_handler", skip_all)]
pub async fn ready_handler(State(registry): State<Arc<ConnectionRegistry>>) -> impl IntoResponse {
    let handle = registry.current();

    Json(json!({
        "status": "ready",
        "cluster": handle.identity(),
        "server": handle.server(),
    }))
}

#[instrument(name = "not_found_handler", skip_all, fields(method = %method, path = %uri.path()))]
pub async fn not_found_handler(method: Method, uri: Uri) -> impl IntoResponse {
    debug!("No route matched");
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("No route for {method} {}", uri.path()) })),
    )
}
