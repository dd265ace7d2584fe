use axum::{
    Router,
    http::{Method, header},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{config::Config, error::AppError, features, utilities::app_state::AppState};

pub async fn app(
    cargo_pkg_name: &'static str,
    cargo_pkg_version: &'static str,
    cfg: &Config,
) -> Result<Router, AppError> {
    let app_state = AppState::init(cfg).await?;

    Ok(router(app_state, cargo_pkg_name, cargo_pkg_version))
}

pub fn router(
    app_state: AppState,
    cargo_pkg_name: &'static str,
    cargo_pkg_version: &'static str,
) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let tracing_layer = TraceLayer::new_for_http();

    axum::Router::new()
        .merge(features::get_routes())
        .merge(features::probes::base_routes(cargo_pkg_name, cargo_pkg_version))
        .with_state(app_state)
        .layer(tracing_layer)
        .layer(cors)
}
