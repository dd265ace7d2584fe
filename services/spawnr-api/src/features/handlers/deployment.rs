use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use spawnr_core::schemas::DeploymentsQuery;

use crate::{error::AppError, utilities::app_state::AppState};

#[tracing::instrument(name = "list_deployments_handler", skip_all, fields(namespace = %q.namespace()), err)]
pub async fn list_deployments_handler(
    Query(q): Query<DeploymentsQuery>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let deployments = state.resources().list_deployments(q.namespace()).await?;

    Ok(Json(deployments))
}

#[tracing::instrument(name = "get_deployment_handler", skip_all, fields(namespace = %namespace, name = %name), err)]
pub async fn get_deployment_handler(
    Path((namespace, name)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let deployment = state.resources().get_deployment(&namespace, &name).await?;

    Ok(Json(deployment))
}
