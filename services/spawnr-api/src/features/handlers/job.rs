use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use spawnr_core::schemas::{CreateJobRequest, LogsResponse, MessageResponse};
use validator::Validate;

use crate::{error::AppError, utilities::app_state::AppState};

#[tracing::instrument(name = "list_jobs_handler", skip_all, err)]
pub async fn list_jobs_handler(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let jobs = state.resources().list_managed_jobs().await?;

    Ok(Json(jobs))
}

#[tracing::instrument(name = "create_job_handler", skip_all, err)]
pub async fn create_job_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateJobRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let job = state.resources().create_job(&req).await?;

    Ok((StatusCode::CREATED, Json(job)))
}

#[tracing::instrument(name = "get_job_handler", skip_all, fields(namespace = %namespace, name = %name), err)]
pub async fn get_job_handler(
    Path((namespace, name)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let job = state.resources().get_job(&namespace, &name).await?;

    Ok(Json(job))
}

#[tracing::instrument(name = "delete_job_handler", skip_all, fields(namespace = %namespace, name = %name), err)]
pub async fn delete_job_handler(
    Path((namespace, name)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    state.resources().delete_job(&namespace, &name).await?;

    Ok(Json(MessageResponse::new("Job deleted successfully")))
}

#[tracing::instrument(name = "job_logs_handler", skip_all, fields(namespace = %namespace, name = %name), err)]
pub async fn job_logs_handler(
    Path((namespace, name)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let logs = state.resources().job_logs(&namespace, &name).await?;

    Ok(Json(LogsResponse { logs }))
}
