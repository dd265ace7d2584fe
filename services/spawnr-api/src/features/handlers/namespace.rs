use axum::{Json, extract::State, response::IntoResponse};

use crate::{error::AppError, utilities::app_state::AppState};

#[tracing::instrument(name = "list_namespaces_handler", skip_all, err)]
pub async fn list_namespaces_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let namespaces = state.resources().list_namespaces().await?;

    Ok(Json(namespaces))
}
