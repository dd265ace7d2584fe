use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use spawnr_core::{
    models::ClusterDescriptor,
    schemas::{
        CurrentClusterResponse, MessageResponse, RegisterClusterRequest, SwitchClusterRequest,
        SwitchClusterResponse,
    },
};
use validator::Validate;

use crate::{
    error::AppError,
    services::{cluster_catalog::ClusterCatalog, connection_registry::ConnectionRegistry},
};

#[tracing::instrument(name = "list_clusters_handler", skip_all, err)]
pub async fn list_clusters_handler(
    State(catalog): State<Arc<ClusterCatalog>>,
) -> Result<impl IntoResponse, AppError> {
    let clusters = catalog.list().await;

    Ok(Json(clusters))
}

#[tracing::instrument(name = "register_cluster_handler", skip_all, err)]
pub async fn register_cluster_handler(
    State(catalog): State<Arc<ClusterCatalog>>,
    payload: Result<Json<RegisterClusterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    catalog.register(ClusterDescriptor::from(req)).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Cluster added successfully")),
    ))
}

#[tracing::instrument(name = "switch_cluster_handler", skip_all, err)]
pub async fn switch_cluster_handler(
    State(registry): State<Arc<ConnectionRegistry>>,
    payload: Result<Json<SwitchClusterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let handle = registry.switch_to(&req.cluster_name).await?;

    Ok(Json(SwitchClusterResponse {
        message: format!("Switched to cluster {}", handle.identity()),
        server: handle.server().to_string(),
        insecure: handle.trust().is_insecure(),
    }))
}

#[tracing::instrument(name = "current_cluster_handler", skip_all)]
pub async fn current_cluster_handler(
    State(registry): State<Arc<ConnectionRegistry>>,
) -> impl IntoResponse {
    let handle = registry.current();

    Json(CurrentClusterResponse {
        cluster_name: handle.identity().to_string(),
        server: handle.server().to_string(),
        insecure: handle.trust().is_insecure(),
    })
}

#[tracing::instrument(name = "get_cluster_handler", skip_all, fields(cluster = %name), err)]
pub async fn get_cluster_handler(
    Path(name): Path<String>,
    State(catalog): State<Arc<ClusterCatalog>>,
) -> Result<impl IntoResponse, AppError> {
    let cluster = catalog.get(&name).await?;

    Ok(Json(cluster))
}

#[tracing::instrument(name = "delete_cluster_handler", skip_all, fields(cluster = %name), err)]
pub async fn delete_cluster_handler(
    Path(name): Path<String>,
    State(catalog): State<Arc<ClusterCatalog>>,
) -> Result<impl IntoResponse, AppError> {
    catalog.remove(&name).await?;

    Ok(Json(MessageResponse::new("Cluster deleted successfully")))
}
