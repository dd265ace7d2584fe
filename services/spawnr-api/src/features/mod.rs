pub mod handlers;
pub mod probes;
pub mod see;

use crate::utilities::app_state::AppState;

use axum::{
    Router,
    routing::{get, post},
};

pub fn get_routes() -> Router<AppState> {
    Router::new()
        // Clusters
        .route(
            "/api/clusters",
            get(handlers::cluster::list_clusters_handler)
                .post(handlers::cluster::register_cluster_handler),
        )
        .route(
            "/api/clusters/switch",
            post(handlers::cluster::switch_cluster_handler),
        )
        .route(
            "/api/clusters/current",
            get(handlers::cluster::current_cluster_handler),
        )
        .route(
            "/api/clusters/{name}",
            get(handlers::cluster::get_cluster_handler)
                .delete(handlers::cluster::delete_cluster_handler),
        )
        // Namespaces & deployments
        .route(
            "/api/namespaces",
            get(handlers::namespace::list_namespaces_handler),
        )
        .route(
            "/api/deployments",
            get(handlers::deployment::list_deployments_handler),
        )
        .route(
            "/api/deployments/{namespace}/{name}",
            get(handlers::deployment::get_deployment_handler),
        )
        // Jobs
        .route(
            "/api/jobs",
            get(handlers::job::list_jobs_handler).post(handlers::job::create_job_handler),
        )
        .route(
            "/api/jobs/{namespace}/{name}",
            get(handlers::job::get_job_handler).delete(handlers::job::delete_job_handler),
        )
        .route(
            "/api/jobs/{namespace}/{name}/logs",
            get(handlers::job::job_logs_handler),
        )
        .route(
            "/api/jobs/{namespace}/{name}/watch",
            get(see::watch_job_handler),
        )
}
