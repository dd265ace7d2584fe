pub mod implementations;

use std::{sync::Arc, time::Duration};

use spawnr_core::error::JobTemplateError;
use thiserror::Error;

use crate::services::client_resolver::ClientHandle;

#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),
    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },
    #[error(transparent)]
    MissingPodTemplate(#[from] JobTemplateError),
}

/// Deployment, job and namespace operations against exactly one cluster: the
/// handle captured when the request started.
pub struct ResourceService {
    handle: Arc<ClientHandle>,
    timeout: Duration,
}
