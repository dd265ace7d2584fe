use std::{path::PathBuf, time::Duration};

use factory::factories::kubernetes::{error::KubernetesError, implementation::KubernetesConfig};
use spawnr_core::error::JobTemplateError;

use crate::{
    config::Config,
    error::AppError,
    services::{
        client_resolver::{ResolutionError, ResolverSettings},
        cluster_catalog::CatalogError,
        descriptor_store::StoreError,
        identity_exchange::ExchangeError,
        resource_service::ResourceError,
    },
};

// -------------------------------------------------------------------------------
// ---------------------------- Error implementations ----------------------------
// -------------------------------------------------------------------------------

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateIdentity(_) => AppError::Conflict(e.to_string()),
            StoreError::NotFound(_) => AppError::NotFoundError(e.to_string()),
            StoreError::Persistence(_) | StoreError::Malformed { .. } => {
                AppError::InternalServerError(e.to_string())
            }
        }
    }
}

impl From<ExchangeError> for AppError {
    fn from(e: ExchangeError) -> Self {
        match e {
            ExchangeError::Timeout { .. } => AppError::GatewayTimeout(e.to_string()),
            _ => AppError::BadGateway(e.to_string()),
        }
    }
}

impl From<ResolutionError> for AppError {
    fn from(e: ResolutionError) -> Self {
        match e {
            ResolutionError::UnknownCluster(_) => AppError::NotFoundError(e.to_string()),
            ResolutionError::TokenExchangeFailed {
                source: ExchangeError::Timeout { .. },
                ..
            } => AppError::GatewayTimeout(e.to_string()),
            ResolutionError::TokenExchangeFailed { .. } => AppError::BadGateway(e.to_string()),
            ResolutionError::Store(e) => AppError::from(e),
            ResolutionError::NoLocalCredentials(_) | ResolutionError::ClientBuildFailed { .. } => {
                AppError::InternalServerError(e.to_string())
            }
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::ReservedIdentity(_) => AppError::BadRequest(e.to_string()),
            CatalogError::Store(e) => AppError::from(e),
        }
    }
}

impl From<JobTemplateError> for AppError {
    fn from(e: JobTemplateError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

impl From<kube::Error> for AppError {
    fn from(e: kube::Error) -> Self {
        match e {
            kube::Error::Api(ae) => AppError::KubeApi {
                code: ae.code,
                message: ae.message,
            },
            e => AppError::InternalServerError(e.to_string()),
        }
    }
}

impl From<ResourceError> for AppError {
    fn from(e: ResourceError) -> Self {
        match e {
            ResourceError::Kube(e) => AppError::from(e),
            ResourceError::Timeout { .. } => AppError::GatewayTimeout(e.to_string()),
            ResourceError::MissingPodTemplate(e) => AppError::from(e),
        }
    }
}

impl From<KubernetesError> for AppError {
    fn from(e: KubernetesError) -> Self {
        AppError::InternalServerError(e.to_string())
    }
}

// -------------------------------------------------------------------------------
// --------------------------- Factory implementations ---------------------------
// -------------------------------------------------------------------------------

impl KubernetesConfig for Config {
    fn k8s_config_path(&self) -> Option<PathBuf> {
        self.kubernetes.kubeconfig.clone()
    }

    fn k8s_connect_timeout(&self) -> Duration {
        self.kubernetes.connect_timeout()
    }
}

impl From<&Config> for ResolverSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            kubeconfig: cfg.kubernetes.kubeconfig.clone(),
            connect_timeout: cfg.kubernetes.connect_timeout(),
        }
    }
}
