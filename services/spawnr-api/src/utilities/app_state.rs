use std::sync::Arc;

use axum::extract::FromRef;
use factory::factories::kubernetes::Kubernetes;

use crate::{
    config::Config,
    error::AppError,
    services::{
        client_resolver::{ClientResolver, ResolutionError, ResolverSettings},
        cluster_catalog::ClusterCatalog,
        connection_registry::ConnectionRegistry,
        descriptor_store::{DescriptorStore, SecretDescriptorStore},
        identity_exchange::{AwsCliExchange, IdentityExchange},
        resource_service::ResourceService,
    },
};

#[derive(FromRef, Clone)]
pub struct AppState {
    pub config: Config,
    pub registry: Arc<ConnectionRegistry>,
    pub catalog: Arc<ClusterCatalog>,
}

impl AppState {
    /// Descriptors live in the cluster the service runs in, reached with the
    /// process' own credentials regardless of which cluster is active.
    pub async fn init(cfg: &Config) -> Result<Self, AppError> {
        let admin = Kubernetes::new(cfg).await?;

        let store: Arc<dyn DescriptorStore> = Arc::new(SecretDescriptorStore::new(
            admin.client,
            &cfg.kubernetes.admin_namespace,
        ));
        let exchange: Arc<dyn IdentityExchange> =
            Arc::new(AwsCliExchange::new(&cfg.identity_exchange));

        Ok(Self::from_parts(cfg.clone(), store, exchange).await?)
    }

    pub async fn from_parts(
        config: Config,
        store: Arc<dyn DescriptorStore>,
        exchange: Arc<dyn IdentityExchange>,
    ) -> Result<Self, ResolutionError> {
        let resolver = ClientResolver::new(
            store.clone(),
            exchange.clone(),
            ResolverSettings::from(&config),
        );
        let registry = ConnectionRegistry::init(resolver).await?;
        let catalog = ClusterCatalog::new(store, exchange, config.kubernetes.ambient_region.clone());

        Ok(Self {
            config,
            registry: Arc::new(registry),
            catalog: Arc::new(catalog),
        })
    }

    /// Resource operations bound to the cluster that is active right now.
    pub fn resources(&self) -> ResourceService {
        ResourceService::new(
            self.registry.current(),
            self.config.kubernetes.request_timeout(),
        )
    }
}
