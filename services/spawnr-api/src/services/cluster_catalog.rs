use std::sync::Arc;

use futures::future::join_all;
use spawnr_core::{constants::LOCAL_CLUSTER, models::ClusterDescriptor, schemas::ClusterView};
use thiserror::Error;
use tracing::{info, warn};

use crate::services::{
    descriptor_store::{DescriptorStore, StoreError},
    identity_exchange::IdentityExchange,
};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Cluster name {0} is reserved")]
    ReservedIdentity(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Cluster registration and listing over the descriptor store, with the
/// synthesized `local` entry and lazy trust-anchor healing.
pub struct ClusterCatalog {
    store: Arc<dyn DescriptorStore>,
    exchange: Arc<dyn IdentityExchange>,
    ambient_region: Option<String>,
}

impl ClusterCatalog {
    pub fn new(
        store: Arc<dyn DescriptorStore>,
        exchange: Arc<dyn IdentityExchange>,
        ambient_region: Option<String>,
    ) -> Self {
        Self {
            store,
            exchange,
            ambient_region,
        }
    }

    fn local(&self) -> ClusterView {
        ClusterView::local(self.ambient_region.as_deref())
    }

    /// Persists a new descriptor. A missing trust anchor is stored empty and
    /// healed on a later `list`.
    #[tracing::instrument(name = "cluster_catalog.register", skip_all, fields(cluster = %descriptor.cluster_identity), err)]
    pub async fn register(&self, descriptor: ClusterDescriptor) -> Result<ClusterView, CatalogError> {
        if descriptor.cluster_identity == LOCAL_CLUSTER {
            return Err(CatalogError::ReservedIdentity(descriptor.cluster_identity));
        }

        self.store.create(&descriptor).await?;
        info!(region = %descriptor.region(), "✅ Cluster registered");

        Ok(ClusterView::from(&descriptor))
    }

    /// `local` first, then every stored descriptor. Descriptors without a trust
    /// anchor are healed concurrently; a failed heal only costs that entry its anchor.
    /// A store that cannot be listed still yields the `local` entry.
    #[tracing::instrument(name = "cluster_catalog.list", skip_all)]
    pub async fn list(&self) -> Vec<ClusterView> {
        let descriptors = match self.store.list().await {
            Ok(descriptors) => descriptors,
            Err(e) => {
                warn!(error = %e, "Failed to list stored clusters, listing local only");
                Vec::new()
            }
        };
        let healed = join_all(descriptors.into_iter().map(|d| self.heal(d))).await;

        let mut views = Vec::with_capacity(healed.len() + 1);
        views.push(self.local());
        views.extend(healed.iter().map(ClusterView::from));

        views
    }

    #[tracing::instrument(name = "cluster_catalog.get", skip_all, fields(cluster = %identity), err)]
    pub async fn get(&self, identity: &str) -> Result<ClusterView, CatalogError> {
        if identity == LOCAL_CLUSTER {
            return Ok(self.local());
        }

        let descriptor = self.store.get(identity).await?;

        Ok(ClusterView::from(&descriptor))
    }

    #[tracing::instrument(name = "cluster_catalog.remove", skip_all, fields(cluster = %identity), err)]
    pub async fn remove(&self, identity: &str) -> Result<(), CatalogError> {
        if identity == LOCAL_CLUSTER {
            return Err(CatalogError::ReservedIdentity(identity.to_string()));
        }

        self.store.delete(identity).await?;
        info!("🗑️ Cluster removed");

        Ok(())
    }

    async fn heal(&self, mut descriptor: ClusterDescriptor) -> ClusterDescriptor {
        if !descriptor.needs_healing() {
            return descriptor;
        }

        let identity = descriptor.cluster_identity.clone();

        let anchor = match self
            .exchange
            .fetch_trust_anchor(&identity, &descriptor.assumable_role)
            .await
        {
            Ok(anchor) => anchor,
            Err(e) => {
                warn!(cluster = %identity, error = %e, "Failed to fetch trust anchor");
                return descriptor;
            }
        };

        if let Err(e) = self.store.store_trust_anchor(&identity, &anchor).await {
            warn!(cluster = %identity, error = %e, "Failed to persist trust anchor");
        } else {
            info!(cluster = %identity, "🩹 Trust anchor healed");
        }

        descriptor.trust_anchor = Some(anchor);
        descriptor
    }
}
