pub mod implementations;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::Api;
use spawnr_core::models::ClusterDescriptor;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Cluster {0} already exists")]
    DuplicateIdentity(String),
    #[error("Cluster {0} not found")]
    NotFound(String),
    #[error("Descriptor store failure: {0}")]
    Persistence(String),
    #[error("Cluster {identity} has a malformed descriptor: {reason}")]
    Malformed { identity: String, reason: String },
}

/// Durable home of cluster descriptors, keyed by cluster identity.
#[async_trait]
pub trait DescriptorStore: Send + Sync {
    async fn create(&self, descriptor: &ClusterDescriptor) -> Result<(), StoreError>;
    async fn get(&self, identity: &str) -> Result<ClusterDescriptor, StoreError>;
    async fn list(&self) -> Result<Vec<ClusterDescriptor>, StoreError>;
    async fn delete(&self, identity: &str) -> Result<(), StoreError>;
    /// Records healed CA material on an existing descriptor, touching nothing else.
    async fn store_trust_anchor(&self, identity: &str, trust_anchor: &[u8])
    -> Result<(), StoreError>;
}

/// Descriptors kept as labeled Secrets in the administrative namespace.
#[derive(Clone)]
pub struct SecretDescriptorStore {
    api: Api<Secret>,
}
