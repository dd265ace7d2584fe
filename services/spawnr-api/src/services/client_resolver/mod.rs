pub mod implementations;

use std::{path::PathBuf, sync::Arc, time::Duration};

use factory::factories::kubernetes::error::KubernetesError;
use kube::Client;
use spawnr_core::{constants::LOCAL_CLUSTER, models::TrustPolicy};
use thiserror::Error;

use crate::services::{
    descriptor_store::{DescriptorStore, StoreError},
    identity_exchange::{ExchangeError, IdentityExchange},
};

/// An authenticated client bound to one cluster. Never mutated after it is built.
pub struct ClientHandle {
    identity: String,
    server: String,
    trust: TrustPolicy,
    client: Client,
}

impl ClientHandle {
    pub fn new(
        identity: impl Into<String>,
        server: impl Into<String>,
        trust: TrustPolicy,
        client: Client,
    ) -> Self {
        Self {
            identity: identity.into(),
            server: server.into(),
            trust,
            client,
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn trust(&self) -> TrustPolicy {
        self.trust
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn is_local(&self) -> bool {
        self.identity == LOCAL_CLUSTER
    }
}

impl std::fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientHandle")
            .field("identity", &self.identity)
            .field("server", &self.server)
            .field("trust", &self.trust)
            .finish_non_exhaustive()
    }
}

#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("No local cluster credentials available: {0}")]
    NoLocalCredentials(#[source] KubernetesError),
    #[error("Cluster {0} not found")]
    UnknownCluster(String),
    #[error("Token exchange for cluster {identity} failed: {source}")]
    TokenExchangeFailed {
        identity: String,
        #[source]
        source: ExchangeError,
    },
    #[error("Failed to build client for cluster {identity}: {reason}")]
    ClientBuildFailed { identity: String, reason: String },
    #[error(transparent)]
    Store(StoreError),
}

#[derive(Clone, Debug)]
pub struct ResolverSettings {
    /// Kubeconfig for the `local` cluster outside a pod; `~/.kube/config` when unset.
    pub kubeconfig: Option<PathBuf>,
    pub connect_timeout: Duration,
}

/// Turns a cluster identity into a freshly authenticated [`ClientHandle`].
/// Holds no per-cluster state.
#[derive(Clone)]
pub struct ClientResolver {
    store: Arc<dyn DescriptorStore>,
    exchange: Arc<dyn IdentityExchange>,
    settings: ResolverSettings,
}
