use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, warn};

use crate::services::client_resolver::{ClientHandle, ClientResolver, ResolutionError};

/// Holds the one client every request is routed through.
///
/// Readers take a cheap `Arc` snapshot and keep it for the whole request, so a
/// switch never affects work already in flight. Switching resolves the new
/// handle with no lock held and only takes the write lock to replace the
/// pointer; a failed resolution leaves the current handle installed.
pub struct ConnectionRegistry {
    resolver: ClientResolver,
    current: RwLock<Arc<ClientHandle>>,
}

impl ConnectionRegistry {
    pub fn new(resolver: ClientResolver, initial: ClientHandle) -> Self {
        Self {
            resolver,
            current: RwLock::new(Arc::new(initial)),
        }
    }

    /// Resolves the ambient (`local`) cluster and installs it as current.
    pub async fn init(resolver: ClientResolver) -> Result<Self, ResolutionError> {
        let initial = resolver.resolve("").await?;
        info!(server = %initial.server(), "✅ Active cluster initialised");

        Ok(Self::new(resolver, initial))
    }

    pub fn current(&self) -> Arc<ClientHandle> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Re-resolves even when `identity` is already active, which refreshes its token.
    #[tracing::instrument(name = "connection_registry.switch_to", skip_all, fields(cluster = %identity), err)]
    pub async fn switch_to(&self, identity: &str) -> Result<Arc<ClientHandle>, ResolutionError> {
        let handle = Arc::new(self.resolver.resolve(identity).await?);

        let previous = {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *current, handle.clone())
        };

        if handle.trust().is_insecure() {
            warn!(server = %handle.server(), "⚠️ Switched to a cluster without certificate verification");
        }
        info!(from = %previous.identity(), to = %handle.identity(), "🔀 Active cluster switched");

        Ok(handle)
    }
}
