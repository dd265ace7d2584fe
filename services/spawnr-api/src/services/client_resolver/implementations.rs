use std::{path::PathBuf, sync::Arc, time::Duration};

use base64::{Engine, engine::general_purpose::STANDARD};
use factory::factories::kubernetes::implementation::{KubernetesConfig, ambient_config};
use kube::{Client, Config};
use secrecy::SecretString;
use spawnr_core::{
    constants::LOCAL_CLUSTER,
    models::{ClusterDescriptor, TrustPolicy},
};
use tracing::{info, warn};

use crate::services::{
    client_resolver::{ClientHandle, ClientResolver, ResolutionError, ResolverSettings},
    descriptor_store::{DescriptorStore, StoreError},
    identity_exchange::IdentityExchange,
};

const PEM_MARKER: &str = "-----BEGIN";

impl KubernetesConfig for ResolverSettings {
    fn k8s_config_path(&self) -> Option<PathBuf> {
        self.kubeconfig.clone()
    }

    fn k8s_connect_timeout(&self) -> Duration {
        self.connect_timeout
    }
}

/// Decodes a trust anchor into DER certificates. Accepts PEM text, base64 of
/// PEM (what the identity provider returns) and base64 of DER.
pub fn decode_trust_anchor(anchor: &[u8]) -> Result<Vec<Vec<u8>>, String> {
    let text = String::from_utf8_lossy(anchor);
    let trimmed = text.trim();

    let decoded = if trimmed.starts_with(PEM_MARKER) {
        trimmed.as_bytes().to_vec()
    } else {
        let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
        STANDARD
            .decode(compact)
            .map_err(|e| format!("trust anchor is neither PEM nor base64: {e}"))?
    };

    if !decoded.starts_with(PEM_MARKER.as_bytes()) {
        return Ok(vec![decoded]);
    }

    let certs = rustls_pemfile::certs(&mut decoded.as_slice())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("trust anchor PEM is invalid: {e}"))?;

    if certs.is_empty() {
        return Err("trust anchor PEM contains no certificates".to_string());
    }

    Ok(certs.into_iter().map(|cert| cert.as_ref().to_vec()).collect())
}

/// Client configuration for a remote cluster. Without a trust anchor the
/// server certificate is not verified.
pub fn remote_config(
    descriptor: &ClusterDescriptor,
    token: SecretString,
    connect_timeout: Duration,
) -> Result<(Config, TrustPolicy), String> {
    let cluster_url: http::Uri = descriptor
        .endpoint
        .parse()
        .map_err(|e| format!("invalid endpoint {}: {e}", descriptor.endpoint))?;

    let mut config = Config::new(cluster_url);
    config.auth_info.token = Some(token);
    config.connect_timeout = Some(connect_timeout);

    let trust = match descriptor.trust_anchor.as_deref().filter(|a| !a.is_empty()) {
        Some(anchor) => {
            config.root_cert = Some(decode_trust_anchor(anchor)?);
            TrustPolicy::Verified
        }
        None => {
            config.accept_invalid_certs = true;
            TrustPolicy::SkipVerification
        }
    };

    Ok((config, trust))
}

impl ClientResolver {
    pub fn new(
        store: Arc<dyn DescriptorStore>,
        exchange: Arc<dyn IdentityExchange>,
        settings: ResolverSettings,
    ) -> Self {
        Self {
            store,
            exchange,
            settings,
        }
    }

    /// Resolves `identity` (`""` or `local` meaning the ambient credentials).
    /// Nothing is cached: every call exchanges a fresh token.
    #[tracing::instrument(name = "client_resolver.resolve", skip_all, fields(cluster = %identity), err)]
    pub async fn resolve(&self, identity: &str) -> Result<ClientHandle, ResolutionError> {
        if identity.is_empty() || identity == LOCAL_CLUSTER {
            return self.resolve_local().await;
        }

        let mut descriptor = self.store.get(identity).await.map_err(|e| match e {
            StoreError::NotFound(_) => ResolutionError::UnknownCluster(identity.to_string()),
            e => ResolutionError::Store(e),
        })?;

        if !descriptor.has_trust_anchor() {
            self.heal_trust_anchor(&mut descriptor).await;
        }

        let token = self
            .exchange
            .exchange_token(&descriptor.cluster_identity, &descriptor.assumable_role)
            .await
            .map_err(|source| ResolutionError::TokenExchangeFailed {
                identity: identity.to_string(),
                source,
            })?;

        let build_failed = |reason: String| ResolutionError::ClientBuildFailed {
            identity: identity.to_string(),
            reason,
        };

        let (config, trust) =
            remote_config(&descriptor, token, self.settings.connect_timeout).map_err(build_failed)?;

        if trust.is_insecure() {
            warn!(server = %descriptor.endpoint, "⚠️ No trust anchor, server certificate will not be verified");
        }

        let client = Client::try_from(config).map_err(|e| build_failed(e.to_string()))?;

        info!(server = %descriptor.endpoint, %trust, "✅ Cluster client resolved");

        Ok(ClientHandle::new(identity, descriptor.endpoint, trust, client))
    }

    async fn resolve_local(&self) -> Result<ClientHandle, ResolutionError> {
        let config = ambient_config(&self.settings)
            .await
            .map_err(ResolutionError::NoLocalCredentials)?;

        let server = config.cluster_url.to_string();
        let trust = if config.accept_invalid_certs {
            TrustPolicy::SkipVerification
        } else {
            TrustPolicy::Verified
        };

        let client = Client::try_from(config).map_err(|e| ResolutionError::ClientBuildFailed {
            identity: LOCAL_CLUSTER.to_string(),
            reason: e.to_string(),
        })?;

        Ok(ClientHandle::new(LOCAL_CLUSTER, server, trust, client))
    }

    /// Best effort: a failed fetch or a failed write leaves the resolution going.
    async fn heal_trust_anchor(&self, descriptor: &mut ClusterDescriptor) {
        let identity = descriptor.cluster_identity.as_str();

        match self
            .exchange
            .fetch_trust_anchor(identity, &descriptor.assumable_role)
            .await
        {
            Ok(anchor) => {
                if let Err(e) = self.store.store_trust_anchor(identity, &anchor).await {
                    warn!(error = %e, "Failed to persist fetched trust anchor");
                }
                descriptor.trust_anchor = Some(anchor);
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch trust anchor, continuing without it");
            }
        }
    }
}
