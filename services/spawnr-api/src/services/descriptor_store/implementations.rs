use std::collections::BTreeMap;

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use k8s_openapi::{
    ByteString, api::core::v1::Secret, apimachinery::pkg::apis::meta::v1::ObjectMeta,
};
use kube::{
    Api, Client,
    api::{DeleteParams, ListParams, Patch, PatchParams, PostParams},
};
use serde_json::json;
use spawnr_core::{
    constants::{CLUSTER_DESCRIPTOR_LABEL, CLUSTER_DESCRIPTOR_SELECTOR},
    models::ClusterDescriptor,
};
use tracing::{debug, info, warn};

use crate::services::descriptor_store::{DescriptorStore, SecretDescriptorStore, StoreError};

// ---- Secret data keys ----
const KEY_CLUSTER_NAME: &str = "cluster-name";
const KEY_FRIENDLY_NAME: &str = "friendly-name";
const KEY_ROLE_ARN: &str = "role-arn";
const KEY_ENDPOINT: &str = "endpoint";
const KEY_TRUST_ANCHOR: &str = "certificate-authority-data";
const KEY_REGION: &str = "region";

impl SecretDescriptorStore {
    pub fn new(client: Client, namespace: &str) -> Self {
        Self {
            api: Api::namespaced(client, namespace),
        }
    }
}

fn map_kube_error(identity: &str, e: kube::Error) -> StoreError {
    match e {
        kube::Error::Api(ae) if ae.code == 409 => StoreError::DuplicateIdentity(identity.to_string()),
        kube::Error::Api(ae) if ae.code == 404 => StoreError::NotFound(identity.to_string()),
        e => StoreError::Persistence(e.to_string()),
    }
}

pub fn is_descriptor(secret: &Secret) -> bool {
    secret
        .metadata
        .labels
        .as_ref()
        .and_then(|labels| labels.get(CLUSTER_DESCRIPTOR_LABEL))
        .is_some_and(|value| value == "true")
}

pub fn descriptor_to_secret(descriptor: &ClusterDescriptor) -> Secret {
    let mut data = BTreeMap::from([
        (KEY_CLUSTER_NAME.to_string(), ByteString(descriptor.cluster_identity.clone().into_bytes())),
        (KEY_FRIENDLY_NAME.to_string(), ByteString(descriptor.friendly_name.clone().into_bytes())),
        (KEY_ROLE_ARN.to_string(), ByteString(descriptor.assumable_role.clone().into_bytes())),
        (KEY_ENDPOINT.to_string(), ByteString(descriptor.endpoint.clone().into_bytes())),
    ]);

    if let Some(anchor) = descriptor.trust_anchor.as_ref().filter(|a| !a.is_empty()) {
        data.insert(KEY_TRUST_ANCHOR.to_string(), ByteString(anchor.clone()));
    }

    if let Some(region) = descriptor.region.as_ref().filter(|r| !r.is_empty()) {
        data.insert(KEY_REGION.to_string(), ByteString(region.clone().into_bytes()));
    }

    Secret {
        metadata: ObjectMeta {
            name: Some(descriptor.cluster_identity.clone()),
            labels: Some(BTreeMap::from([(
                CLUSTER_DESCRIPTOR_LABEL.to_string(),
                "true".to_string(),
            )])),
            ..Default::default()
        },
        type_: Some("Opaque".to_string()),
        data: Some(data),
        ..Default::default()
    }
}

pub fn secret_to_descriptor(secret: &Secret) -> Result<ClusterDescriptor, StoreError> {
    let identity = secret.metadata.name.clone().unwrap_or_default();
    let empty = BTreeMap::new();
    let data = secret.data.as_ref().unwrap_or(&empty);

    let text = |key: &str| -> Result<Option<String>, StoreError> {
        data.get(key)
            .map(|value| {
                String::from_utf8(value.0.clone()).map_err(|_| StoreError::Malformed {
                    identity: identity.clone(),
                    reason: format!("{key} is not valid UTF-8"),
                })
            })
            .transpose()
    };

    let endpoint = text(KEY_ENDPOINT)?.ok_or_else(|| StoreError::Malformed {
        identity: identity.clone(),
        reason: format!("missing {KEY_ENDPOINT}"),
    })?;

    Ok(ClusterDescriptor {
        cluster_identity: text(KEY_CLUSTER_NAME)?.unwrap_or_else(|| identity.clone()),
        friendly_name: text(KEY_FRIENDLY_NAME)?.unwrap_or_else(|| identity.clone()),
        endpoint,
        assumable_role: text(KEY_ROLE_ARN)?.unwrap_or_default(),
        trust_anchor: data
            .get(KEY_TRUST_ANCHOR)
            .map(|value| value.0.clone())
            .filter(|anchor| !anchor.is_empty()),
        region: text(KEY_REGION)?.filter(|r| !r.is_empty()),
    })
}

/// Decodes every descriptor Secret, skipping the ones that cannot be read.
pub fn secrets_to_descriptors(secrets: &[Secret]) -> Vec<ClusterDescriptor> {
    secrets
        .iter()
        .filter_map(|secret| match secret_to_descriptor(secret) {
            Ok(descriptor) => Some(descriptor),
            Err(e) => {
                warn!(error = %e, "Skipping malformed cluster descriptor");
                None
            }
        })
        .collect()
}

#[async_trait]
impl DescriptorStore for SecretDescriptorStore {
    #[tracing::instrument(name = "descriptor_store.create", skip_all, fields(cluster = %descriptor.cluster_identity), err)]
    async fn create(&self, descriptor: &ClusterDescriptor) -> Result<(), StoreError> {
        let secret = descriptor_to_secret(descriptor);

        self.api
            .create(&PostParams::default(), &secret)
            .await
            .map_err(|e| map_kube_error(&descriptor.cluster_identity, e))?;

        info!("✅ Cluster descriptor stored");
        Ok(())
    }

    #[tracing::instrument(name = "descriptor_store.get", skip_all, fields(cluster = %identity), err)]
    async fn get(&self, identity: &str) -> Result<ClusterDescriptor, StoreError> {
        let secret = self
            .api
            .get(identity)
            .await
            .map_err(|e| map_kube_error(identity, e))?;

        if !is_descriptor(&secret) {
            debug!("Secret exists but is not a cluster descriptor");
            return Err(StoreError::NotFound(identity.to_string()));
        }

        secret_to_descriptor(&secret)
    }

    #[tracing::instrument(name = "descriptor_store.list", skip_all, err)]
    async fn list(&self) -> Result<Vec<ClusterDescriptor>, StoreError> {
        let params = ListParams::default().labels(CLUSTER_DESCRIPTOR_SELECTOR);
        let secrets = self
            .api
            .list(&params)
            .await
            .map_err(|e| StoreError::Persistence(e.to_string()))?;

        Ok(secrets_to_descriptors(&secrets.items))
    }

    #[tracing::instrument(name = "descriptor_store.delete", skip_all, fields(cluster = %identity), err)]
    async fn delete(&self, identity: &str) -> Result<(), StoreError> {
        // Refuse to touch Secrets that are not descriptors.
        self.get(identity).await?;

        self.api
            .delete(identity, &DeleteParams::default())
            .await
            .map_err(|e| map_kube_error(identity, e))?;

        info!("🗑️ Cluster descriptor deleted");
        Ok(())
    }

    #[tracing::instrument(name = "descriptor_store.store_trust_anchor", skip_all, fields(cluster = %identity), err)]
    async fn store_trust_anchor(
        &self,
        identity: &str,
        trust_anchor: &[u8],
    ) -> Result<(), StoreError> {
        let patch = json!({
            "data": { KEY_TRUST_ANCHOR: STANDARD.encode(trust_anchor) }
        });

        self.api
            .patch(identity, &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .map_err(|e| map_kube_error(identity, e))?;

        Ok(())
    }
}
