use std::{
    collections::{HashMap, HashSet},
    sync::{
        Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use secrecy::SecretString;
use spawnr_api::services::{
    descriptor_store::{DescriptorStore, StoreError},
    identity_exchange::{ExchangeError, IdentityExchange},
};
use spawnr_core::models::ClusterDescriptor;

/// Descriptor store kept in memory, in insertion order.
#[derive(Default)]
pub struct InMemoryStore {
    records: Mutex<Vec<ClusterDescriptor>>,
    aliases: Mutex<HashMap<String, String>>,
    pub fail_list: AtomicBool,
    pub fail_anchor_writes: AtomicBool,
    pub anchor_writes: AtomicUsize,
}

impl InMemoryStore {
    /// Serves the record stored as `identity` under a different lookup name,
    /// the way a Secret can be named apart from its `cluster-name` field.
    pub fn alias(&self, name: &str, identity: &str) {
        self.aliases
            .lock()
            .unwrap()
            .insert(name.to_string(), identity.to_string());
    }

    pub fn snapshot(&self, identity: &str) -> Option<ClusterDescriptor> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.cluster_identity == identity)
            .cloned()
    }
}

#[async_trait]
impl DescriptorStore for InMemoryStore {
    async fn create(&self, descriptor: &ClusterDescriptor) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();

        if records
            .iter()
            .any(|d| d.cluster_identity == descriptor.cluster_identity)
        {
            return Err(StoreError::DuplicateIdentity(
                descriptor.cluster_identity.clone(),
            ));
        }

        records.push(descriptor.clone());
        Ok(())
    }

    async fn get(&self, identity: &str) -> Result<ClusterDescriptor, StoreError> {
        let stored = self
            .aliases
            .lock()
            .unwrap()
            .get(identity)
            .cloned()
            .unwrap_or_else(|| identity.to_string());

        self.snapshot(&stored)
            .ok_or_else(|| StoreError::NotFound(identity.to_string()))
    }

    async fn list(&self) -> Result<Vec<ClusterDescriptor>, StoreError> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(StoreError::Persistence("secrets is forbidden".to_string()));
        }

        Ok(self.records.lock().unwrap().clone())
    }

    async fn delete(&self, identity: &str) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|d| d.cluster_identity != identity);

        if records.len() == before {
            return Err(StoreError::NotFound(identity.to_string()));
        }

        Ok(())
    }

    async fn store_trust_anchor(
        &self,
        identity: &str,
        trust_anchor: &[u8],
    ) -> Result<(), StoreError> {
        if self.fail_anchor_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Persistence("store is read-only".to_string()));
        }

        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|d| d.cluster_identity == identity)
            .ok_or_else(|| StoreError::NotFound(identity.to_string()))?;

        record.trust_anchor = Some(trust_anchor.to_vec());
        self.anchor_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Identity exchange answering from a script, counting every call.
#[derive(Default)]
pub struct ScriptedExchange {
    anchors: Mutex<HashMap<String, Vec<u8>>>,
    denied: Mutex<HashSet<String>>,
    token_delay: Mutex<Option<Duration>>,
    token_identities: Mutex<Vec<String>>,
    pub anchor_calls: AtomicUsize,
    pub token_calls: AtomicUsize,
}

impl ScriptedExchange {
    pub fn with_anchor(&self, identity: &str, anchor: Vec<u8>) {
        self.anchors
            .lock()
            .unwrap()
            .insert(identity.to_string(), anchor);
    }

    pub fn deny_token(&self, identity: &str) {
        self.denied.lock().unwrap().insert(identity.to_string());
    }

    pub fn delay_tokens(&self, delay: Duration) {
        *self.token_delay.lock().unwrap() = Some(delay);
    }

    pub fn anchor_calls(&self) -> usize {
        self.anchor_calls.load(Ordering::SeqCst)
    }

    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    /// Identities tokens were requested for, in call order.
    pub fn token_identities(&self) -> Vec<String> {
        self.token_identities.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityExchange for ScriptedExchange {
    async fn fetch_trust_anchor(
        &self,
        identity: &str,
        _role: &str,
    ) -> Result<Vec<u8>, ExchangeError> {
        self.anchor_calls.fetch_add(1, Ordering::SeqCst);

        self.anchors
            .lock()
            .unwrap()
            .get(identity)
            .cloned()
            .ok_or_else(|| ExchangeError::CommandFailed {
                operation: "describe-cluster",
                stderr: format!("ResourceNotFoundException: No cluster found for name: {identity}."),
            })
    }

    async fn exchange_token(
        &self,
        identity: &str,
        _role: &str,
    ) -> Result<SecretString, ExchangeError> {
        self.token_calls.fetch_add(1, Ordering::SeqCst);
        self.token_identities
            .lock()
            .unwrap()
            .push(identity.to_string());

        let delay = *self.token_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.denied.lock().unwrap().contains(identity) {
            return Err(ExchangeError::CommandFailed {
                operation: "get-token",
                stderr: "AccessDenied: not authorized to perform sts:AssumeRole".to_string(),
            });
        }

        Ok(SecretString::from(format!("k8s-aws-v1.{identity}")))
    }
}
