#![allow(dead_code)]

pub mod kube_api;
pub mod mocks;

use std::{io::Write, path::Path, sync::Arc};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use factory::factories::observability::ObservabilityConfig;
use spawnr_api::{
    config::{Config, IdentityExchangeConfig, KubernetesSettings},
    services::client_resolver::{ClientResolver, ResolverSettings},
    utilities::app_state::AppState,
};
use serde_json::Value;
use spawnr_core::models::ClusterDescriptor;
use tempfile::NamedTempFile;
use tower::ServiceExt;

use mocks::{InMemoryStore, ScriptedExchange};

pub const CA_PEM: &str = include_str!("../fixtures/ca.pem");

const KUBECONFIG: &str = r#"
apiVersion: v1
kind: Config
clusters:
- name: home
  cluster:
    server: https://home.example.test:6443
    insecure-skip-tls-verify: true
users:
- name: home
  user:
    token: home-token
contexts:
- name: home
  context:
    cluster: home
    user: home
current-context: home
"#;

/// The CA bundle the way the identity provider hands it out: base64 of PEM.
pub fn provider_trust_anchor() -> Vec<u8> {
    STANDARD.encode(CA_PEM).into_bytes()
}

pub fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

pub fn descriptor(identity: &str, endpoint: &str) -> ClusterDescriptor {
    ClusterDescriptor {
        cluster_identity: identity.to_string(),
        friendly_name: format!("{identity} cluster"),
        endpoint: endpoint.to_string(),
        assumable_role: format!("arn:aws:iam::123456789012:role/{identity}"),
        trust_anchor: None,
        region: None,
    }
}

pub fn test_config(kubeconfig: &Path) -> Config {
    Config {
        server_address: "127.0.0.1:0".parse().unwrap(),
        observability: ObservabilityConfig::default(),
        kubernetes: KubernetesSettings {
            kubeconfig: Some(kubeconfig.to_path_buf()),
            admin_namespace: "spawnr".to_string(),
            ambient_region: None,
            connect_timeout_secs: 1,
            request_timeout_secs: 1,
        },
        identity_exchange: IdentityExchangeConfig {
            program: "aws".to_string(),
            region: None,
            timeout_secs: 1,
        },
    }
}

/// Fakes plus a kubeconfig for the `local` cluster.
pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub exchange: Arc<ScriptedExchange>,
    pub config: Config,
    _kubeconfig: NamedTempFile,
}

impl Harness {
    pub fn new() -> Self {
        install_crypto_provider();

        let mut kubeconfig = NamedTempFile::new().unwrap();
        kubeconfig.write_all(KUBECONFIG.as_bytes()).unwrap();
        let config = test_config(kubeconfig.path());

        Self {
            store: Arc::new(InMemoryStore::default()),
            exchange: Arc::new(ScriptedExchange::default()),
            config,
            _kubeconfig: kubeconfig,
        }
    }

    pub fn resolver(&self) -> ClientResolver {
        ClientResolver::new(
            self.store.clone(),
            self.exchange.clone(),
            ResolverSettings::from(&self.config),
        )
    }

    pub async fn state(&self) -> AppState {
        AppState::from_parts(self.config.clone(), self.store.clone(), self.exchange.clone())
            .await
            .unwrap()
    }
}

/// Sends one request through the router and returns the raw response body.
pub async fn send_text(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, String) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, text) = send_text(app, method, uri, body).await;

    (status, serde_json::from_str(&text).unwrap_or(Value::Null))
}
