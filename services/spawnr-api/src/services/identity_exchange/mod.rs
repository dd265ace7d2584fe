pub mod implementations;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{operation} failed: {stderr}")]
    CommandFailed {
        operation: &'static str,
        stderr: String,
    },
    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },
    #[error("No certificate authority data returned for cluster {0}")]
    MissingTrustAnchor(String),
    #[error("Malformed token response: {0}")]
    MalformedToken(String),
}

/// Exchanges the process identity for per-cluster material via the identity provider.
#[async_trait]
pub trait IdentityExchange: Send + Sync {
    /// CA bundle of the cluster, exactly as the provider returns it.
    async fn fetch_trust_anchor(&self, identity: &str, role: &str)
    -> Result<Vec<u8>, ExchangeError>;
    /// Short-lived bearer token for the cluster, assumed through `role`.
    async fn exchange_token(&self, identity: &str, role: &str)
    -> Result<SecretString, ExchangeError>;
}

/// Shells out to the `aws` CLI.
#[derive(Clone, Debug)]
pub struct AwsCliExchange {
    program: String,
    region: Option<String>,
    timeout: Duration,
}
