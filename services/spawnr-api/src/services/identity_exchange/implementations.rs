use std::process::Stdio;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::{
    config::IdentityExchangeConfig,
    services::identity_exchange::{AwsCliExchange, ExchangeError, IdentityExchange},
};

const DESCRIBE_CLUSTER: &str = "describe-cluster";
const GET_TOKEN: &str = "get-token";

#[derive(Deserialize)]
struct ExecCredential {
    status: ExecCredentialStatus,
}

#[derive(Deserialize)]
struct ExecCredentialStatus {
    token: String,
}

impl AwsCliExchange {
    pub fn new(cfg: &IdentityExchangeConfig) -> Self {
        Self {
            program: cfg.program.clone(),
            region: cfg.region.clone().filter(|r| !r.is_empty()),
            timeout: cfg.timeout(),
        }
    }

    /// Runs one CLI call and returns its stdout. The child is killed if the
    /// timeout elapses first.
    async fn run(&self, operation: &'static str, args: &[&str]) -> Result<String, ExchangeError> {
        let mut command = Command::new(&self.program);
        command
            .arg("eks")
            .arg(operation)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        if let Some(region) = &self.region {
            command.args(["--region", region.as_str()]);
        }

        debug!(program = %self.program, operation, "Running identity provider CLI");

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| ExchangeError::Timeout {
                operation,
                timeout: self.timeout,
            })?
            .map_err(|source| ExchangeError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(operation, status = %output.status, %stderr, "Identity provider CLI failed");
            return Err(ExchangeError::CommandFailed { operation, stderr });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

pub fn parse_trust_anchor(identity: &str, stdout: &str) -> Result<Vec<u8>, ExchangeError> {
    let data = stdout.trim();

    if data.is_empty() || data == "None" {
        return Err(ExchangeError::MissingTrustAnchor(identity.to_string()));
    }

    Ok(data.as_bytes().to_vec())
}

pub fn parse_token(stdout: &str) -> Result<SecretString, ExchangeError> {
    let credential: ExecCredential =
        serde_json::from_str(stdout).map_err(|e| ExchangeError::MalformedToken(e.to_string()))?;

    if credential.status.token.is_empty() {
        return Err(ExchangeError::MalformedToken("token is empty".to_string()));
    }

    Ok(SecretString::from(credential.status.token))
}

#[async_trait]
impl IdentityExchange for AwsCliExchange {
    #[tracing::instrument(name = "identity_exchange.fetch_trust_anchor", skip_all, fields(cluster = %identity), err)]
    async fn fetch_trust_anchor(
        &self,
        identity: &str,
        role: &str,
    ) -> Result<Vec<u8>, ExchangeError> {
        let stdout = self
            .run(
                DESCRIBE_CLUSTER,
                &[
                    "--name",
                    identity,
                    "--role-arn",
                    role,
                    "--query",
                    "cluster.certificateAuthority.data",
                    "--output",
                    "text",
                ],
            )
            .await?;

        parse_trust_anchor(identity, &stdout)
    }

    #[tracing::instrument(name = "identity_exchange.exchange_token", skip_all, fields(cluster = %identity), err)]
    async fn exchange_token(
        &self,
        identity: &str,
        role: &str,
    ) -> Result<SecretString, ExchangeError> {
        let stdout = self
            .run(GET_TOKEN, &["--cluster-name", identity, "--role-arn", role])
            .await?;

        parse_token(&stdout)
    }
}
