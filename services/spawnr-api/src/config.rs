use std::{net::SocketAddr, path::PathBuf, time::Duration};

use config::{ConfigBuilder, ConfigError, Environment, File, builder::AsyncState};
use factory::factories::observability::ObservabilityConfig;
use serde::Deserialize;
use spawnr_core::constants::DEFAULT_ADMIN_NAMESPACE;
use utility::get_optional_env_value::get_optional_env_value;

#[derive(Deserialize, Clone, Debug)]
pub struct KubernetesSettings {
    /// Kubeconfig used for the `local` cluster when not running in a pod.
    pub kubeconfig: Option<PathBuf>,
    /// Namespace holding the cluster descriptor Secrets.
    pub admin_namespace: String,
    /// Region reported for the `local` cluster.
    pub ambient_region: Option<String>,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl KubernetesSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct IdentityExchangeConfig {
    pub program: String,
    pub region: Option<String>,
    pub timeout_secs: u64,
}

impl IdentityExchangeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub server_address: SocketAddr,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    pub kubernetes: KubernetesSettings,
    pub identity_exchange: IdentityExchangeConfig,
}

/// Well-known deployment variables that win over every other source.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    pub pod_namespace: Option<String>,
    pub aws_region: Option<String>,
    pub kubeconfig: Option<String>,
    pub port: Option<u16>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            pod_namespace: get_optional_env_value("POD_NAMESPACE"),
            aws_region: get_optional_env_value("AWS_REGION"),
            kubeconfig: get_optional_env_value("KUBECONFIG"),
            port: get_optional_env_value("PORT"),
        }
    }
}

impl Config {
    pub async fn init(path: PathBuf) -> Result<Self, ConfigError> {
        Self::from_sources(path, EnvOverrides::from_env()).await
    }

    /// Defaults, then the optional JSON file, then `SECTION__KEY` variables,
    /// then the well-known overrides.
    pub async fn from_sources(path: PathBuf, overrides: EnvOverrides) -> Result<Self, ConfigError> {
        let cfg = ConfigBuilder::<AsyncState>::default()
            .set_default("server_address", "0.0.0.0:8080")?
            .set_default("kubernetes.admin_namespace", DEFAULT_ADMIN_NAMESPACE)?
            .set_default("kubernetes.connect_timeout_secs", 10)?
            .set_default("kubernetes.request_timeout_secs", 30)?
            .set_default("identity_exchange.program", "aws")?
            .set_default("identity_exchange.timeout_secs", 30)?
            .add_source(File::from(path).required(false))
            .add_source(Environment::default().separator("__"))
            .set_override_option("kubernetes.admin_namespace", overrides.pod_namespace)?
            .set_override_option("kubernetes.ambient_region", overrides.aws_region)?
            .set_override_option("kubernetes.kubeconfig", overrides.kubeconfig)?
            .set_override_option(
                "server_address",
                overrides.port.map(|port| format!("0.0.0.0:{port}")),
            )?
            .build()
            .await?;

        cfg.try_deserialize()
    }
}
