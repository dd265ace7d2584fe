use std::{path::PathBuf, time::Duration};

use kube::{
    Client, Config,
    config::{KubeConfigOptions, Kubeconfig},
};
use tracing::{debug, info};

use crate::factories::kubernetes::{Kubernetes, error::KubernetesError};

pub trait KubernetesConfig {
    /// Explicit kubeconfig location, used when in-cluster credentials are absent.
    fn k8s_config_path(&self) -> Option<PathBuf>;
    fn k8s_connect_timeout(&self) -> Duration;
}

impl Kubernetes {
    pub async fn new<T: KubernetesConfig>(config: &T) -> Result<Self, KubernetesError> {
        let kube_config = ambient_config(config).await?;
        let client = Client::try_from(kube_config)?;

        Ok(Self { client })
    }
}

/// Builds a client config from in-cluster credentials, falling back to a local
/// kubeconfig file (the configured path, or `~/.kube/config`).
pub async fn ambient_config<T: KubernetesConfig>(config: &T) -> Result<Config, KubernetesError> {
    let mut kube_config = match Config::incluster() {
        Ok(kube_config) => {
            info!("✅ Using in-cluster credentials");
            kube_config
        }
        Err(in_cluster) => {
            debug!(error = %in_cluster, "In-cluster credentials unavailable, falling back to kubeconfig");

            let path = match config.k8s_config_path() {
                Some(path) => path,
                None => default_kubeconfig_path().ok_or(KubernetesError::NoHomeDirectory)?,
            };

            let kubeconfig = Kubeconfig::read_from(&path)?;
            let options = KubeConfigOptions::default();
            let kube_config = Config::from_custom_kubeconfig(kubeconfig, &options).await?;

            info!(path = %path.display(), "✅ Using local kubeconfig");
            kube_config
        }
    };

    kube_config.connect_timeout = Some(config.k8s_connect_timeout());

    Ok(kube_config)
}

pub fn default_kubeconfig_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".kube").join("config"))
}
