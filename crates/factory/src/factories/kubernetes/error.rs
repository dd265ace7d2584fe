use thiserror::Error;

#[derive(Error, Debug)]
pub enum KubernetesError {
    #[error("Kube error, {0}")]
    KubeError(#[from] kube::Error),
    #[error("KubeconfigError, {0}")]
    KubeconfigError(#[from] kube::config::KubeconfigError),
    #[error("No home directory to look up the default kubeconfig in")]
    NoHomeDirectory,
}
