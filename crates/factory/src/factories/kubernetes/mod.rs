pub mod error;
pub mod implementation;

use kube::Client;

/// Client built from the process' own (ambient) credentials.
///
/// This is the administrative connection: it always points at the cluster the
/// service runs in, independently of whichever cluster is currently active.
#[derive(Clone)]
pub struct Kubernetes {
    pub client: Client,
}
