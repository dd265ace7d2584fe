use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::{
    constants::{LOCAL_CLUSTER, LOCAL_CLUSTER_FRIENDLY_NAME},
    models::ClusterDescriptor,
};

const CLUSTER_STATUS_ACTIVE: &str = "ACTIVE";
const PROFILE_IN_CLUSTER: &str = "in-cluster";
const PROFILE_ROLE_ARN: &str = "role-arn";

/// Cluster identities double as Secret names, so they must be DNS-1123 subdomains.
fn validate_cluster_identity(value: &str) -> Result<(), ValidationError> {
    let valid_chars = value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.');
    let valid_edges = value
        .chars()
        .next()
        .zip(value.chars().last())
        .is_some_and(|(first, last)| first.is_ascii_alphanumeric() && last.is_ascii_alphanumeric());

    if !valid_chars || !valid_edges {
        return Err(ValidationError::new("cluster_identity").with_message(
            "must consist of lowercase alphanumerics, '-' or '.', and start and end with an alphanumeric".into(),
        ));
    }

    Ok(())
}

// -----------------------------------------------
// CLUSTER SCHEMAS
// -----------------------------------------------

#[derive(Deserialize, Validate, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RegisterClusterRequest {
    #[validate(length(min = 1, max = 253), custom(function = "validate_cluster_identity"))]
    pub cluster_name: String,
    #[validate(length(min = 1, max = 128))]
    pub friendly_name: String,
    #[validate(length(min = 1, max = 2048))]
    pub role_arn: String,
    #[validate(url)]
    pub endpoint: String,
    pub certificate_authority: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub region: Option<String>,
}

impl From<RegisterClusterRequest> for ClusterDescriptor {
    fn from(req: RegisterClusterRequest) -> Self {
        Self {
            cluster_identity: req.cluster_name,
            friendly_name: req.friendly_name,
            endpoint: req.endpoint,
            assumable_role: req.role_arn,
            trust_anchor: req
                .certificate_authority
                .filter(|ca| !ca.trim().is_empty())
                .map(String::into_bytes),
            region: req.region,
        }
    }
}

#[derive(Deserialize, Validate, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SwitchClusterRequest {
    #[validate(length(max = 253))]
    pub cluster_name: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SwitchClusterResponse {
    pub message: String,
    pub server: String,
    pub insecure: bool,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CurrentClusterResponse {
    pub cluster_name: String,
    pub server: String,
    pub insecure: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterView {
    pub name: String,
    pub original_name: String,
    pub region: String,
    pub endpoint: String,
    pub status: String,
    pub profile: String,
    pub is_local: bool,
    pub has_trust_anchor: bool,
}

impl ClusterView {
    /// The synthesized entry for the process's own ambient credentials.
    pub fn local(ambient_region: Option<&str>) -> Self {
        Self {
            name: LOCAL_CLUSTER_FRIENDLY_NAME.to_string(),
            original_name: LOCAL_CLUSTER.to_string(),
            region: ambient_region.unwrap_or(LOCAL_CLUSTER).to_string(),
            endpoint: String::new(),
            status: CLUSTER_STATUS_ACTIVE.to_string(),
            profile: PROFILE_IN_CLUSTER.to_string(),
            is_local: true,
            has_trust_anchor: false,
        }
    }
}

impl From<&ClusterDescriptor> for ClusterView {
    fn from(d: &ClusterDescriptor) -> Self {
        Self {
            name: d.friendly_name.clone(),
            original_name: d.cluster_identity.clone(),
            region: d.region(),
            endpoint: d.endpoint.clone(),
            status: CLUSTER_STATUS_ACTIVE.to_string(),
            profile: PROFILE_ROLE_ARN.to_string(),
            is_local: false,
            has_trust_anchor: d.has_trust_anchor(),
        }
    }
}

// -----------------------------------------------
// RESOURCE SCHEMAS
// -----------------------------------------------

#[derive(Deserialize, Debug, Default)]
pub struct DeploymentsQuery {
    pub namespace: Option<String>,
}

impl DeploymentsQuery {
    pub fn namespace(&self) -> &str {
        self.namespace
            .as_deref()
            .filter(|ns| !ns.is_empty())
            .unwrap_or("default")
    }
}

#[derive(Deserialize, Validate, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    #[validate(length(min = 1, max = 63))]
    pub namespace: String,
    #[validate(length(min = 1, max = 253))]
    pub deployment: String,
    #[validate(length(min = 1))]
    pub command: String,
    #[validate(length(min = 1, max = 253))]
    pub job_name: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LogsResponse {
    pub logs: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Payload of a single job watch event.
#[derive(Serialize, Deserialize, Debug)]
pub struct WatchEventData {
    pub data: String,
}
