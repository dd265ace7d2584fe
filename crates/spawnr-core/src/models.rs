use serde::{Deserialize, Serialize};

use crate::{constants::UNKNOWN_REGION, determiners::determine_region};

// ---------------------------------------------
// ENUMS
// ---------------------------------------------

/// How the API server's certificate is checked by a resolved client.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrustPolicy {
    Verified,
    SkipVerification,
}

impl TrustPolicy {
    pub fn is_insecure(&self) -> bool {
        matches!(self, Self::SkipVerification)
    }
}

impl std::fmt::Display for TrustPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Verified => write!(f, "verified"),
            Self::SkipVerification => write!(f, "skip_verification"),
        }
    }
}

// ---------------------------------------------
// MODELS
// ---------------------------------------------

/// Everything needed to reach and authenticate to one remote cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterDescriptor {
    /// Name known to the identity provider, unique per descriptor.
    pub cluster_identity: String,
    pub friendly_name: String,
    pub endpoint: String,
    pub assumable_role: String,
    /// CA bundle, base64 encoded or PEM. Absent until healed.
    pub trust_anchor: Option<Vec<u8>>,
    pub region: Option<String>,
}

impl ClusterDescriptor {
    pub fn has_trust_anchor(&self) -> bool {
        self.trust_anchor.as_ref().is_some_and(|anchor| !anchor.is_empty())
    }

    /// A descriptor is healed lazily when it can assume a role but lacks CA material.
    pub fn needs_healing(&self) -> bool {
        !self.has_trust_anchor() && !self.assumable_role.is_empty()
    }

    /// Recorded region, else the one encoded in the endpoint host, else `unknown`.
    pub fn region(&self) -> String {
        self.region
            .clone()
            .filter(|region| !region.is_empty())
            .or_else(|| determine_region(&self.endpoint))
            .unwrap_or_else(|| UNKNOWN_REGION.to_string())
    }
}
