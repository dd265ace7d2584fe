/// Reserved identity of the cluster the service itself runs in.
pub const LOCAL_CLUSTER: &str = "local";
pub const LOCAL_CLUSTER_FRIENDLY_NAME: &str = "Local Cluster";

/// Marks a Secret as a cluster connection descriptor.
pub const CLUSTER_DESCRIPTOR_LABEL: &str = "spawnr.io/cluster";
pub const CLUSTER_DESCRIPTOR_SELECTOR: &str = "spawnr.io/cluster=true";

pub const DEFAULT_ADMIN_NAMESPACE: &str = "spawnr";

pub const MANAGED_BY_LABEL: &str = "app.kubernetes.io/managed-by";
pub const MANAGED_BY_VALUE: &str = "spawnr";
pub const MANAGED_JOBS_SELECTOR: &str = "app.kubernetes.io/managed-by=spawnr";

/// Label the job controller puts on every pod it creates.
pub const JOB_NAME_LABEL: &str = "job-name";

pub const UNKNOWN_REGION: &str = "unknown";
