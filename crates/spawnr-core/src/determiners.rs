use k8s_openapi::api::batch::v1::Job;
use url::Url;

/// Provider domain marker: `https://<hash>.<label>.<region>.eks.<domain>`.
const PROVIDER_MARKER: &str = ".eks.";

/// Extracts the region label that precedes the provider marker in the endpoint
/// host. At least one label must come before the region.
pub fn determine_region(endpoint: &str) -> Option<String> {
    let url = Url::parse(endpoint).ok()?;
    let host = url.host_str()?;

    let (before, _) = host.split_once(PROVIDER_MARKER)?;
    let (rest, region) = before.rsplit_once('.')?;

    if rest.is_empty() || region.is_empty() {
        return None;
    }

    Some(region.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Succeeded,
    Failed,
}

/// Terminal outcome of a job, if it has reached one.
pub fn determine_job_outcome(job: &Job) -> Option<JobOutcome> {
    let status = job.status.as_ref()?;

    if status.succeeded.unwrap_or_default() > 0 {
        return Some(JobOutcome::Succeeded);
    }

    if status.failed.unwrap_or_default() > 0 {
        return Some(JobOutcome::Failed);
    }

    None
}
