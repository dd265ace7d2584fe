use std::{sync::Arc, time::Duration};

use futures::{Stream, StreamExt, future::join_all};
use k8s_openapi::api::{
    apps::v1::Deployment,
    batch::v1::Job,
    core::v1::{Namespace, Pod},
};
use kube::{
    Api,
    api::{DeleteParams, ListParams, LogParams, PostParams},
    runtime::{watcher, watcher::Event},
};
use spawnr_core::{
    constants::{JOB_NAME_LABEL, MANAGED_JOBS_SELECTOR},
    determiners::{JobOutcome, determine_job_outcome},
    formatters::format_job_name,
    job_template::build_job,
    schemas::CreateJobRequest,
};
use tracing::{info, warn};

use crate::services::{
    client_resolver::ClientHandle,
    resource_service::{ResourceError, ResourceService},
};

const NO_PODS_MESSAGE: &str = "No pods found for this job";

impl ResourceService {
    pub fn new(handle: Arc<ClientHandle>, timeout: Duration) -> Self {
        Self { handle, timeout }
    }

    pub fn handle(&self) -> &ClientHandle {
        &self.handle
    }

    fn api<K>(&self, namespace: &str) -> Api<K>
    where
        K: kube::Resource<Scope = k8s_openapi::NamespaceResourceScope>,
        <K as kube::Resource>::DynamicType: Default,
    {
        Api::namespaced(self.handle.client().clone(), namespace)
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = Result<T, kube::Error>>,
    ) -> Result<T, ResourceError> {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| ResourceError::Timeout {
                operation,
                timeout: self.timeout,
            })?
            .map_err(ResourceError::from)
    }

    #[tracing::instrument(name = "resource_service.list_namespaces", skip_all, fields(cluster = %self.handle.identity()), err)]
    pub async fn list_namespaces(&self) -> Result<Vec<Namespace>, ResourceError> {
        let api: Api<Namespace> = Api::all(self.handle.client().clone());
        let list = self
            .bounded("list namespaces", api.list(&ListParams::default()))
            .await?;

        Ok(list.items)
    }

    #[tracing::instrument(name = "resource_service.list_deployments", skip_all, fields(cluster = %self.handle.identity(), namespace = %namespace), err)]
    pub async fn list_deployments(&self, namespace: &str) -> Result<Vec<Deployment>, ResourceError> {
        let api: Api<Deployment> = self.api(namespace);
        let list = self
            .bounded("list deployments", api.list(&ListParams::default()))
            .await?;

        Ok(list.items)
    }

    #[tracing::instrument(name = "resource_service.get_deployment", skip_all, fields(cluster = %self.handle.identity(), namespace = %namespace, name = %name), err)]
    pub async fn get_deployment(&self, namespace: &str, name: &str) -> Result<Deployment, ResourceError> {
        let api: Api<Deployment> = self.api(namespace);

        self.bounded("get deployment", api.get(name)).await
    }

    /// Copies the deployment's pod template into a new one-off job.
    #[tracing::instrument(name = "resource_service.create_job", skip_all, fields(cluster = %self.handle.identity(), namespace = %req.namespace, deployment = %req.deployment), err)]
    pub async fn create_job(&self, req: &CreateJobRequest) -> Result<Job, ResourceError> {
        let deployment = self.get_deployment(&req.namespace, &req.deployment).await?;
        let job_name = format_job_name(&req.job_name);
        let job = build_job(&deployment, &req.namespace, &job_name, &req.command)?;

        let api: Api<Job> = self.api(&req.namespace);
        let created = self
            .bounded("create job", api.create(&PostParams::default(), &job))
            .await?;

        info!(job = %job_name, "✅ Job created");
        Ok(created)
    }

    #[tracing::instrument(name = "resource_service.get_job", skip_all, fields(cluster = %self.handle.identity(), namespace = %namespace, name = %name), err)]
    pub async fn get_job(&self, namespace: &str, name: &str) -> Result<Job, ResourceError> {
        let api: Api<Job> = self.api(namespace);

        self.bounded("get job", api.get(name)).await
    }

    async fn job_pods(&self, namespace: &str, name: &str) -> Result<Vec<Pod>, ResourceError> {
        let api: Api<Pod> = self.api(namespace);
        let params = ListParams::default().labels(&format!("{JOB_NAME_LABEL}={name}"));
        let list = self.bounded("list job pods", api.list(&params)).await?;

        Ok(list.items)
    }

    /// Removes the job's pods first, then the job, both in the foreground.
    #[tracing::instrument(name = "resource_service.delete_job", skip_all, fields(cluster = %self.handle.identity(), namespace = %namespace, name = %name), err)]
    pub async fn delete_job(&self, namespace: &str, name: &str) -> Result<(), ResourceError> {
        let pods_api: Api<Pod> = self.api(namespace);

        match self.job_pods(namespace, name).await {
            Ok(pods) => {
                for pod_name in pods.iter().filter_map(|pod| pod.metadata.name.as_deref()) {
                    let deleted = self
                        .bounded(
                            "delete job pod",
                            pods_api.delete(pod_name, &DeleteParams::foreground()),
                        )
                        .await;

                    if let Err(e) = deleted {
                        warn!(pod = %pod_name, error = %e, "Failed to delete job pod");
                    }
                }
            }
            Err(e) => warn!(error = %e, "Failed to list job pods"),
        }

        let api: Api<Job> = self.api(namespace);
        self.bounded("delete job", api.delete(name, &DeleteParams::foreground()))
            .await?;

        info!("🗑️ Job deleted");
        Ok(())
    }

    /// Logs of the job's first pod.
    #[tracing::instrument(name = "resource_service.job_logs", skip_all, fields(cluster = %self.handle.identity(), namespace = %namespace, name = %name), err)]
    pub async fn job_logs(&self, namespace: &str, name: &str) -> Result<String, ResourceError> {
        self.get_job(namespace, name).await?;

        let pods = self.job_pods(namespace, name).await?;
        let Some(pod_name) = pods.first().and_then(|pod| pod.metadata.name.as_deref()) else {
            return Ok(NO_PODS_MESSAGE.to_string());
        };

        let api: Api<Pod> = self.api(namespace);
        self.bounded("get pod logs", api.logs(pod_name, &LogParams::default()))
            .await
    }

    /// Human-readable job events until the job succeeds, fails, is deleted, or
    /// the watch breaks.
    pub fn watch_job(
        &self,
        namespace: &str,
        name: &str,
    ) -> impl Stream<Item = String> + Send + 'static + use<> {
        let api: Api<Job> = self.api(namespace);
        let name = name.to_string();
        let config = watcher::Config::default().fields(&format!("metadata.name={name}"));

        async_stream::stream! {
            let mut events = watcher(api, config).boxed();
            let mut seen = false;

            while let Some(event) = events.next().await {
                match event {
                    Ok(Event::Apply(job)) | Ok(Event::InitApply(job)) => {
                        let kind = if seen { "MODIFIED" } else { "ADDED" };
                        seen = true;
                        yield format!("Job {name}: {kind}");

                        match determine_job_outcome(&job) {
                            Some(JobOutcome::Succeeded) => {
                                yield "Job completed successfully".to_string();
                                break;
                            }
                            Some(JobOutcome::Failed) => {
                                yield "Job failed".to_string();
                                break;
                            }
                            None => {}
                        }
                    }
                    Ok(Event::Delete(_)) => {
                        yield format!("Job {name}: DELETED");
                        break;
                    }
                    Ok(Event::Init) | Ok(Event::InitDone) => {}
                    Err(e) => {
                        yield format!("Error watching job: {e}");
                        break;
                    }
                }
            }
        }
    }

    /// Jobs carrying the managed-by label across every namespace. A namespace
    /// that cannot be listed is skipped.
    #[tracing::instrument(name = "resource_service.list_managed_jobs", skip_all, fields(cluster = %self.handle.identity()), err)]
    pub async fn list_managed_jobs(&self) -> Result<Vec<Job>, ResourceError> {
        let namespaces = self.list_namespaces().await?;
        let params = ListParams::default().labels(MANAGED_JOBS_SELECTOR);

        let listings = join_all(
            namespaces
                .iter()
                .filter_map(|ns| ns.metadata.name.as_deref())
                .map(|namespace| {
                    let api: Api<Job> = self.api(namespace);
                    let params = params.clone();
                    async move {
                        let listed = self.bounded("list managed jobs", api.list(&params)).await;
                        (namespace, listed)
                    }
                }),
        )
        .await;

        let mut jobs = Vec::new();
        for (namespace, listed) in listings {
            match listed {
                Ok(list) => jobs.extend(list.items),
                Err(e) => warn!(%namespace, error = %e, "Failed to list managed jobs, skipping namespace"),
            }
        }

        Ok(jobs)
    }
}
