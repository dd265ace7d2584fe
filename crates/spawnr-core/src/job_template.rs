use std::collections::BTreeMap;

use k8s_openapi::{
    api::{
        apps::v1::Deployment,
        batch::v1::{Job, JobSpec},
        core::v1::{PodSpec, PodTemplateSpec},
    },
    apimachinery::pkg::apis::meta::v1::ObjectMeta,
};

use crate::{
    constants::{MANAGED_BY_LABEL, MANAGED_BY_VALUE},
    error::JobTemplateError,
};

const SHELL_COMMAND: [&str; 2] = ["/bin/sh", "-c"];
const RESTART_NEVER: &str = "Never";

/// Builds a one-off job from a deployment's pod template. The first container
/// runs `command` through a shell, nothing is restarted, and both the job and
/// its pods carry the managed-by label.
pub fn build_job(
    deployment: &Deployment,
    namespace: &str,
    job_name: &str,
    command: &str,
) -> Result<Job, JobTemplateError> {
    let missing = || JobTemplateError::MissingPodTemplate {
        namespace: namespace.to_string(),
        name: deployment.metadata.name.clone().unwrap_or_default(),
    };

    let template = deployment
        .spec
        .as_ref()
        .map(|spec| &spec.template)
        .ok_or_else(missing)?;

    let mut pod_spec: PodSpec = template.spec.clone().ok_or_else(missing)?;
    pod_spec.restart_policy = Some(RESTART_NEVER.to_string());

    if let Some(container) = pod_spec.containers.first_mut() {
        container.command = Some(SHELL_COMMAND.iter().map(|s| s.to_string()).collect());
        container.args = Some(vec![command.to_string()]);
    }

    let mut pod_metadata = template.metadata.clone().unwrap_or_default();
    pod_metadata
        .labels
        .get_or_insert_with(BTreeMap::new)
        .insert(MANAGED_BY_LABEL.to_string(), MANAGED_BY_VALUE.to_string());

    Ok(Job {
        metadata: ObjectMeta {
            name: Some(job_name.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(BTreeMap::from([(
                MANAGED_BY_LABEL.to_string(),
                MANAGED_BY_VALUE.to_string(),
            )])),
            ..Default::default()
        },
        spec: Some(JobSpec {
            template: PodTemplateSpec {
                metadata: Some(pod_metadata),
                spec: Some(pod_spec),
            },
            ..Default::default()
        }),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use k8s_openapi::api::{
        apps::v1::DeploymentSpec,
        core::v1::Container,
    };

    use super::*;

    fn deployment() -> Deployment {
        Deployment {
            metadata: ObjectMeta {
                name: Some("api".into()),
                namespace: Some("team-a".into()),
                ..Default::default()
            },
            spec: Some(DeploymentSpec {
                template: PodTemplateSpec {
                    metadata: Some(ObjectMeta {
                        labels: Some(BTreeMap::from([("app".to_string(), "api".to_string())])),
                        ..Default::default()
                    }),
                    spec: Some(PodSpec {
                        restart_policy: Some("Always".into()),
                        containers: vec![
                            Container {
                                name: "api".into(),
                                image: Some("registry.example.com/api:1.2".into()),
                                command: Some(vec!["/app/server".into()]),
                                ..Default::default()
                            },
                            Container {
                                name: "sidecar".into(),
                                image: Some("registry.example.com/proxy:1".into()),
                                ..Default::default()
                            },
                        ],
                        ..Default::default()
                    }),
                },
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn copies_template_and_overrides_first_container() {
        let job = build_job(&deployment(), "team-a", "migrate", "./migrate up").unwrap();

        assert_eq!(job.metadata.name.as_deref(), Some("migrate"));
        assert_eq!(job.metadata.namespace.as_deref(), Some("team-a"));
        assert_eq!(
            job.metadata.labels.unwrap().get(MANAGED_BY_LABEL).map(String::as_str),
            Some(MANAGED_BY_VALUE)
        );

        let template = job.spec.unwrap().template;
        let labels = template.metadata.unwrap().labels.unwrap();
        assert_eq!(labels.get("app").map(String::as_str), Some("api"));
        assert_eq!(labels.get(MANAGED_BY_LABEL).map(String::as_str), Some(MANAGED_BY_VALUE));

        let pod = template.spec.unwrap();
        assert_eq!(pod.restart_policy.as_deref(), Some("Never"));

        let first = &pod.containers[0];
        assert_eq!(first.image.as_deref(), Some("registry.example.com/api:1.2"));
        assert_eq!(
            first.command.as_deref(),
            Some(&["/bin/sh".to_string(), "-c".to_string()][..])
        );
        assert_eq!(first.args.as_deref(), Some(&["./migrate up".to_string()][..]));

        let sidecar = &pod.containers[1];
        assert!(sidecar.command.is_none());
        assert!(sidecar.args.is_none());
    }

    #[test]
    fn deployment_without_pod_spec_is_rejected() {
        let mut d = deployment();
        d.spec.as_mut().unwrap().template.spec = None;

        let err = build_job(&d, "team-a", "migrate", "true").unwrap_err();
        assert!(matches!(
            err,
            JobTemplateError::MissingPodTemplate { ref name, .. } if name == "api"
        ));

        d.spec = None;
        assert!(build_job(&d, "team-a", "migrate", "true").is_err());
    }
}
