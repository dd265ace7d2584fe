use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobTemplateError {
    #[error("Deployment {namespace}/{name} has no pod template to copy")]
    MissingPodTemplate { namespace: String, name: String },
}
