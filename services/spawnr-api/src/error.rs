use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // Error for invalid user input (400)
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Invalid request body: {0}")]
    JsonRejection(#[from] JsonRejection),
    // Error for well-formed but invalid input (422)
    #[error("Validation errors, {0}")]
    ValidatorValidationErrors(#[from] validator::ValidationErrors),
    #[error("{0}")]
    NotFoundError(String),
    #[error("{0}")]
    Conflict(String),

    // Kubernetes API status passed through as-is
    #[error("{message}")]
    KubeApi { code: u16, message: String },

    // The identity provider or its CLI misbehaved (502)
    #[error("{0}")]
    BadGateway(String),
    #[error("{0}")]
    GatewayTimeout(String),
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::JsonRejection(e) => (StatusCode::BAD_REQUEST, e.body_text()),
            Self::ValidatorValidationErrors(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            Self::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Self::KubeApi { code, message } => {
                let status = StatusCode::from_u16(code)
                    .ok()
                    .filter(StatusCode::is_client_error)
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, message)
            }
            Self::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            Self::GatewayTimeout(msg) => (StatusCode::GATEWAY_TIMEOUT, msg),
            Self::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({"error": msg}));

        (status, body).into_response()
    }
}
