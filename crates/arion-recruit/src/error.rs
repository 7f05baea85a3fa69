use crate::applications::{
    GatewayError, InvalidRegistrationCode, RegistrationServiceError, RepositoryError,
    SubmissionResponse,
};
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::fmt;
use tokio::task::JoinError;
use tracing::{error, warn};

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Storage(RepositoryError),
    Gateway(GatewayError),
    MalformedPayload(JsonRejection),
    UnknownRegistration(InvalidRegistrationCode),
    Registration(RegistrationServiceError),
    Worker(JoinError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Storage(err) => write!(f, "storage error: {}", err),
            AppError::Gateway(err) => write!(f, "submission error: {}", err),
            AppError::MalformedPayload(err) => write!(f, "malformed payload: {}", err),
            AppError::UnknownRegistration(err) => write!(f, "unknown registration: {}", err),
            AppError::Registration(err) => write!(f, "registration error: {}", err),
            AppError::Worker(err) => write!(f, "blocking task failed: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Storage(err) => Some(err),
            AppError::Gateway(err) => Some(err),
            AppError::MalformedPayload(err) => Some(err),
            AppError::UnknownRegistration(err) => Some(err),
            AppError::Registration(err) => Some(err),
            AppError::Worker(err) => Some(err),
        }
    }
}

/// Client mistakes keep their message; anything else is logged and answered with a bare
/// `"Server error"` so storage details never reach the applicant.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::MalformedPayload(rejection) => {
                (StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text())
            }
            AppError::Registration(RegistrationServiceError::Invalid(err)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
            AppError::Registration(err @ RegistrationServiceError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            AppError::UnknownRegistration(InvalidRegistrationCode(raw)) => (
                StatusCode::NOT_FOUND,
                format!("no application registered as {raw}"),
            ),
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Storage(_)
            | AppError::Gateway(_)
            | AppError::Registration(_)
            | AppError::Worker(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string()),
        };

        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(error = %self, "request rejected");
        }

        (status, Json(SubmissionResponse::rejected(message))).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<RepositoryError> for AppError {
    fn from(value: RepositoryError) -> Self {
        Self::Storage(value)
    }
}

impl From<GatewayError> for AppError {
    fn from(value: GatewayError) -> Self {
        Self::Gateway(value)
    }
}

impl From<JsonRejection> for AppError {
    fn from(value: JsonRejection) -> Self {
        Self::MalformedPayload(value)
    }
}

impl From<InvalidRegistrationCode> for AppError {
    fn from(value: InvalidRegistrationCode) -> Self {
        Self::UnknownRegistration(value)
    }
}

impl From<RegistrationServiceError> for AppError {
    fn from(value: RegistrationServiceError) -> Self {
        Self::Registration(value)
    }
}

impl From<JoinError> for AppError {
    fn from(value: JoinError) -> Self {
        Self::Worker(value)
    }
}
