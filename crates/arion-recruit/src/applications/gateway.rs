use std::future::Future;
use std::time::Duration;

use tracing::debug;

use super::payload::{SubmissionPayload, SubmissionResponse};
use super::registration::RegistrationCode;

/// Path of the submission endpoint, relative to the service root.
pub const SUBMISSION_PATH: &str = "/api/applications";
pub const DEFAULT_SUBMISSION_TIMEOUT: Duration = Duration::from_secs(15);

/// Persists a finished application and issues its registration number.
pub trait SubmissionGateway: Send + Sync {
    fn submit(
        &self,
        payload: &SubmissionPayload,
    ) -> impl Future<Output = Result<RegistrationCode, GatewayError>> + Send;
}

/// Failure reported by a gateway. The wizard treats every variant the same way.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("submission endpoint unreachable: {0}")]
    Transport(String),
    #[error("submission endpoint responded with HTTP {0}")]
    Status(u16),
    #[error("submission rejected: {0}")]
    Rejected(String),
    #[error("submission endpoint sent an unreadable response: {0}")]
    InvalidResponse(String),
}

/// Gateway posting JSON to a remote recruitment service.
#[derive(Debug, Clone)]
pub struct HttpSubmissionGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSubmissionGateway {
    pub fn new(base_url: &str) -> Result<Self, GatewayError> {
        Self::with_timeout(base_url, DEFAULT_SUBMISSION_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| GatewayError::Transport(err.to_string()))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}{SUBMISSION_PATH}", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl SubmissionGateway for HttpSubmissionGateway {
    fn submit(
        &self,
        payload: &SubmissionPayload,
    ) -> impl Future<Output = Result<RegistrationCode, GatewayError>> + Send {
        let request = self.client.post(&self.endpoint).json(payload);
        let endpoint = self.endpoint.clone();

        async move {
            let response = request
                .send()
                .await
                .map_err(|err| GatewayError::Transport(err.to_string()))?;

            let status = response.status();
            debug!(%endpoint, status = status.as_u16(), "submission endpoint responded");
            if !status.is_success() {
                return Err(GatewayError::Status(status.as_u16()));
            }

            let body: SubmissionResponse = response
                .json()
                .await
                .map_err(|err| GatewayError::InvalidResponse(err.to_string()))?;
            body.into_code()
        }
    }
}
