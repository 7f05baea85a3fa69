use std::future::{self, Future};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Local, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use super::gateway::{GatewayError, SubmissionGateway};
use super::payload::{PayloadError, SubmissionPayload};
use super::registration::RegistrationCode;
use super::repository::{RegistrationRecord, RegistrationRepository, RepositoryError};
use crate::config::RegistrationConfig;

/// Server side of the submission contract: validates, numbers and stores applications.
pub struct RegistrationService<R> {
    repository: Arc<R>,
    config: RegistrationConfig,
    rng: Mutex<StdRng>,
}

impl<R> RegistrationService<R>
where
    R: RegistrationRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: RegistrationConfig) -> Self {
        Self::with_rng(repository, config, StdRng::from_entropy())
    }

    pub fn with_rng(repository: Arc<R>, config: RegistrationConfig, rng: StdRng) -> Self {
        Self {
            repository,
            config,
            rng: Mutex::new(rng),
        }
    }

    /// Register an application submitted now.
    pub fn register(
        &self,
        payload: SubmissionPayload,
    ) -> Result<RegistrationRecord, RegistrationServiceError> {
        self.register_at(payload, Utc::now())
    }

    /// Register an application, dating the registration number by the server's local calendar.
    pub fn register_at(
        &self,
        payload: SubmissionPayload,
        submitted_at: DateTime<Utc>,
    ) -> Result<RegistrationRecord, RegistrationServiceError> {
        let applicant = payload.validate()?;
        let date = submitted_at.with_timezone(&Local).date_naive();
        let attempts = self.config.max_attempts.max(1);

        for attempt in 1..=attempts {
            let reg_no = self.next_code(date);
            let record = RegistrationRecord::new(reg_no, applicant.clone(), submitted_at);

            match self.repository.insert(record) {
                Ok(stored) => {
                    info!(reg_no = %stored.reg_no, attempt, "application registered");
                    return Ok(stored);
                }
                Err(RepositoryError::Conflict) => {
                    warn!(attempt, "registration number collision, drawing another");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(RegistrationServiceError::CodesExhausted { attempts })
    }

    /// Fetch a stored application by registration number.
    pub fn lookup(
        &self,
        reg_no: &RegistrationCode,
    ) -> Result<RegistrationRecord, RegistrationServiceError> {
        self.repository
            .fetch(reg_no)?
            .ok_or_else(|| RegistrationServiceError::NotFound(reg_no.clone()))
    }

    fn next_code(&self, date: NaiveDate) -> RegistrationCode {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        RegistrationCode::generate(&self.config.prefix, date, &mut *rng)
    }
}

impl<R> SubmissionGateway for RegistrationService<R>
where
    R: RegistrationRepository + 'static,
{
    fn submit(
        &self,
        payload: &SubmissionPayload,
    ) -> impl Future<Output = Result<RegistrationCode, GatewayError>> + Send {
        let outcome = self
            .register(payload.clone())
            .map(|record| record.reg_no)
            .map_err(|err| GatewayError::Rejected(err.to_string()));
        future::ready(outcome)
    }
}

/// Error raised by the registration service.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationServiceError {
    #[error(transparent)]
    Invalid(#[from] PayloadError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("no free registration number after {attempts} attempts")]
    CodesExhausted { attempts: u8 },
    #[error("no application registered as {0}")]
    NotFound(RegistrationCode),
}
