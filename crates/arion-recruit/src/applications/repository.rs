use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::payload::Applicant;
use super::registration::RegistrationCode;

/// Persisted application together with its issued registration number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRecord {
    pub reg_no: RegistrationCode,
    #[serde(flatten)]
    pub applicant: Applicant,
    /// Upload is not wired yet, so this stays empty.
    pub resume_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl RegistrationRecord {
    pub fn new(reg_no: RegistrationCode, applicant: Applicant, created_at: DateTime<Utc>) -> Self {
        Self {
            reg_no,
            applicant,
            resume_url: None,
            created_at,
        }
    }

    pub fn status_view(&self) -> RegistrationStatusView {
        RegistrationStatusView {
            success: true,
            reg_no: self.reg_no.clone(),
            submitted_at: self.created_at,
        }
    }
}

/// Public confirmation of a stored application; carries no personal details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationStatusView {
    pub success: bool,
    pub reg_no: RegistrationCode,
    pub submitted_at: DateTime<Utc>,
}

/// Storage abstraction so the service can run against SQLite or a test double.
pub trait RegistrationRepository: Send + Sync {
    /// Stores the record atomically; `Conflict` when the registration number is taken.
    fn insert(&self, record: RegistrationRecord) -> Result<RegistrationRecord, RepositoryError>;
    fn fetch(&self, reg_no: &RegistrationCode)
        -> Result<Option<RegistrationRecord>, RepositoryError>;
    fn count(&self) -> Result<usize, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("registration number already issued")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("stored record is unreadable: {0}")]
    Corrupt(String),
}
