//! Recruitment application intake: the applicant wizard on one side of the submission
//! contract, registration numbering and storage on the other.

pub mod catalog;
pub mod draft;
pub mod gateway;
pub mod payload;
pub mod registration;
pub mod repository;
pub mod router;
pub mod service;
pub mod sqlite;
pub mod steps;
pub mod wizard;

#[cfg(test)]
mod tests;

pub use catalog::{Branch, InterestArea, Residence, UnknownOption, Vertical, YearOfStudy};
pub use draft::{ApplicationDraft, FieldUpdate, ResumeAttachment, SetMember};
pub use gateway::{GatewayError, HttpSubmissionGateway, SubmissionGateway, SUBMISSION_PATH};
pub use payload::{Applicant, PayloadError, SubmissionPayload, SubmissionResponse};
pub use registration::{InvalidRegistrationCode, RegistrationCode, DEFAULT_REGISTRATION_PREFIX};
pub use repository::{
    RegistrationRecord, RegistrationRepository, RegistrationStatusView, RepositoryError,
};
pub use router::registration_router;
pub use service::{RegistrationService, RegistrationServiceError};
pub use sqlite::SqliteRegistrationRepository;
pub use steps::{first_invalid_step, is_step_valid, ApplicationAnswers, WizardStep};
pub use wizard::{ApplicationWizard, ReviewEntry, WizardError, WizardState};
