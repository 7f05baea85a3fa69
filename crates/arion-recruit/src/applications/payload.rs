use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::catalog::{Branch, Residence, Vertical, YearOfStudy};
use super::draft::{merge_free_text, ApplicationDraft};
use super::gateway::GatewayError;
use super::registration::RegistrationCode;
use super::steps::{first_invalid_step, ApplicationAnswers, WizardStep};

/// Body of `POST /api/applications`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    pub usn: String,
    pub phone: String,
    #[serde(default)]
    pub branch: Option<Branch>,
    #[serde(default)]
    pub year: Option<YearOfStudy>,
    #[serde(rename = "interest", alias = "motivation")]
    pub motivation: String,
    #[serde(default)]
    pub verticals: BTreeSet<Vertical>,
    #[serde(default)]
    pub question_types: Vec<String>,
    /// Accepted from clients that send the free-text interest separately.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub question_type_other: String,
    #[serde(default)]
    pub residence: Option<Residence>,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub links: String,
    #[serde(rename = "consentGDPR", default)]
    pub consent_gdpr: bool,
    #[serde(default)]
    pub consent_terms: bool,
}

impl SubmissionPayload {
    /// Snapshot of the draft with the "other" interest folded into `question_types`.
    pub fn from_draft(draft: &ApplicationDraft) -> Self {
        Self {
            full_name: draft.full_name.clone(),
            email: draft.email.clone(),
            usn: draft.usn.clone(),
            phone: draft.phone.clone(),
            branch: draft.branch,
            year: draft.year,
            motivation: draft.motivation.clone(),
            verticals: draft.verticals.clone(),
            question_types: draft.interest_areas_for_submission(),
            question_type_other: String::new(),
            residence: draft.residence,
            experience: draft.experience.clone(),
            links: draft.links.clone(),
            consent_gdpr: draft.consent_gdpr,
            consent_terms: draft.consent_terms,
        }
    }

    /// Folds `question_type_other` into `question_types` and drops blank or repeated entries.
    pub fn normalized(mut self) -> Self {
        let mut merged = Vec::with_capacity(self.question_types.len() + 1);
        for entry in self.question_types.drain(..) {
            merge_free_text(&mut merged, &entry);
        }
        merge_free_text(&mut merged, &self.question_type_other);
        self.question_types = merged;
        self.question_type_other.clear();
        self
    }

    /// Checks every step gate and returns the applicant with all required choices resolved.
    pub fn validate(self) -> Result<Applicant, PayloadError> {
        let payload = self.normalized();
        if let Some(step) = first_invalid_step(&payload) {
            return Err(PayloadError::Incomplete(step));
        }

        let incomplete = |step| PayloadError::Incomplete(step);
        Ok(Applicant {
            branch: payload.branch.ok_or(incomplete(WizardStep::BasicInfo))?,
            year: payload.year.ok_or(incomplete(WizardStep::BasicInfo))?,
            residence: payload
                .residence
                .ok_or(incomplete(WizardStep::Background))?,
            full_name: payload.full_name.trim().to_string(),
            email: payload.email.trim().to_string(),
            usn: payload.usn.trim().to_string(),
            phone: payload.phone.trim().to_string(),
            motivation: payload.motivation.trim().to_string(),
            verticals: payload.verticals,
            question_types: payload.question_types,
            experience: payload.experience,
            links: payload.links,
            consent_gdpr: payload.consent_gdpr,
            consent_terms: payload.consent_terms,
        })
    }
}

impl ApplicationAnswers for SubmissionPayload {
    fn full_name(&self) -> &str {
        &self.full_name
    }

    fn usn(&self) -> &str {
        &self.usn
    }

    fn phone(&self) -> &str {
        &self.phone
    }

    fn has_branch(&self) -> bool {
        self.branch.is_some()
    }

    fn has_year(&self) -> bool {
        self.year.is_some()
    }

    fn motivation(&self) -> &str {
        &self.motivation
    }

    fn vertical_count(&self) -> usize {
        self.verticals.len()
    }

    fn has_interest_area(&self) -> bool {
        self.question_types
            .iter()
            .any(|entry| !entry.trim().is_empty())
    }

    fn interest_other(&self) -> &str {
        &self.question_type_other
    }

    fn has_residence(&self) -> bool {
        self.residence.is_some()
    }

    fn consent_gdpr(&self) -> bool {
        self.consent_gdpr
    }

    fn consent_terms(&self) -> bool {
        self.consent_terms
    }
}

/// Payload that passed every step gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    pub full_name: String,
    pub email: String,
    pub usn: String,
    pub phone: String,
    pub branch: Branch,
    pub year: YearOfStudy,
    pub motivation: String,
    pub verticals: BTreeSet<Vertical>,
    pub question_types: Vec<String>,
    pub residence: Residence,
    pub experience: String,
    pub links: String,
    pub consent_gdpr: bool,
    pub consent_terms: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("application is incomplete: {} requirements are not met", .0.title())]
    Incomplete(WizardStep),
}

/// Envelope returned by the submission endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reg_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmissionResponse {
    pub fn accepted(code: &RegistrationCode) -> Self {
        Self {
            success: true,
            reg_no: Some(code.to_string()),
            error: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            reg_no: None,
            error: Some(message.into()),
        }
    }

    pub fn into_code(self) -> Result<RegistrationCode, GatewayError> {
        match (self.success, self.reg_no) {
            (true, Some(raw)) => RegistrationCode::parse(&raw)
                .map_err(|err| GatewayError::InvalidResponse(err.to_string())),
            (true, None) => Err(GatewayError::InvalidResponse(
                "success response without regNo".to_string(),
            )),
            (false, _) => Err(GatewayError::Rejected(
                self.error.unwrap_or_else(|| "unspecified error".to_string()),
            )),
        }
    }
}
