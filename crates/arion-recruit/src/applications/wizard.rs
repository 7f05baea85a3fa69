//! Applicant-facing form controller.
//!
//! [`ApplicationWizard`] owns the draft for one form session. Every edit and every move
//! between pages goes through it, and the page gates are re-evaluated from the current
//! answers on each call, so revisiting a page and breaking an answer blocks progress again.

use std::sync::Arc;

use tracing::{info, warn};

use super::draft::{ApplicationDraft, FieldUpdate, SetMember};
use super::gateway::SubmissionGateway;
use super::payload::SubmissionPayload;
use super::registration::RegistrationCode;
use super::steps::{first_invalid_step, is_step_valid, WizardStep};

/// Observable state of the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardState {
    Step(WizardStep),
    Submitting,
    Submitted(RegistrationCode),
    /// Last attempt failed; the wizard is back on the final page and may retry.
    SubmitFailed(String),
}

/// Operation refused because its precondition does not hold. State is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("application already submitted as {0}")]
    Locked(RegistrationCode),
    #[error("'{}' is incomplete", .0.title())]
    StepIncomplete(WizardStep),
    #[error("'{}' has not been reached yet, the wizard is on '{}'", .target.title(), .current.title())]
    StepNotReached {
        target: WizardStep,
        current: WizardStep,
    },
    #[error("submission is only possible from '{}'", WizardStep::LAST.title())]
    NotOnFinalStep(WizardStep),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Submission {
    Idle,
    InFlight,
    Failed(String),
    Accepted(RegistrationCode),
}

/// One labelled answer on the confirmation page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewEntry {
    pub label: &'static str,
    pub value: String,
}

pub struct ApplicationWizard<G> {
    gateway: Arc<G>,
    draft: ApplicationDraft,
    step: WizardStep,
    submission: Submission,
}

impl<G> ApplicationWizard<G>
where
    G: SubmissionGateway,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self::with_draft(gateway, ApplicationDraft::default())
    }

    /// Starts on the first page with answers already filled in.
    pub fn with_draft(gateway: Arc<G>, draft: ApplicationDraft) -> Self {
        Self {
            gateway,
            draft,
            step: WizardStep::FIRST,
            submission: Submission::Idle,
        }
    }

    pub fn state(&self) -> WizardState {
        match &self.submission {
            Submission::Idle => WizardState::Step(self.step),
            Submission::InFlight => WizardState::Submitting,
            Submission::Failed(reason) => WizardState::SubmitFailed(reason.clone()),
            Submission::Accepted(code) => WizardState::Submitted(code.clone()),
        }
    }

    pub fn draft(&self) -> &ApplicationDraft {
        &self.draft
    }

    pub fn current_step(&self) -> WizardStep {
        self.step
    }

    pub fn registration_code(&self) -> Option<&RegistrationCode> {
        match &self.submission {
            Submission::Accepted(code) => Some(code),
            _ => None,
        }
    }

    pub fn is_step_valid(&self, step: WizardStep) -> bool {
        is_step_valid(&self.draft, step)
    }

    pub fn is_current_step_valid(&self) -> bool {
        self.is_step_valid(self.step)
    }

    /// Position of the current page between the first (0.0) and the last (1.0).
    pub fn progress(&self) -> f32 {
        if matches!(self.submission, Submission::Accepted(_)) {
            return 1.0;
        }
        self.step.index() as f32 / WizardStep::LAST.index() as f32
    }

    pub fn update(&mut self, update: FieldUpdate) -> Result<(), WizardError> {
        self.ensure_editable()?;
        self.draft.apply(update);
        self.settle();
        Ok(())
    }

    /// Flips membership of a set-valued answer; returns whether it is now selected.
    pub fn toggle(&mut self, member: SetMember) -> Result<bool, WizardError> {
        self.ensure_editable()?;
        let selected = self.draft.toggle(member);
        self.settle();
        Ok(selected)
    }

    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        self.ensure_editable()?;
        if !self.is_current_step_valid() {
            return Err(WizardError::StepIncomplete(self.step));
        }
        self.step = self.step.next();
        self.settle();
        Ok(self.step)
    }

    pub fn retreat(&mut self) -> Result<WizardStep, WizardError> {
        self.ensure_editable()?;
        self.step = self.step.previous();
        self.settle();
        Ok(self.step)
    }

    /// Jumps back to an earlier (or the current) page; pages ahead stay gated by `advance`.
    pub fn jump_to(&mut self, target: WizardStep) -> Result<WizardStep, WizardError> {
        self.ensure_editable()?;
        if target > self.step {
            return Err(WizardError::StepNotReached {
                target,
                current: self.step,
            });
        }
        self.step = target;
        self.settle();
        Ok(self.step)
    }

    /// Hands the draft to the gateway.
    ///
    /// Gateway failures are not errors here: they leave the wizard in
    /// [`WizardState::SubmitFailed`] and a later call retries.
    pub async fn submit(&mut self) -> Result<WizardState, WizardError> {
        self.ensure_editable()?;
        if !self.step.is_last() {
            return Err(WizardError::NotOnFinalStep(self.step));
        }
        if let Some(step) = first_invalid_step(&self.draft) {
            return Err(WizardError::StepIncomplete(step));
        }

        let payload = SubmissionPayload::from_draft(&self.draft);
        self.submission = Submission::InFlight;

        self.submission = match self.gateway.submit(&payload).await {
            Ok(code) => {
                info!(reg_no = %code, "application submitted");
                Submission::Accepted(code)
            }
            Err(err) => {
                warn!(error = %err, "application submission failed");
                Submission::Failed(err.to_string())
            }
        };

        Ok(self.state())
    }

    /// Answers as shown on the confirmation page.
    pub fn review(&self) -> Vec<ReviewEntry> {
        let draft = &self.draft;
        let choice = |value: Option<&'static str>| value.unwrap_or("Not selected").to_string();
        let optional = |value: &str| {
            let value = value.trim();
            if value.is_empty() {
                "Not provided".to_string()
            } else {
                value.to_string()
            }
        };
        let verticals = draft
            .verticals
            .iter()
            .map(|vertical| vertical.label())
            .collect::<Vec<_>>()
            .join(", ");

        vec![
            entry("Full Name", optional(&draft.full_name)),
            entry("Email", optional(&draft.email)),
            entry("USN", optional(&draft.usn)),
            entry("Phone", optional(&draft.phone)),
            entry("Branch", choice(draft.branch.map(|branch| branch.label()))),
            entry("Year", choice(draft.year.map(|year| year.label()))),
            entry("Verticals", optional(&verticals)),
            entry(
                "Interest Areas",
                optional(&draft.interest_areas_for_submission().join(", ")),
            ),
            entry(
                "Residence",
                choice(draft.residence.map(|residence| residence.label())),
            ),
            entry("Experience", optional(&draft.experience)),
            entry(
                "Resume",
                draft
                    .resume
                    .as_ref()
                    .map(|resume| resume.file_name.clone())
                    .unwrap_or_else(|| "Not provided".to_string()),
            ),
            entry("Links", optional(&draft.links)),
        ]
    }

    fn ensure_editable(&self) -> Result<(), WizardError> {
        match &self.submission {
            Submission::Accepted(code) => Err(WizardError::Locked(code.clone())),
            _ => Ok(()),
        }
    }

    /// An accepted operation dismisses the failure notice of a previous attempt.
    ///
    /// A submit future dropped before the gateway answered also lands here as `InFlight`.
    /// The gateway may already have stored that application, so submitting again can register
    /// it a second time under a new number. Callers are expected to drive `submit` to
    /// completion; the HTTP gateway bounds the wait with its request timeout.
    fn settle(&mut self) {
        if matches!(self.submission, Submission::Failed(_) | Submission::InFlight) {
            self.submission = Submission::Idle;
        }
    }
}

fn entry(label: &'static str, value: String) -> ReviewEntry {
    ReviewEntry { label, value }
}
