use std::collections::{HashMap, VecDeque};
use std::future::{self, Future};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Value};

use crate::applications::catalog::{Branch, InterestArea, Residence, Vertical, YearOfStudy};
use crate::applications::draft::{FieldUpdate, SetMember};
use crate::applications::gateway::{GatewayError, SubmissionGateway};
use crate::applications::payload::SubmissionPayload;
use crate::applications::registration::RegistrationCode;
use crate::applications::repository::{
    RegistrationRecord, RegistrationRepository, RepositoryError,
};
use crate::applications::service::RegistrationService;
use crate::applications::wizard::ApplicationWizard;
use crate::applications::WizardStep;
use crate::config::RegistrationConfig;

pub(super) const MOTIVATION: &str =
    "I want to help Team Arion design, build and race a faster car.";

pub(super) fn code(raw: &str) -> RegistrationCode {
    RegistrationCode::parse(raw).expect("valid registration code")
}

pub(super) fn payload_json() -> Value {
    json!({
        "fullName": "Asha Rao",
        "email": "asha@example.com",
        "usn": "1NT24AR069",
        "phone": "+91 98765 43210",
        "branch": "Aeronautical Engineering",
        "year": "2nd Year",
        "interest": MOTIVATION,
        "verticals": ["Engineering", "Social Media"],
        "questionTypes": ["Aerodynamics", "Thermal Engineering"],
        "residence": "Hostelite(in campus)",
        "experience": "Built a quadcopter in school.",
        "links": "https://github.com/asha",
        "consentGDPR": true,
        "consentTerms": true
    })
}

pub(super) fn payload() -> SubmissionPayload {
    serde_json::from_value(payload_json()).expect("fixture payload parses")
}

pub(super) fn incomplete_payload() -> SubmissionPayload {
    let mut payload = payload();
    payload.consent_terms = false;
    payload
}

pub(super) fn fill_basic_info<G: SubmissionGateway>(wizard: &mut ApplicationWizard<G>) {
    for update in [
        FieldUpdate::FullName("Asha Rao".to_string()),
        FieldUpdate::Email("asha@example.com".to_string()),
        FieldUpdate::Usn("1NT24AR069".to_string()),
        FieldUpdate::Phone("+91 98765 43210".to_string()),
        FieldUpdate::Branch(Some(Branch::Aeronautical)),
        FieldUpdate::Year(Some(YearOfStudy::Second)),
    ] {
        wizard.update(update).expect("draft editable");
    }
}

/// Fills every page and walks the wizard to the confirmation page.
pub(super) fn reach_confirm<G: SubmissionGateway>(wizard: &mut ApplicationWizard<G>) {
    fill_basic_info(wizard);
    wizard.advance().expect("basic info complete");

    wizard
        .update(FieldUpdate::Motivation(MOTIVATION.to_string()))
        .expect("draft editable");
    wizard
        .toggle(SetMember::Vertical(Vertical::Engineering))
        .expect("draft editable");
    wizard.advance().expect("motivation complete");

    wizard
        .toggle(SetMember::InterestArea(InterestArea::Aerodynamics))
        .expect("draft editable");
    wizard
        .update(FieldUpdate::InterestOther("Race strategy".to_string()))
        .expect("draft editable");
    wizard.advance().expect("interests complete");

    wizard
        .update(FieldUpdate::Residence(Some(Residence::DayScholar)))
        .expect("draft editable");
    wizard.advance().expect("background complete");

    wizard
        .update(FieldUpdate::ConsentGdpr(true))
        .expect("draft editable");
    wizard
        .update(FieldUpdate::ConsentTerms(true))
        .expect("draft editable");

    assert_eq!(wizard.current_step(), WizardStep::Confirm);
}

pub(super) fn registration_config() -> RegistrationConfig {
    RegistrationConfig {
        prefix: "AR25".to_string(),
        max_attempts: 3,
    }
}

pub(super) fn service_with<R>(repository: Arc<R>, seed: u64) -> RegistrationService<R>
where
    R: RegistrationRepository + 'static,
{
    RegistrationService::with_rng(
        repository,
        registration_config(),
        StdRng::seed_from_u64(seed),
    )
}

pub(super) fn build_service() -> (RegistrationService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    (service_with(repository.clone(), 42), repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<RegistrationCode, RegistrationRecord>>>,
}

impl MemoryRepository {
    pub(super) fn records(&self) -> Vec<RegistrationRecord> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .values()
            .cloned()
            .collect()
    }
}

impl RegistrationRepository for MemoryRepository {
    fn insert(&self, record: RegistrationRecord) -> Result<RegistrationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.reg_no) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.reg_no.clone(), record.clone());
        Ok(record)
    }

    fn fetch(
        &self,
        reg_no: &RegistrationCode,
    ) -> Result<Option<RegistrationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(reg_no).cloned())
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.records.lock().expect("repository mutex poisoned").len())
    }
}

/// Reports a collision for the first `conflicts` inserts, then stores normally.
#[derive(Default)]
pub(super) struct CollidingRepository {
    pub(super) conflicts: usize,
    pub(super) attempts: AtomicUsize,
    pub(super) inner: MemoryRepository,
}

impl CollidingRepository {
    pub(super) fn new(conflicts: usize) -> Self {
        Self {
            conflicts,
            ..Self::default()
        }
    }

    pub(super) fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl RegistrationRepository for CollidingRepository {
    fn insert(&self, record: RegistrationRecord) -> Result<RegistrationRecord, RepositoryError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.conflicts {
            return Err(RepositoryError::Conflict);
        }
        self.inner.insert(record)
    }

    fn fetch(
        &self,
        reg_no: &RegistrationCode,
    ) -> Result<Option<RegistrationRecord>, RepositoryError> {
        self.inner.fetch(reg_no)
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        self.inner.count()
    }
}

pub(super) struct UnavailableRepository;

impl RegistrationRepository for UnavailableRepository {
    fn insert(&self, _record: RegistrationRecord) -> Result<RegistrationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(
        &self,
        _reg_no: &RegistrationCode,
    ) -> Result<Option<RegistrationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Gateway double answering from a queue and recording every payload it receives.
#[derive(Default)]
pub(super) struct ScriptedGateway {
    responses: Mutex<VecDeque<Result<RegistrationCode, GatewayError>>>,
    received: Mutex<Vec<SubmissionPayload>>,
}

impl ScriptedGateway {
    pub(super) fn answering(
        responses: impl IntoIterator<Item = Result<RegistrationCode, GatewayError>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().collect()),
            received: Mutex::new(Vec::new()),
        })
    }

    pub(super) fn calls(&self) -> usize {
        self.received.lock().expect("gateway mutex poisoned").len()
    }

    pub(super) fn received(&self) -> Vec<SubmissionPayload> {
        self.received.lock().expect("gateway mutex poisoned").clone()
    }
}

impl SubmissionGateway for ScriptedGateway {
    fn submit(
        &self,
        payload: &SubmissionPayload,
    ) -> impl Future<Output = Result<RegistrationCode, GatewayError>> + Send {
        self.received
            .lock()
            .expect("gateway mutex poisoned")
            .push(payload.clone());
        let next = self
            .responses
            .lock()
            .expect("gateway mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Transport("no scripted response".to_string())));
        future::ready(next)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
