use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use tokio::task;

use super::gateway::SUBMISSION_PATH;
use super::payload::{SubmissionPayload, SubmissionResponse};
use super::registration::RegistrationCode;
use super::repository::{RegistrationRepository, RegistrationStatusView};
use super::service::RegistrationService;
use crate::error::AppError;

/// Router builder exposing the registration endpoints.
///
/// Storage calls block on SQLite, so handlers run them on the blocking pool.
pub fn registration_router<R>(service: Arc<RegistrationService<R>>) -> Router
where
    R: RegistrationRepository + 'static,
{
    Router::new()
        .route(SUBMISSION_PATH, post(submit_handler::<R>))
        .route("/api/applications/:reg_no", get(lookup_handler::<R>))
        .with_state(service)
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<RegistrationService<R>>>,
    payload: Result<Json<SubmissionPayload>, JsonRejection>,
) -> Result<Json<SubmissionResponse>, AppError>
where
    R: RegistrationRepository + 'static,
{
    let Json(payload) = payload?;
    let record = task::spawn_blocking(move || service.register(payload)).await??;
    Ok(Json(SubmissionResponse::accepted(&record.reg_no)))
}

pub(crate) async fn lookup_handler<R>(
    State(service): State<Arc<RegistrationService<R>>>,
    Path(reg_no): Path<String>,
) -> Result<Json<RegistrationStatusView>, AppError>
where
    R: RegistrationRepository + 'static,
{
    let code = RegistrationCode::parse(&reg_no)?;
    let record = task::spawn_blocking(move || service.lookup(&code)).await??;
    Ok(Json(record.status_view()))
}
