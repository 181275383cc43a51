use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::intake::{MemberForm, ProjectForm};
use super::roster::{RosterError, RosterRepository};
use super::service::{DelegationService, DelegationServiceError};

/// Router builder exposing roster management and assignment endpoints.
pub fn delegation_router<R>(service: Arc<DelegationService<R>>) -> Router
where
    R: RosterRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/members",
            get(members_handler::<R>).post(add_member_handler::<R>),
        )
        .route(
            "/api/v1/assignments/evaluate",
            post(evaluate_handler::<R>),
        )
        .route("/api/v1/assignments/preview", post(preview_handler::<R>))
        .route("/api/v1/assignments/tasks", post(assign_handler::<R>))
        .route("/api/v1/assignments/last", get(last_decision_handler::<R>))
        .route(
            "/api/v1/assignments/last/commit",
            post(commit_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn members_handler<R>(State(service): State<Arc<DelegationService<R>>>) -> Response
where
    R: RosterRepository + 'static,
{
    match service.members() {
        Ok(members) => (StatusCode::OK, axum::Json(members)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn add_member_handler<R>(
    State(service): State<Arc<DelegationService<R>>>,
    axum::Json(form): axum::Json<MemberForm>,
) -> Response
where
    R: RosterRepository + 'static,
{
    match service.add_member(form) {
        Ok(member) => (StatusCode::CREATED, axum::Json(member)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn evaluate_handler<R>(
    State(service): State<Arc<DelegationService<R>>>,
    axum::Json(form): axum::Json<ProjectForm>,
) -> Response
where
    R: RosterRepository + 'static,
{
    match service.evaluate(form) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn preview_handler<R>(
    State(service): State<Arc<DelegationService<R>>>,
    axum::Json(form): axum::Json<ProjectForm>,
) -> Response
where
    R: RosterRepository + 'static,
{
    match service.preview(form) {
        Ok(insights) => (StatusCode::OK, axum::Json(insights)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn assign_handler<R>(
    State(service): State<Arc<DelegationService<R>>>,
    axum::Json(forms): axum::Json<Vec<ProjectForm>>,
) -> Response
where
    R: RosterRepository + 'static,
{
    match service.assign(forms) {
        Ok(plan) => (StatusCode::OK, axum::Json(plan)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn last_decision_handler<R>(
    State(service): State<Arc<DelegationService<R>>>,
) -> Response
where
    R: RosterRepository + 'static,
{
    match service.last_decision() {
        Ok(Some(record)) => (StatusCode::OK, axum::Json(record)).into_response(),
        Ok(None) => {
            let payload = json!({ "error": "no decision has been evaluated yet" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn commit_handler<R>(State(service): State<Arc<DelegationService<R>>>) -> Response
where
    R: RosterRepository + 'static,
{
    match service.commit_last_decision() {
        Ok(members) => (StatusCode::OK, axum::Json(members)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: DelegationServiceError) -> Response {
    let status = match &error {
        DelegationServiceError::Intake(_)
        | DelegationServiceError::EmptyRoster
        | DelegationServiceError::DuplicateTask(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DelegationServiceError::Roster(RosterError::Conflict(_))
        | DelegationServiceError::Roster(RosterError::AlreadyCommitted)
        | DelegationServiceError::Roster(RosterError::UnknownMember(_))
        | DelegationServiceError::AlreadyCommitted
        | DelegationServiceError::UnknownMember(_) => StatusCode::CONFLICT,
        DelegationServiceError::Roster(RosterError::NoDecision)
        | DelegationServiceError::NoDecision => StatusCode::NOT_FOUND,
        DelegationServiceError::Roster(RosterError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
