use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::documents::UploadedDocument;
use super::leads::{process_leads, LeadRecord};
use super::repository::{ApplicationId, ApplicationRepository, RepositoryError, StatusNotifier};
use super::service::{ApplicationStatusService, StatusChangeError, StatusChangeOutcome};
use super::status::{ApplicationStatus, StatusConfig, StatusFeedback, StatusGroup};

/// HTTP surface for the status table, lead triage and application status changes.
pub fn financing_router<R, N>(service: Arc<ApplicationStatusService<R, N>>) -> Router
where
    R: ApplicationRepository + 'static,
    N: StatusNotifier + 'static,
{
    Router::new()
        .route("/api/v1/statuses", get(statuses_handler))
        .route("/api/v1/leads/triage", post(triage_handler))
        .route("/api/v1/applications", post(create_handler::<R, N>))
        .route(
            "/api/v1/applications/:application_id",
            get(status_handler::<R, N>),
        )
        .route(
            "/api/v1/applications/:application_id/status",
            put(update_status_handler::<R, N>),
        )
        .route(
            "/api/v1/applications/:application_id/submit",
            post(submit_handler::<R, N>),
        )
        .route(
            "/api/v1/applications/:application_id/documents",
            put(documents_handler::<R, N>),
        )
        .with_state(service)
}

#[derive(Debug, Serialize)]
pub(crate) struct StatusTableEntry {
    status: ApplicationStatus,
    aliases: &'static [&'static str],
    #[serde(flatten)]
    config: StatusConfig,
    emoji: &'static str,
    sort_priority: u8,
    group: StatusGroup,
    terminal: bool,
    feedback: StatusFeedback,
}

pub(crate) async fn statuses_handler() -> Response {
    let table: Vec<StatusTableEntry> = ApplicationStatus::ordered()
        .into_iter()
        .map(|status| StatusTableEntry {
            status,
            aliases: status.legacy_aliases(),
            config: status.config(),
            emoji: status.emoji(),
            sort_priority: status.sort_priority(),
            group: status.group(),
            terminal: status.is_terminal(),
            feedback: status.feedback(),
        })
        .collect();
    (StatusCode::OK, axum::Json(table)).into_response()
}

pub(crate) async fn triage_handler(axum::Json(leads): axum::Json<Vec<LeadRecord>>) -> Response {
    let views = process_leads(leads, Utc::now());
    (StatusCode::OK, axum::Json(views)).into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateApplicationRequest {
    pub lead_id: String,
}

pub(crate) async fn create_handler<R, N>(
    State(service): State<Arc<ApplicationStatusService<R, N>>>,
    axum::Json(request): axum::Json<CreateApplicationRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: StatusNotifier + 'static,
{
    match service.create_draft(&request.lead_id) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(None, error),
    }
}

pub(crate) async fn status_handler<R, N>(
    State(service): State<Arc<ApplicationStatusService<R, N>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: StatusNotifier + 'static,
{
    let id = ApplicationId(application_id);
    match service.get(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(Some(&id), error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusChangeRequest {
    pub status: String,
}

pub(crate) async fn update_status_handler<R, N>(
    State(service): State<Arc<ApplicationStatusService<R, N>>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<StatusChangeRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: StatusNotifier + 'static,
{
    let id = ApplicationId(application_id);
    let Some(status) = ApplicationStatus::parse(&request.status) else {
        let payload = json!({
            "error": format!("unrecognized application status `{}`", request.status),
        });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    };

    outcome_response(&id, service.update_status(&id, status))
}

pub(crate) async fn submit_handler<R, N>(
    State(service): State<Arc<ApplicationStatusService<R, N>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: StatusNotifier + 'static,
{
    let id = ApplicationId(application_id);
    outcome_response(&id, service.submit(&id))
}

pub(crate) async fn documents_handler<R, N>(
    State(service): State<Arc<ApplicationStatusService<R, N>>>,
    Path(application_id): Path<String>,
    axum::Json(documents): axum::Json<Vec<UploadedDocument>>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: StatusNotifier + 'static,
{
    let id = ApplicationId(application_id);
    outcome_response(&id, service.record_documents(&id, documents))
}

fn outcome_response(
    id: &ApplicationId,
    result: Result<StatusChangeOutcome, StatusChangeError>,
) -> Response {
    match result {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => error_response(Some(id), error),
    }
}

fn error_response(id: Option<&ApplicationId>, error: StatusChangeError) -> Response {
    match error {
        StatusChangeError::Repository(RepositoryError::NotFound) => {
            let payload = json!({
                "application_id": id.map(|id| id.0.clone()),
                "error": "application not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        StatusChangeError::Repository(RepositoryError::Stale { current }) => {
            let payload = json!({
                "application_id": id.map(|id| id.0.clone()),
                "error": "status changed concurrently",
                "current": current,
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        StatusChangeError::Repository(RepositoryError::Conflict) => {
            let payload = json!({
                "error": "application already exists",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
