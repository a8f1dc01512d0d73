use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use super::documents::{has_all_documents, UploadedDocument};
use super::repository::{
    ApplicationId, ApplicationRecord, ApplicationRepository, NotifyError, RepositoryError,
    StatusNotice, StatusNotifier,
};
use super::status::{ApplicationStatus, ResolvedStatus, StatusFeedback, DASHBOARD};
use super::workflow::{automatic_transition, WorkflowEvent};

/// Result of asking for a status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StatusChangeOutcome {
    /// The application already had that status; nothing was written.
    Unchanged { status: String },
    Changed {
        from: String,
        to: ApplicationStatus,
        feedback: StatusFeedback,
    },
}

impl StatusChangeOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, StatusChangeOutcome::Changed { .. })
    }
}

/// Service owning every status write: drafts, submission, document uploads and
/// manual staff changes.
pub struct ApplicationStatusService<R, N> {
    repository: Arc<R>,
    notifier: Arc<N>,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("fin-{id:06}"))
}

impl<R, N> ApplicationStatusService<R, N>
where
    R: ApplicationRepository + 'static,
    N: StatusNotifier + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    pub fn create_draft(&self, lead_id: &str) -> Result<ApplicationRecord, StatusChangeError> {
        let now = Utc::now();
        let record = ApplicationRecord {
            id: next_application_id(),
            lead_id: lead_id.to_string(),
            status: ResolvedStatus::from(ApplicationStatus::Borrador),
            is_complete: false,
            document_count: 0,
            documents: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert(record)?;
        debug!(application_id = %stored.id, lead_id, "draft application created");
        Ok(stored)
    }

    /// Applicant submits a draft. Lands on Completa or Faltan Documentos
    /// depending on the documents already on file.
    pub fn submit(&self, id: &ApplicationId) -> Result<StatusChangeOutcome, StatusChangeError> {
        let record = self.get(id)?;
        match automatic_transition(&record.status, WorkflowEvent::Submitted, &record.documents) {
            Some(next) => self.apply(&record, next),
            None => Ok(StatusChangeOutcome::Unchanged {
                status: record.status.raw().to_string(),
            }),
        }
    }

    /// Replace the document list, then promote the application if the upload
    /// completed it.
    pub fn record_documents(
        &self,
        id: &ApplicationId,
        documents: Vec<UploadedDocument>,
    ) -> Result<StatusChangeOutcome, StatusChangeError> {
        let record = self
            .repository
            .update_documents(id, documents, Utc::now())?;
        debug!(
            application_id = %id,
            document_count = record.document_count,
            complete = has_all_documents(&record.documents),
            "documents recorded"
        );

        match automatic_transition(
            &record.status,
            WorkflowEvent::DocumentsUpdated,
            &record.documents,
        ) {
            Some(next) => self.apply(&record, next),
            None => Ok(StatusChangeOutcome::Unchanged {
                status: record.status.raw().to_string(),
            }),
        }
    }

    /// Manual staff change. Any canonical status may be set, terminal ones included.
    pub fn update_status(
        &self,
        id: &ApplicationId,
        new_status: ApplicationStatus,
    ) -> Result<StatusChangeOutcome, StatusChangeError> {
        let record = self.get(id)?;
        if record.status.known() == Some(new_status) {
            debug!(application_id = %id, status = %new_status, "status unchanged, skipping write");
            return Ok(StatusChangeOutcome::Unchanged {
                status: record.status.raw().to_string(),
            });
        }

        self.apply(&record, new_status)
    }

    pub fn get(&self, id: &ApplicationId) -> Result<ApplicationRecord, StatusChangeError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Applications shown on the staff dashboard, most urgent first.
    pub fn dashboard(&self) -> Result<Vec<ApplicationRecord>, StatusChangeError> {
        let mut records: Vec<ApplicationRecord> = self
            .repository
            .list()?
            .into_iter()
            .filter(|record| record.status.is_in(&DASHBOARD))
            .collect();
        records.sort_by(|a, b| {
            a.status
                .sort_priority()
                .cmp(&b.status.sort_priority())
                .then_with(|| b.updated_at.cmp(&a.updated_at))
        });
        Ok(records)
    }

    fn apply(
        &self,
        record: &ApplicationRecord,
        next: ApplicationStatus,
    ) -> Result<StatusChangeOutcome, StatusChangeError> {
        let from = record.status.raw().to_string();
        let updated = self
            .repository
            .update_status(&record.id, &record.status, next, Utc::now())?;
        let feedback = next.feedback();

        info!(
            application_id = %updated.id,
            from = %from,
            to = %next,
            "application status changed"
        );

        self.notifier.notify(StatusNotice {
            application_id: updated.id.clone(),
            from: from.clone(),
            to: next,
            feedback,
        })?;

        Ok(StatusChangeOutcome::Changed {
            from,
            to: next,
            feedback,
        })
    }
}

/// Error raised by the status service.
#[derive(Debug, thiserror::Error)]
pub enum StatusChangeError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}
