use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::financing::documents::UploadedDocument;
use crate::workflows::financing::repository::{
    ApplicationId, ApplicationRecord, ApplicationRepository, NotifyError, RepositoryError,
    StatusNotice, StatusNotifier,
};
use crate::workflows::financing::service::ApplicationStatusService;
use crate::workflows::financing::status::{ApplicationStatus, ResolvedStatus};

pub(super) fn timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 2, 16, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn complete_documents() -> Vec<UploadedDocument> {
    ["INE Front", "INE Back", "Comprobante Domicilio", "Comprobante Ingresos"]
        .into_iter()
        .map(UploadedDocument::new)
        .collect()
}

/// Row seeded with a raw persisted status, legacy forms included.
pub(super) fn record(id: &str, raw_status: &str) -> ApplicationRecord {
    ApplicationRecord {
        id: ApplicationId(id.to_string()),
        lead_id: format!("lead-{id}"),
        status: ResolvedStatus::resolve(raw_status),
        is_complete: false,
        document_count: 0,
        documents: Vec::new(),
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

pub(super) fn build_service() -> (
    ApplicationStatusService<MemoryRepository, MemoryNotifier>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifier>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = ApplicationStatusService::new(repository.clone(), notifier.clone());
    (service, repository, notifier)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<ApplicationId, ApplicationRecord>>>,
    pub(super) writes: Arc<Mutex<usize>>,
    stale_read: Arc<Mutex<Option<ApplicationRecord>>>,
}

impl MemoryRepository {
    pub(super) fn seed(&self, record: ApplicationRecord) {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .insert(record.id.clone(), record);
    }

    /// Next fetch returns `snapshot` instead of the stored row.
    pub(super) fn serve_stale_read(&self, snapshot: ApplicationRecord) {
        *self.stale_read.lock().expect("stale read poisoned") = Some(snapshot);
    }

    pub(super) fn write_count(&self) -> usize {
        *self.writes.lock().expect("write counter poisoned")
    }

    fn bump(&self) {
        *self.writes.lock().expect("write counter poisoned") += 1;
    }
}

impl ApplicationRepository for MemoryRepository {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        if let Some(snapshot) = self.stale_read.lock().expect("stale read poisoned").take() {
            return Ok(Some(snapshot));
        }
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update_status(
        &self,
        id: &ApplicationId,
        expected: &ResolvedStatus,
        status: ApplicationStatus,
        at: DateTime<Utc>,
    ) -> Result<ApplicationRecord, RepositoryError> {
        let updated = {
            let mut guard = self.records.lock().expect("repository mutex poisoned");
            let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
            if record.status.raw() != expected.raw() {
                return Err(RepositoryError::Stale {
                    current: record.status.raw().to_string(),
                });
            }
            record.status = ResolvedStatus::from(status);
            record.updated_at = at;
            record.clone()
        };
        self.bump();
        Ok(updated)
    }

    fn update_documents(
        &self,
        id: &ApplicationId,
        documents: Vec<UploadedDocument>,
        at: DateTime<Utc>,
    ) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        record.document_count = documents.len();
        record.is_complete = crate::workflows::financing::has_all_documents(&documents);
        record.documents = documents;
        record.updated_at = at;
        Ok(record.clone())
    }

    fn list(&self) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    notices: Arc<Mutex<Vec<StatusNotice>>>,
}

impl MemoryNotifier {
    pub(super) fn notices(&self) -> Vec<StatusNotice> {
        self.notices.lock().expect("notifier mutex poisoned").clone()
    }
}

impl StatusNotifier for MemoryNotifier {
    fn notify(&self, notice: StatusNotice) -> Result<(), NotifyError> {
        self.notices
            .lock()
            .expect("notifier mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl ApplicationRepository for UnavailableRepository {
    fn insert(&self, _record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_status(
        &self,
        _id: &ApplicationId,
        _expected: &ResolvedStatus,
        _status: ApplicationStatus,
        _at: DateTime<Utc>,
    ) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_documents(
        &self,
        _id: &ApplicationId,
        _documents: Vec<UploadedDocument>,
        _at: DateTime<Utc>,
    ) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct OfflineNotifier;

impl StatusNotifier for OfflineNotifier {
    fn notify(&self, _notice: StatusNotice) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("smtp relay down".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
