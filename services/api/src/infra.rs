use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use showroom::workflows::financing::{
    has_all_documents, ApplicationId, ApplicationRecord, ApplicationRepository, ApplicationStatus,
    NotifyError, RepositoryError, ResolvedStatus, StatusNotice, StatusNotifier, UploadedDocument,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationRepository {
    records: Arc<Mutex<HashMap<ApplicationId, ApplicationRecord>>>,
}

impl InMemoryApplicationRepository {
    /// Apply `change` under the lock; the row is left as-is when it errors.
    fn modify<F>(&self, id: &ApplicationId, change: F) -> Result<ApplicationRecord, RepositoryError>
    where
        F: FnOnce(&mut ApplicationRecord) -> Result<(), RepositoryError>,
    {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        change(record)?;
        Ok(record.clone())
    }
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
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
        self.modify(id, |record| {
            if record.status.raw() != expected.raw() {
                return Err(RepositoryError::Stale {
                    current: record.status.raw().to_string(),
                });
            }
            record.status = ResolvedStatus::from(status);
            record.updated_at = at;
            Ok(())
        })
    }

    fn update_documents(
        &self,
        id: &ApplicationId,
        documents: Vec<UploadedDocument>,
        at: DateTime<Utc>,
    ) -> Result<ApplicationRecord, RepositoryError> {
        self.modify(id, |record| {
            record.is_complete = has_all_documents(&documents);
            record.document_count = documents.len();
            record.documents = documents;
            record.updated_at = at;
            Ok(())
        })
    }

    fn list(&self) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

/// Logs each announcement. Nothing is retained after the log line.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct LoggingStatusNotifier;

impl StatusNotifier for LoggingStatusNotifier {
    fn notify(&self, notice: StatusNotice) -> Result<(), NotifyError> {
        info!(
            application_id = %notice.application_id,
            from = %notice.from,
            to = %notice.to,
            title = notice.feedback.title,
            display_ms = notice.feedback.display_ms,
            "status feedback"
        );
        Ok(())
    }
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| format!("failed to parse '{raw}' as an RFC 3339 timestamp ({err})"))
}
