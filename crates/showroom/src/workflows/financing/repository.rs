use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::documents::UploadedDocument;
use super::status::{ApplicationStatus, DisplayConfig, ResolvedStatus, StatusFeedback};

/// Identifier wrapper for financing applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored application row. `status` keeps whatever string was persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub lead_id: String,
    pub status: ResolvedStatus,
    pub is_complete: bool,
    pub document_count: usize,
    #[serde(default)]
    pub documents: Vec<UploadedDocument>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApplicationRecord {
    pub fn status_view(&self) -> ApplicationStatusView {
        ApplicationStatusView {
            application_id: self.id.clone(),
            lead_id: self.lead_id.clone(),
            status: self.status.raw().to_string(),
            display: self.status.display(),
            emoji: self.status.emoji(),
            sort_priority: self.status.sort_priority(),
            is_complete: self.is_complete,
            document_count: self.document_count,
            updated_at: self.updated_at,
        }
    }
}

/// Storage seam for application rows; the managed backend sits behind it.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError>;
    /// Persist a new status, returning the updated row. Fails with
    /// [`RepositoryError::Stale`] unless the stored status still equals `expected`.
    fn update_status(
        &self,
        id: &ApplicationId,
        expected: &ResolvedStatus,
        status: ApplicationStatus,
        at: DateTime<Utc>,
    ) -> Result<ApplicationRecord, RepositoryError>;
    fn update_documents(
        &self,
        id: &ApplicationId,
        documents: Vec<UploadedDocument>,
        at: DateTime<Utc>,
    ) -> Result<ApplicationRecord, RepositoryError>;
    fn list(&self) -> Result<Vec<ApplicationRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("status changed concurrently, now `{current}`")]
    Stale { current: String },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook announcing status changes (toast, e-mail or CRM sync adapters).
pub trait StatusNotifier: Send + Sync {
    fn notify(&self, notice: StatusNotice) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusNotice {
    pub application_id: ApplicationId,
    pub from: String,
    pub to: ApplicationStatus,
    pub feedback: StatusFeedback,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Outward view of an application and how its status renders.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationStatusView {
    pub application_id: ApplicationId,
    pub lead_id: String,
    pub status: String,
    pub display: DisplayConfig,
    pub emoji: &'static str,
    pub sort_priority: u8,
    pub is_complete: bool,
    pub document_count: usize,
    pub updated_at: DateTime<Utc>,
}
