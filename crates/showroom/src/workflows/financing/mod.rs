//! Financing application status model, CRM derivation helpers and the
//! status-change pipeline behind the staff dashboards.

pub mod derivation;
pub mod documents;
pub mod leads;
pub mod repository;
pub mod router;
pub mod service;
pub mod status;
pub mod workflow;

#[cfg(test)]
mod tests;

pub use derivation::{compute_needs_action, derive_display_status, status_sort_priority};
pub use documents::{has_all_documents, missing_documents, normalize_document_type, RequiredDocument, UploadedDocument};
pub use leads::{format_relative_time, process_lead, process_leads, triage_order, LeadRecord, LeadView};
pub use repository::{
    ApplicationId, ApplicationRecord, ApplicationRepository, ApplicationStatusView, NotifyError,
    RepositoryError, StatusNotice, StatusNotifier,
};
pub use router::financing_router;
pub use service::{ApplicationStatusService, StatusChangeError, StatusChangeOutcome};
pub use status::{
    ApplicationStatus, DisplayConfig, FeedbackTone, ResolvedStatus, StatusColor, StatusConfig,
    StatusFeedback, StatusGroup, UnknownStatus, ACTIVE, DASHBOARD, DECISION_STATUSES, IN_PROGRESS,
    UNKNOWN_SORT_PRIORITY, WORKFLOW_STATUSES,
};
pub use workflow::{automatic_transition, WorkflowEvent};
