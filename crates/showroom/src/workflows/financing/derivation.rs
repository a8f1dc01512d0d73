//! Pure helpers that turn persisted application state into what the CRM shows.

use super::status::{ApplicationStatus, ResolvedStatus, UNKNOWN_SORT_PRIORITY};

/// The persisted status is authoritative. Documents on file never override it.
pub fn derive_display_status(raw: &str) -> ResolvedStatus {
    ResolvedStatus::resolve(raw)
}

/// A lead needs attention when nobody has contacted it yet, or when its
/// application is waiting on the dealership (documents or a fresh submission).
pub fn compute_needs_action(contacted: bool, status: Option<ApplicationStatus>) -> bool {
    !contacted
        || matches!(
            status,
            Some(ApplicationStatus::FaltanDocumentos | ApplicationStatus::Completa)
        )
}

pub fn status_sort_priority(status: Option<ApplicationStatus>) -> u8 {
    status
        .map(ApplicationStatus::sort_priority)
        .unwrap_or(UNKNOWN_SORT_PRIORITY)
}
