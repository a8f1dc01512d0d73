use super::documents::{has_all_documents, UploadedDocument};
use super::status::{ApplicationStatus, ResolvedStatus};

/// Event that may move an application without staff involvement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowEvent {
    /// The applicant pressed submit on a draft.
    Submitted,
    /// The set of uploaded documents changed.
    DocumentsUpdated,
}

/// Next status after `event`, or `None` when the application stays put.
///
/// Terminal statuses, En Revisión and unrecognized statuses never move on
/// their own; staff change those through a manual override.
pub fn automatic_transition(
    current: &ResolvedStatus,
    event: WorkflowEvent,
    documents: &[UploadedDocument],
) -> Option<ApplicationStatus> {
    let status = current.known()?;
    let complete = has_all_documents(documents);

    let next = match (status, event) {
        (ApplicationStatus::Borrador, WorkflowEvent::Submitted) => {
            if complete {
                ApplicationStatus::Completa
            } else {
                ApplicationStatus::FaltanDocumentos
            }
        }
        (ApplicationStatus::FaltanDocumentos, WorkflowEvent::DocumentsUpdated) if complete => {
            ApplicationStatus::Completa
        }
        _ => return None,
    };

    (next != status).then_some(next)
}
