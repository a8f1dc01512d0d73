use super::common::*;
use crate::workflows::financing::documents::UploadedDocument;
use crate::workflows::financing::repository::{ApplicationId, ApplicationRepository, RepositoryError};
use crate::workflows::financing::service::{
    ApplicationStatusService, StatusChangeError, StatusChangeOutcome,
};
use crate::workflows::financing::status::{ApplicationStatus, FeedbackTone};
use std::sync::Arc;

#[test]
fn update_status_skips_write_when_status_is_unchanged() {
    let (service, repository, notifier) = build_service();
    repository.seed(record("a1", "En Revisión"));

    let outcome = service
        .update_status(&ApplicationId("a1".to_string()), ApplicationStatus::EnRevision)
        .expect("update succeeds");

    assert_eq!(
        outcome,
        StatusChangeOutcome::Unchanged {
            status: "En Revisión".to_string()
        }
    );
    assert_eq!(repository.write_count(), 0);
    assert!(notifier.notices().is_empty());
}

#[test]
fn legacy_alias_counts_as_the_same_status() {
    let (service, repository, _) = build_service();
    repository.seed(record("a2", "in_review"));

    let outcome = service
        .update_status(&ApplicationId("a2".to_string()), ApplicationStatus::EnRevision)
        .expect("update succeeds");
    assert!(!outcome.is_changed());
    assert_eq!(repository.write_count(), 0);
}

#[test]
fn update_status_writes_and_announces_feedback() {
    let (service, repository, notifier) = build_service();
    repository.seed(record("a3", "submitted"));
    let id = ApplicationId("a3".to_string());

    let outcome = service
        .update_status(&id, ApplicationStatus::Rechazada)
        .expect("update succeeds");

    match outcome {
        StatusChangeOutcome::Changed { from, to, feedback } => {
            assert_eq!(from, "submitted");
            assert_eq!(to, ApplicationStatus::Rechazada);
            assert_eq!(feedback.tone, FeedbackTone::Error);
        }
        other => panic!("expected a change, got {other:?}"),
    }

    let stored = repository.fetch(&id).expect("fetch").expect("present");
    assert_eq!(stored.status.raw(), "Rechazada");
    assert_eq!(notifier.notices().len(), 1);
}

#[test]
fn manual_override_can_leave_a_terminal_status() {
    let (service, repository, _) = build_service();
    repository.seed(record("a4", "Aprobada"));

    let outcome = service
        .update_status(&ApplicationId("a4".to_string()), ApplicationStatus::EnRevision)
        .expect("override allowed");
    assert!(outcome.is_changed());
}

#[test]
fn submit_without_documents_lands_on_missing_documents() {
    let (service, _, notifier) = build_service();
    let draft = service.create_draft("lead-9").expect("draft created");
    assert_eq!(draft.status.known(), Some(ApplicationStatus::Borrador));

    let outcome = service.submit(&draft.id).expect("submit succeeds");
    match outcome {
        StatusChangeOutcome::Changed { to, feedback, .. } => {
            assert_eq!(to, ApplicationStatus::FaltanDocumentos);
            assert_eq!(feedback.display_ms, 6_000);
        }
        other => panic!("expected a change, got {other:?}"),
    }
    assert_eq!(notifier.notices()[0].to, ApplicationStatus::FaltanDocumentos);
}

#[test]
fn uploading_the_last_document_completes_the_application() {
    let (service, repository, _) = build_service();
    repository.seed(record("a5", "pending_docs"));
    let id = ApplicationId("a5".to_string());

    let partial = service
        .record_documents(&id, vec![UploadedDocument::new("INE Front")])
        .expect("partial upload");
    assert!(!partial.is_changed());

    let complete = service
        .record_documents(&id, complete_documents())
        .expect("complete upload");
    assert!(complete.is_changed());

    let stored = repository.fetch(&id).expect("fetch").expect("present");
    assert_eq!(stored.status.known(), Some(ApplicationStatus::Completa));
    assert!(stored.is_complete);
    assert_eq!(stored.document_count, 4);
}

#[test]
fn uploads_do_not_move_applications_under_review() {
    let (service, repository, _) = build_service();
    repository.seed(record("a6", "En Revisión"));

    let outcome = service
        .record_documents(&ApplicationId("a6".to_string()), complete_documents())
        .expect("upload succeeds");
    assert!(!outcome.is_changed());
}

#[test]
fn get_propagates_not_found() {
    let (service, _, _) = build_service();
    match service.get(&ApplicationId("missing".to_string())) {
        Err(StatusChangeError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn notifier_failures_surface_after_the_write() {
    let repository = Arc::new(MemoryRepository::default());
    repository.seed(record("a7", "Completa"));
    let service = ApplicationStatusService::new(repository.clone(), Arc::new(OfflineNotifier));

    let result = service.update_status(&ApplicationId("a7".to_string()), ApplicationStatus::EnRevision);
    assert!(matches!(result, Err(StatusChangeError::Notify(_))));
    assert_eq!(repository.write_count(), 1);
}

#[test]
fn concurrent_change_turns_the_second_write_away() {
    let (service, repository, notifier) = build_service();
    let snapshot = record("a8", "Completa");
    repository.seed(record("a8", "En Revisión"));
    repository.serve_stale_read(snapshot);

    let result = service.update_status(&ApplicationId("a8".to_string()), ApplicationStatus::Aprobada);
    match result {
        Err(StatusChangeError::Repository(RepositoryError::Stale { current })) => {
            assert_eq!(current, "En Revisión");
        }
        other => panic!("expected a stale write, got {other:?}"),
    }
    assert_eq!(repository.write_count(), 0);
    assert!(notifier.notices().is_empty());
}

#[test]
fn dashboard_hides_drafts_and_sorts_by_priority() {
    let (service, repository, _) = build_service();
    repository.seed(record("d", "draft"));
    repository.seed(record("r", "Rechazada"));
    repository.seed(record("p", "pending_docs"));
    repository.seed(record("c", "Completa"));
    repository.seed(record("x", "archived"));

    let ids: Vec<String> = service
        .dashboard()
        .expect("dashboard loads")
        .into_iter()
        .map(|record| record.id.0)
        .collect();
    assert_eq!(ids, vec!["p", "c", "r"]);
}

#[test]
fn repository_outage_is_reported() {
    let service = ApplicationStatusService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryNotifier::default()),
    );
    match service.create_draft("lead-1") {
        Err(StatusChangeError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected unavailable, got {other:?}"),
    }
}
