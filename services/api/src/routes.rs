use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use showroom::workflows::financing::{
    financing_router, ApplicationRepository, ApplicationStatusService, StatusNotifier,
};
use std::sync::Arc;

pub(crate) fn with_financing_routes<R, N>(
    service: Arc<ApplicationStatusService<R, N>>,
) -> axum::Router
where
    R: ApplicationRepository + 'static,
    N: StatusNotifier + 'static,
{
    financing_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryApplicationRepository;
    use showroom::workflows::financing::{NotifyError, StatusNotice, StatusNotifier};
    use std::sync::Mutex;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn state(ready: bool) -> AppState {
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        notices: Mutex<Vec<StatusNotice>>,
    }

    impl RecordingNotifier {
        fn count(&self) -> usize {
            self.notices.lock().expect("notifier mutex poisoned").len()
        }
    }

    impl StatusNotifier for RecordingNotifier {
        fn notify(&self, notice: StatusNotice) -> Result<(), NotifyError> {
            self.notices
                .lock()
                .expect("notifier mutex poisoned")
                .push(notice);
            Ok(())
        }
    }

    fn app(ready: bool) -> (axum::Router, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let service = Arc::new(ApplicationStatusService::new(
            Arc::new(InMemoryApplicationRepository::default()),
            notifier.clone(),
        ));
        let router = with_financing_routes(service).layer(Extension(state(ready)));
        (router, notifier)
    }

    #[tokio::test]
    async fn readiness_reports_initializing_until_bound() {
        let (router, _) = app(false);
        let response = router
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request builds"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn health_and_status_table_share_one_router() {
        let (router, _) = app(true);
        let health = router
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).expect("request builds"))
            .await
            .expect("route executes");
        assert_eq!(health.status(), StatusCode::OK);

        let statuses = router
            .oneshot(
                Request::get("/api/v1/statuses")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(statuses.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn status_change_reaches_the_notifier() {
        let (router, notifier) = app(true);
        let created = router
            .clone()
            .oneshot(
                Request::post("/api/v1/applications")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"lead_id":"lead-7"}"#))
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(created.status(), StatusCode::CREATED);
        let body = axum::body::to_bytes(created.into_body(), 16 * 1024)
            .await
            .expect("read body");
        let created: serde_json::Value = serde_json::from_slice(&body).expect("json payload");
        let id = created["application_id"].as_str().expect("id");

        let changed = router
            .oneshot(
                Request::put(format!("/api/v1/applications/{id}/status"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"status":"En Revisión"}"#))
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(changed.status(), StatusCode::OK);
        assert_eq!(notifier.count(), 1);
    }
}
