// Route table for the host runtime
use crate::infrastructure::config::ResourceSettings;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    block_student_view, health_check, student_view_aside, studio_submit,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};

pub fn build_router(state: Arc<AppState>, resources: &ResourceSettings) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/asides/student_view", get(student_view_aside))
        .route("/blocks/:usage_id/student_view", get(block_student_view))
        .route("/blocks/:usage_id/handler/studio_submit", post(studio_submit))
        .nest_service(&resources.public_url, ServeDir::new(&resources.static_root))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::block_service::BlockService;
    use crate::application::settings_store::InMemorySettingsStore;
    use crate::application::summary_service::SummaryViewBuilder;
    use crate::infrastructure::config::{AsideMode, DashboardSettings};
    use crate::infrastructure::i18n::StaticResources;
    use crate::infrastructure::superset_client::SupersetConnector;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::path::PathBuf;
    use tower::ServiceExt;

    fn router() -> Router {
        let settings = DashboardSettings::default();
        let summary_builder = SummaryViewBuilder::new(
            Arc::new(SupersetConnector::new(settings.clone())),
            AsideMode::Live,
            settings.chart_id,
            settings.datasource(),
        );

        let resources = ResourceSettings {
            static_root: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static"),
            public_url: "/static".to_string(),
        };
        let block_service = BlockService::new(
            Arc::new(InMemorySettingsStore::new()),
            StaticResources::new(resources.static_root.clone(), &resources.public_url),
        );

        let state = Arc::new(AppState {
            summary_builder,
            block_service,
        });
        build_router(state, &resources)
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_healthz() {
        let (status, body) = send(router(), get("/healthz")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");
    }

    #[tokio::test]
    async fn test_aside_degrades_without_dashboard() {
        let (status, body) = send(
            router(),
            get("/asides/student_view?course_id=course-v1:edX+DemoX+2024&block_type=vertical&block_id=u1"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let fragment: Value = serde_json::from_slice(&body).unwrap();
        let content = fragment["content"].as_str().unwrap();
        assert!(content.contains("Summary unavailable"));
        assert!(content.contains("data-block-id=\"u1\""));
    }

    #[tokio::test]
    async fn test_aside_without_block_context_is_rejected() {
        let (status, _) = send(router(), get("/asides/student_view")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_studio_submit_then_student_view() {
        let router = router();

        let (status, body) = send(
            router.clone(),
            post_json(
                "/blocks/b1/handler/studio_submit",
                r#"{"display_name": "Weekly Stats"}"#,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            serde_json::from_slice::<Value>(&body).unwrap(),
            serde_json::json!({"result": "success"})
        );

        let request = Request::builder()
            .uri("/blocks/b1/student_view")
            .header("accept-language", "fr-CA,fr;q=0.9")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(router.clone(), request).await;
        assert_eq!(status, StatusCode::OK);
        let fragment: Value = serde_json::from_slice(&body).unwrap();
        assert!(fragment["content"].as_str().unwrap().contains("Weekly Stats"));
        assert_eq!(fragment["js_init_fn"], "SupersetXBlock");
        assert_eq!(
            fragment["resources"][1]["data"],
            "/static/public/js/translations/en/text.js"
        );
    }

    #[tokio::test]
    async fn test_studio_submit_with_empty_payload() {
        let router = router();

        let (status, body) =
            send(router.clone(), post_json("/blocks/b2/handler/studio_submit", "{}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            serde_json::from_slice::<Value>(&body).unwrap(),
            serde_json::json!({"result": "success"})
        );

        let (_, body) = send(router, get("/blocks/b2/student_view")).await;
        let fragment: Value = serde_json::from_slice(&body).unwrap();
        assert!(fragment["content"].as_str().unwrap().contains("Superset"));
    }

    #[tokio::test]
    async fn test_serves_translation_bundle() {
        let (status, body) =
            send(router(), get("/static/public/js/translations/en/text.js")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(body).unwrap().contains("SupersetXBlockI18N"));
    }
}
