use crate::interface_adapters::handlers::{generate_qr, health, validate_qr};
use crate::interface_adapters::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/qr/generate", post(generate_qr))
        .route("/qr/validate", post(validate_qr))
        .route("/health", get(health))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::VALIDITY_WINDOW;
    use crate::domain::ports::QrRenderer;
    use crate::domain::signing::PayloadSigner;
    use crate::interface_adapters::cache::InMemoryRenderCache;
    use crate::interface_adapters::renderers::SvgRenderer;
    use crate::interface_adapters::state::{OsNonceSource, SystemClock};
    use crate::use_cases::{QrCodeService, RenderChain};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn build_test_app() -> Router {
        let renderer: Arc<dyn QrRenderer> = Arc::new(SvgRenderer);
        build_test_app_with_renderers(vec![renderer])
    }

    fn build_test_app_with_renderers(renderers: Vec<Arc<dyn QrRenderer>>) -> Router {
        let cache = Arc::new(InMemoryRenderCache::new(16, Duration::from_secs(60)));
        let qr = QrCodeService::new(
            Arc::new(SystemClock),
            Arc::new(OsNonceSource),
            cache.clone(),
            PayloadSigner::new(b"route-test-secret").expect("expected signer"),
            RenderChain::new(renderers, Duration::from_secs(1)),
            VALIDITY_WINDOW,
        );

        app(AppState {
            qr: Arc::new(qr),
            cache,
        })
    }

    fn json_request(uri: &str, body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .expect("expected request to build")
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("expected response body");
        serde_json::from_slice(&body).expect("expected json body")
    }

    #[tokio::test]
    async fn when_generate_is_called_then_returns_data_url_and_signed_data() {
        let app = build_test_app();

        let response = app
            .oneshot(json_request(
                "/qr/generate",
                r#"{"guest_id":"guest-123","event_id":"event-456"}"#.to_string(),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let payload = json_body(response).await;
        assert!(
            payload["qr_code_url"]
                .as_str()
                .expect("url")
                .starts_with("data:image/svg+xml;base64,")
        );
        let data: Value =
            serde_json::from_str(payload["qr_code_data"].as_str().expect("data")).expect("json");
        assert_eq!(data["guestId"], "guest-123");
        assert_eq!(data["eventId"], "event-456");
        assert_eq!(data["version"], 1);
    }

    #[tokio::test]
    async fn when_generated_code_is_validated_then_returns_valid_with_identity() {
        let app = build_test_app();

        let response = app
            .clone()
            .oneshot(json_request(
                "/qr/generate",
                r#"{"guest_id":"guest-1","event_id":"event-1"}"#.to_string(),
            ))
            .await
            .unwrap();
        let generated = json_body(response).await;
        let body = serde_json::json!({ "qr_code_data": generated["qr_code_data"] }).to_string();

        let response = app.oneshot(json_request("/qr/validate", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let payload = json_body(response).await;
        assert_eq!(payload["valid"], true);
        assert_eq!(payload["guest_id"], "guest-1");
        assert_eq!(payload["event_id"], "event-1");
    }

    #[tokio::test]
    async fn when_validate_receives_garbage_then_returns_200_with_valid_false() {
        let app = build_test_app();

        let response = app
            .oneshot(json_request(
                "/qr/validate",
                r#"{"qr_code_data":"not-a-code"}"#.to_string(),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let payload = json_body(response).await;
        assert_eq!(payload["valid"], false);
        assert!(payload.get("guest_id").is_none());
    }

    #[tokio::test]
    async fn when_every_renderer_fails_then_generate_returns_503_and_error_message() {
        let app = build_test_app_with_renderers(Vec::new());

        let response = app
            .oneshot(json_request(
                "/qr/generate",
                r#"{"guest_id":"guest-1","event_id":"event-1"}"#.to_string(),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let payload = json_body(response).await;
        assert_eq!(payload["message"], "qr code generation failed");
    }

    #[tokio::test]
    async fn when_generate_payload_is_missing_fields_then_returns_422() {
        let app = build_test_app();

        let response = app
            .oneshot(json_request("/qr/generate", r#"{"guest_id":"g"}"#.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn when_generate_route_is_called_with_get_then_returns_405() {
        let app = build_test_app();

        let request = Request::builder()
            .method("GET")
            .uri("/qr/generate")
            .body(Body::empty())
            .expect("expected request to build");

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn when_health_is_called_after_a_render_then_cache_count_is_reported() {
        let app = build_test_app();

        app.clone()
            .oneshot(json_request(
                "/qr/generate",
                r#"{"guest_id":"guest-1","event_id":"event-1"}"#.to_string(),
            ))
            .await
            .unwrap();

        let request = Request::builder()
            .method("GET")
            .uri("/health")
            .body(Body::empty())
            .expect("expected request to build");
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let payload = json_body(response).await;
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["cache_entries"], 1);
    }

    #[tokio::test]
    async fn when_route_does_not_exist_then_returns_404() {
        let app = build_test_app();

        let response = app
            .oneshot(json_request("/qr/does-not-exist", "{}".to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
