/// Router-level tests for the HTTP surface
/// Drives the full application (middleware included) without binding a socket
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use customer_context_api::config::Config;
use customer_context_api::context::ContextAggregator;
use customer_context_api::errors::UpstreamError;
use customer_context_api::handlers::AppState;
use customer_context_api::models::{AccountInfo, CustomerSummary, SupportTicket};
use customer_context_api::router::build_router;
use customer_context_api::services::{CustomerDataSource, StubCustomerService};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

/// Source whose ticket system is down
struct TicketsDown;

#[async_trait]
impl CustomerDataSource for TicketsDown {
    async fn fetch_summary(&self, id: &str) -> Result<CustomerSummary, UpstreamError> {
        StubCustomerService::new().fetch_summary(id).await
    }

    async fn fetch_tickets(&self, _id: &str) -> Result<Vec<SupportTicket>, UpstreamError> {
        Err(UpstreamError::Unavailable {
            source: "tickets",
            message: "connection refused".to_string(),
        })
    }

    async fn fetch_account_info(&self, id: &str) -> Result<AccountInfo, UpstreamError> {
        StubCustomerService::new().fetch_account_info(id).await
    }
}

fn test_static_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("customer-context-{}-{}", name, std::process::id()))
}

fn app_with(source: Arc<dyn CustomerDataSource>, static_dir: PathBuf) -> Router {
    let config = Config {
        static_dir,
        ..Config::default()
    };
    build_router(Arc::new(AppState {
        config,
        aggregator: ContextAggregator::new(source),
    }))
}

fn stub_app() -> Router {
    app_with(Arc::new(StubCustomerService::new()), test_static_dir("stub"))
}

async fn get(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_customer_context_scenario() {
    let response = get(stub_app(), "/customer/TEST_CUSTOMER_123/context").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["summary"]["customer_id"], "TEST_CUSTOMER_123");
    assert_eq!(body["summary"]["account_value"].as_f64(), Some(45230.00));
    assert_eq!(body["summary"]["risk_score"], "Low");

    let tickets = body["recent_tickets"].as_array().unwrap();
    assert_eq!(tickets.len(), 2);
    assert_eq!(tickets[0]["date"], "2025-09-15");
    assert_eq!(tickets[1]["resolution_time"], "1.8 hours");

    assert_eq!(body["account_info"]["license_count"], 125);
}

#[tokio::test]
async fn test_customer_id_is_echoed_verbatim() {
    let response = get(stub_app(), "/customer/jane.doe%40example.com/context").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["summary"]["customer_id"], "jane.doe@example.com");
}

#[tokio::test]
async fn test_failing_source_returns_500_with_detail() {
    let app = app_with(Arc::new(TicketsDown), test_static_dir("down"));
    let response = get(app, "/customer/C-1/context").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = json_body(response).await;
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("tickets source unavailable: connection refused"));
    // No partial context leaks into the error body
    assert!(body.get("summary").is_none());
}

#[tokio::test]
async fn test_health_scenario() {
    let response = get(stub_app(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn test_widget_pages_serve_html() {
    for uri in ["/", "/widget"] {
        let response = get(stub_app(), uri).await;
        assert_eq!(response.status(), StatusCode::OK);

        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("/customer/"));
        assert!(html.contains("TEST_CUSTOMER_123"));
    }
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "https://crm.example.com")
        .body(Body::empty())
        .unwrap();
    let response = stub_app().oneshot(request).await.unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_cors_preflight_lists_get_and_post() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/customer/C-1/context")
        .header(header::ORIGIN, "https://crm.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-custom-header")
        .body(Body::empty())
        .unwrap();
    let response = stub_app().oneshot(request).await.unwrap();

    let methods = response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap()
        .to_string();
    assert!(methods.contains("GET"));
    assert!(methods.contains("POST"));
    assert!(!methods.contains("DELETE"));
}

#[tokio::test]
async fn test_openapi_document_served() {
    let response = get(stub_app(), "/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert!(body["paths"]["/customer/{customer_id}/context"].is_object());

    let response = get(stub_app(), "/docs").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_static_files_served_from_configured_dir() {
    let dir = test_static_dir("assets");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("hello.txt"), "hello widget").unwrap();

    let app = app_with(Arc::new(StubCustomerService::new()), dir.clone());
    let response = get(app.clone(), "/static/hello.txt").await;
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"hello widget");

    let response = get(app, "/static/missing.txt").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let response = get(stub_app(), "/customer/C-1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
