use crate::config::Config;
use crate::context::ContextAggregator;
use crate::errors::{AppError, ResultExt};
use crate::models::*;
use crate::openapi::ApiDoc;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use utoipa::OpenApi;

/// Widget page served at `/` and `/widget`.
const WIDGET_HTML: &str = include_str!("../assets/widget.html");

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Composes customer context from the configured data source.
    pub aggregator: ContextAggregator,
}

/// Health check endpoint.
///
/// # Returns
///
/// * `Json<HealthResponse>` - HTTP 200 OK with status and current time.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
    })
}

/// GET /customer/:customer_id/context
///
/// Main endpoint that aggregates customer data from the summary, ticket and
/// account sources.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `customer_id` - Opaque customer identifier taken from the path.
///
/// # Returns
///
/// * `Result<Json<CustomerContext>, AppError>` - The composed context or a 500 with `detail`.
#[utoipa::path(
    get,
    path = "/customer/{customer_id}/context",
    params(("customer_id" = String, Path, description = "Opaque customer identifier")),
    responses(
        (status = 200, description = "Aggregated customer context", body = CustomerContext),
        (status = 500, description = "A backing source failed", body = ErrorDetail)
    )
)]
pub async fn get_customer_context(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<String>,
) -> Result<Json<CustomerContext>, AppError> {
    tracing::info!("GET /customer/{}/context", customer_id);

    let context = state
        .aggregator
        .get_context(&customer_id)
        .await
        .with_context(|| format!("Failed to load context for customer {}", customer_id))?;

    Ok(Json(context))
}

/// Serves the customer context widget page.
pub async fn widget_page() -> Html<&'static str> {
    Html(WIDGET_HTML)
}

/// Serves the generated OpenAPI document.
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Serves the Swagger UI HTML page.
///
/// The page loads the document served by `openapi_json`.
pub async fn swagger_ui() -> impl IntoResponse {
    let html = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Customer Context API - Swagger UI</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        body { margin: 0; padding: 0; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = function() {
            window.ui = SwaggerUIBundle({
                url: "/openapi.json",
                dom_id: '#swagger-ui',
                deepLinking: true
            });
        };
    </script>
</body>
</html>
"#;
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
}
