use crate::handlers::{self, AppState};
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Builds the HTTP application.
///
/// Routes:
/// - `GET /health`
/// - `GET /customer/:customer_id/context`
/// - `GET /` and `GET /widget` (widget page)
/// - `GET /openapi.json` and `GET /docs`
/// - `/static/*` served from the configured static directory
pub fn build_router(state: Arc<AppState>) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);
    let static_files = ServeDir::new(&state.config.static_dir);

    // Any origin, GET/POST, any header; no credentials with wildcard origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(handlers::widget_page))
        .route("/widget", get(handlers::widget_page))
        .route("/health", get(handlers::health))
        .route(
            "/customer/:customer_id/context",
            get(handlers::get_customer_context),
        )
        // API documentation
        .route("/openapi.json", get(handlers::openapi_json))
        .route("/docs", get(handlers::swagger_ui))
        .nest_service("/static", static_files)
        .with_state(state)
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
