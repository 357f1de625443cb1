use crate::handlers;
use crate::models::{CustomerContext, CustomerSummary, ErrorDetail, HealthResponse, SupportTicket};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Customer Context API", version = "1.0.0"),
    paths(handlers::health, handlers::get_customer_context),
    components(schemas(
        CustomerContext,
        CustomerSummary,
        SupportTicket,
        HealthResponse,
        ErrorDetail
    ))
)]
pub struct ApiDoc;
