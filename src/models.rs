use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use utoipa::ToSchema;

// ============ Customer Context Models ============

/// Headline figures for one customer account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CustomerSummary {
    /// Identifier of the customer, as reported by the summary source.
    pub customer_id: String,
    /// Annual contract value in the account currency.
    pub account_value: f64,
    /// Risk band, normally "Low", "Medium" or "High".
    pub risk_score: String,
    /// Support plan (e.g., "Premium").
    pub support_tier: String,
    /// Human-readable time since last contact (e.g., "3 days ago").
    pub last_contact: String,
}

/// One entry of a customer's support history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SupportTicket {
    /// Date the ticket was opened (`YYYY-MM-DD`).
    pub date: String,
    /// Category of the issue (e.g., "Billing Question").
    pub issue_type: String,
    /// Priority label.
    pub priority: String,
    /// Ticket status (e.g., "Resolved", "In Progress").
    pub status: String,
    /// Time to resolution, absent while the ticket is open. Blank text is
    /// treated as absent in both directions.
    #[serde(
        default,
        serialize_with = "blank_as_null",
        deserialize_with = "non_blank_string"
    )]
    pub resolution_time: Option<String>,
}

/// Open key-value metadata about an account. Values are JSON scalars.
pub type AccountInfo = Map<String, Value>;

/// Composite response of the aggregation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CustomerContext {
    pub summary: CustomerSummary,
    /// Tickets in the order the ticket source returned them.
    pub recent_tickets: Vec<SupportTicket>,
    #[schema(value_type = Object)]
    pub account_info: AccountInfo,
}

// ============ Service Models ============

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always "healthy" while the process serves requests.
    pub status: String,
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: DateTime<Utc>,
}

/// Error body returned with HTTP 500.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    pub detail: String,
}

/// Returns true for JSON values allowed in `AccountInfo`.
pub fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

fn blank_as_null<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(text) => serializer.serialize_some(text),
        None => serializer.serialize_none(),
    }
}

fn non_blank_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
