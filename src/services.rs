use crate::errors::UpstreamError;
use crate::models::*;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;

/// The three backing retrievals the aggregator composes.
///
/// Implementations must be independent: the aggregator issues all three
/// calls concurrently for one customer.
#[async_trait]
pub trait CustomerDataSource: Send + Sync {
    /// Account headline figures.
    async fn fetch_summary(&self, customer_id: &str) -> Result<CustomerSummary, UpstreamError>;

    /// Support history, most recent first.
    async fn fetch_tickets(&self, customer_id: &str) -> Result<Vec<SupportTicket>, UpstreamError>;

    /// Open account metadata.
    async fn fetch_account_info(&self, customer_id: &str) -> Result<AccountInfo, UpstreamError>;
}

/// Data source returning fixed demonstration data for every customer.
#[derive(Debug, Clone, Default)]
pub struct StubCustomerService;

impl StubCustomerService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CustomerDataSource for StubCustomerService {
    async fn fetch_summary(&self, customer_id: &str) -> Result<CustomerSummary, UpstreamError> {
        Ok(CustomerSummary {
            customer_id: customer_id.to_string(),
            account_value: 45230.00,
            risk_score: "Low".to_string(),
            support_tier: "Premium".to_string(),
            last_contact: "3 days ago".to_string(),
        })
    }

    async fn fetch_tickets(&self, _customer_id: &str) -> Result<Vec<SupportTicket>, UpstreamError> {
        Ok(vec![
            SupportTicket {
                date: "2025-09-15".to_string(),
                issue_type: "Technical Issue".to_string(),
                priority: "High".to_string(),
                status: "Resolved".to_string(),
                resolution_time: Some("4.2 hours".to_string()),
            },
            SupportTicket {
                date: "2025-09-10".to_string(),
                issue_type: "Billing Question".to_string(),
                priority: "Medium".to_string(),
                status: "Resolved".to_string(),
                resolution_time: Some("1.8 hours".to_string()),
            },
        ])
    }

    async fn fetch_account_info(&self, _customer_id: &str) -> Result<AccountInfo, UpstreamError> {
        let mut info = AccountInfo::new();
        info.insert("account_manager".to_string(), json!("Sarah Johnson"));
        info.insert("implementation_date".to_string(), json!("March 15, 2023"));
        info.insert("license_count".to_string(), json!(125));
        info.insert("contract_end_date".to_string(), json!("March 15, 2026"));
        Ok(info)
    }
}

/// Data source reading JSON documents from an upstream CRM over HTTP.
///
/// Layout: `{base}/customers/{id}/summary`, `/tickets` and `/account`.
#[derive(Clone)]
pub struct RemoteCustomerService {
    client: Client,
    base_url: String,
}

impl RemoteCustomerService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Unavailable {
                source: "http client",
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn resource_url(
        &self,
        source: &'static str,
        customer_id: &str,
        resource: &str,
    ) -> Result<reqwest::Url, UpstreamError> {
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            UpstreamError::Unavailable {
                source,
                message: format!("Failed to build URL: {}", e),
            }
        })?;

        // Pushing segments percent-encodes the id, so "a/b" stays one segment
        url.path_segments_mut()
            .map_err(|_| UpstreamError::Unavailable {
                source,
                message: format!("Base URL {} cannot carry a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(["customers", customer_id, resource]);

        Ok(url)
    }

    /// GET a resource and decode its JSON body, failing on any non-success status.
    async fn get_json<T: DeserializeOwned>(
        &self,
        source: &'static str,
        customer_id: &str,
        resource: &str,
    ) -> Result<T, UpstreamError> {
        let url = self.resource_url(source, customer_id, resource)?;
        tracing::debug!("Fetching {} for customer {}: {}", source, customer_id, url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| UpstreamError::Unavailable {
                source,
                message: format!("request failed: {}", e),
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(UpstreamError::NotFound(customer_id.to_string()));
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("{} source returned error {}: {}", source, status, error_text);
            return Err(UpstreamError::Unavailable {
                source,
                message: format!("returned status {}: {}", status, error_text),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| UpstreamError::InvalidResponse {
                source,
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl CustomerDataSource for RemoteCustomerService {
    async fn fetch_summary(&self, customer_id: &str) -> Result<CustomerSummary, UpstreamError> {
        self.get_json("summary", customer_id, "summary").await
    }

    async fn fetch_tickets(&self, customer_id: &str) -> Result<Vec<SupportTicket>, UpstreamError> {
        self.get_json("tickets", customer_id, "tickets").await
    }

    async fn fetch_account_info(&self, customer_id: &str) -> Result<AccountInfo, UpstreamError> {
        let info: AccountInfo = self.get_json("account", customer_id, "account").await?;

        if let Some((key, _)) = info.iter().find(|(_, value)| !is_scalar(value)) {
            return Err(UpstreamError::InvalidResponse {
                source: "account",
                message: format!("value for '{}' is not a scalar", key),
            });
        }

        Ok(info)
    }
}
