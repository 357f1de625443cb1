//! Customer context aggregation.
//!
//! Composes the summary, ticket history and account metadata of one customer
//! into a single [`CustomerContext`]. The three retrievals have no ordering
//! dependency and run concurrently. Any failure fails the whole aggregation
//! and is logged where it is turned into a response.
use crate::errors::UpstreamError;
use crate::models::CustomerContext;
use crate::services::CustomerDataSource;
use std::sync::Arc;

#[derive(Clone)]
pub struct ContextAggregator {
    source: Arc<dyn CustomerDataSource>,
}

impl ContextAggregator {
    pub fn new(source: Arc<dyn CustomerDataSource>) -> Self {
        Self { source }
    }

    /// Builds the context for `customer_id`.
    ///
    /// The id is passed through untouched. No consistency check is made
    /// between the summary and the request.
    pub async fn get_context(&self, customer_id: &str) -> Result<CustomerContext, UpstreamError> {
        let (summary, recent_tickets, account_info) = tokio::try_join!(
            self.source.fetch_summary(customer_id),
            self.source.fetch_tickets(customer_id),
            self.source.fetch_account_info(customer_id),
        )?;

        tracing::info!(
            "Aggregated context for {}: {} tickets, {} account fields",
            customer_id,
            recent_tickets.len(),
            account_info.len()
        );

        Ok(CustomerContext {
            summary,
            recent_tickets,
            account_info,
        })
    }
}
