//! Typed client for the CRM API.
//!
//! Posts one [`ApiRequest`] per call to the single operation endpoint and
//! decodes the `data`/`errors` envelope. Transport failures, non-success
//! statuses, engine errors and empty envelopes all surface as
//! [`ApiClientError`]; domain outcomes (a rejected create, an empty restock)
//! come back as ordinary data payloads.
//!
//! Every request carries a fresh `x-request-id` header, which the server
//! echoes and records on its request span, so a job run can be correlated
//! with the server logs it produced.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

use copperline_core::api::pagination::MAX_PAGE_SIZE;
use copperline_core::api::{
    ApiErrorMessage, ApiRequest, ApiResponse, Connection, Customer, CustomerFilter, HelloData,
    LowStockUpdateResult, MutationDocument, Order, OrderFilter, QueryDocument, QueryParams,
};

use crate::config::JobsConfig;

/// Errors that can occur when calling the CRM API.
#[derive(Debug, Error)]
pub enum ApiClientError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The engine rejected the operation on the response error channel.
    #[error("API errors: {}", format_api_errors(.0))]
    Execution(Vec<ApiErrorMessage>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The envelope carried neither data nor errors.
    #[error("response contained no data")]
    MissingData,
}

fn format_api_errors(errors: &[ApiErrorMessage]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the CRM operation endpoint.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    endpoint: url::Url,
}

impl ApiClient {
    /// Create a new client for the configured endpoint.
    #[must_use]
    pub fn new(config: &JobsConfig) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                endpoint: config.api_url.clone(),
            }),
        }
    }

    /// Execute one operation document.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> Result<T, ApiClientError> {
        let request_id = Uuid::new_v4();

        let response = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .header("x-request-id", request_id.to_string())
            .json(request)
            .send()
            .await?;

        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                request_id = %request_id,
                body = %response_text.chars().take(500).collect::<String>(),
                "API returned non-success status"
            );
            return Err(ApiClientError::Status {
                status,
                body: response_text.chars().take(200).collect(),
            });
        }

        let envelope: ApiResponse<T> = match serde_json::from_str(&response_text) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    request_id = %request_id,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse API response"
                );
                return Err(ApiClientError::Parse(e));
            }
        };

        if let Some(errors) = envelope.errors
            && !errors.is_empty()
        {
            return Err(ApiClientError::Execution(errors));
        }

        envelope.data.ok_or(ApiClientError::MissingData)
    }

    /// Run the `hello` liveness query and return the greeting.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or the envelope decoding fails.
    #[instrument(skip(self))]
    pub async fn hello(&self) -> Result<String, ApiClientError> {
        let data: HelloData = self
            .execute(&ApiRequest::Query(QueryDocument::Hello))
            .await?;
        Ok(data.hello)
    }

    /// Fetch one page of customers.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or the envelope decoding fails.
    #[instrument(skip(self, params))]
    pub async fn all_customers(
        &self,
        params: QueryParams<CustomerFilter>,
    ) -> Result<Connection<Customer>, ApiClientError> {
        self.execute(&ApiRequest::Query(QueryDocument::AllCustomers(params)))
            .await
    }

    /// Total number of customers, without materializing any rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or the envelope decoding fails.
    pub async fn customer_count(&self) -> Result<i64, ApiClientError> {
        let connection = self
            .all_customers(QueryParams {
                first: Some(0),
                ..QueryParams::default()
            })
            .await?;
        Ok(connection.total_count)
    }

    /// Fetch one page of orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or the envelope decoding fails.
    #[instrument(skip(self, params))]
    pub async fn all_orders(
        &self,
        params: QueryParams<OrderFilter>,
    ) -> Result<Connection<Order>, ApiClientError> {
        self.execute(&ApiRequest::Query(QueryDocument::AllOrders(params)))
            .await
    }

    /// Fetch every order matching `filter`, paging through the connection.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    #[instrument(skip(self, filter))]
    pub async fn orders_matching(
        &self,
        filter: OrderFilter,
    ) -> Result<Vec<Order>, ApiClientError> {
        let mut orders = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let page = self
                .all_orders(QueryParams {
                    filter: Some(filter.clone()),
                    order_by: None,
                    first: Some(MAX_PAGE_SIZE),
                    after: after.take(),
                })
                .await?;

            let has_next_page = page.page_info.has_next_page;
            let end_cursor = page.page_info.end_cursor;
            orders.extend(page.nodes);

            if !has_next_page {
                break;
            }
            // A page that claims a successor but has no cursor cannot advance.
            let Some(cursor) = end_cursor else { break };
            after = Some(cursor);
        }

        Ok(orders)
    }

    /// Run the restock mutation for products with fewer than ten units.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or the envelope decoding fails.
    #[instrument(skip(self))]
    pub async fn update_low_stock_products(&self) -> Result<LowStockUpdateResult, ApiClientError> {
        self.execute(&ApiRequest::Mutation(
            MutationDocument::UpdateLowStockProducts,
        ))
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_api_errors_joins_messages() {
        let errors = vec![
            ApiErrorMessage::new("unknown sort field"),
            ApiErrorMessage::new("cursor is not valid base64"),
        ];
        assert_eq!(
            format_api_errors(&errors),
            "unknown sort field; cursor is not valid base64"
        );
    }

    #[test]
    fn test_format_api_errors_handles_empty_list() {
        assert_eq!(format_api_errors(&[]), "(no error details provided)");
    }

    #[test]
    fn test_execution_error_display() {
        let error = ApiClientError::Execution(vec![ApiErrorMessage::new("Internal server error")]);
        assert_eq!(error.to_string(), "API errors: Internal server error");
    }

    #[test]
    fn test_missing_data_display() {
        assert_eq!(
            ApiClientError::MissingData.to_string(),
            "response contained no data"
        );
    }
}
