//! Request documents accepted by the `POST /api` endpoint.
//!
//! A request body is an [`ApiRequest`]: either a `query` or a `mutation`
//! wrapping one operation document. Operations are tagged by `op`, with the
//! operation payload under `params` (queries) or `input` (mutations):
//!
//! ```json
//! {"query": {"op": "all_customers", "params": {"filter": {"name_contains": "Ali"}}}}
//! {"mutation": {"op": "create_customer", "input": {"name": "Alice", "email": "alice@example.com"}}}
//! ```
//!
//! Documents that fail to decode are rejected on the response error channel
//! before any operation runs.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::filters::{CustomerFilter, OrderFilter, ProductFilter};
use crate::types::{CustomerId, ProductId};

/// A complete request body: one query or one mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiRequest {
    /// Read-only operation.
    Query(QueryDocument),
    /// State-changing operation.
    Mutation(MutationDocument),
}

/// The read operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "params", rename_all = "snake_case")]
pub enum QueryDocument {
    /// Liveness probe. Returns a static greeting.
    Hello,
    /// List customers with optional filter, ordering and pagination.
    AllCustomers(QueryParams<CustomerFilter>),
    /// List products with optional filter, ordering and pagination.
    AllProducts(QueryParams<ProductFilter>),
    /// List orders with optional filter, ordering and pagination.
    AllOrders(QueryParams<OrderFilter>),
}

/// The write operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "input", rename_all = "snake_case")]
pub enum MutationDocument {
    /// Create a single customer.
    CreateCustomer(CustomerInput),
    /// Create many customers in one transaction, skipping invalid rows.
    BulkCreateCustomers(BulkCustomerInput),
    /// Create a single product.
    CreateProduct(ProductInput),
    /// Create an order for an existing customer and products.
    CreateOrder(OrderInput),
    /// Restock every product with fewer than ten units.
    UpdateLowStockProducts,
}

/// Common parameters shared by the list queries.
///
/// All fields are optional; an empty object selects everything with the
/// entity's default ordering and page size.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryParams<F> {
    /// Entity-specific filter. Conditions are combined with AND.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<F>,
    /// Sort keys, e.g. `["-created_at", "name"]`. A `-` prefix sorts
    /// descending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<Vec<String>>,
    /// Maximum number of nodes to return.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<i64>,
    /// Opaque cursor; return nodes strictly after it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

/// Input for `create_customer`, and one row of `bulk_create_customers`.
///
/// Email and phone arrive as raw strings so that format problems surface as
/// mutation messages rather than decode failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInput {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Input for `bulk_create_customers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkCustomerInput {
    pub customers: Vec<CustomerInput>,
}

/// Input for `create_product`. `stock` defaults to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i32>,
}

/// Input for `create_order`. `order_date` defaults to the current time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderInput {
    pub customer_id: CustomerId,
    pub product_ids: Vec<ProductId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_hello_request_decodes_without_params() {
        let request: ApiRequest = serde_json::from_value(json!({
            "query": {"op": "hello"}
        }))
        .unwrap();
        assert_eq!(request, ApiRequest::Query(QueryDocument::Hello));
    }

    #[test]
    fn test_list_query_decodes_params() {
        let request: ApiRequest = serde_json::from_value(json!({
            "query": {
                "op": "all_customers",
                "params": {
                    "filter": {"name_contains": "Ali"},
                    "order_by": ["-created_at"],
                    "first": 10
                }
            }
        }))
        .unwrap();
        let ApiRequest::Query(QueryDocument::AllCustomers(params)) = request else {
            panic!("expected all_customers query");
        };
        assert_eq!(
            params.filter.unwrap().name_contains.as_deref(),
            Some("Ali")
        );
        assert_eq!(params.order_by.unwrap(), vec!["-created_at".to_owned()]);
        assert_eq!(params.first, Some(10));
        assert_eq!(params.after, None);
    }

    #[test]
    fn test_empty_params_object_is_accepted() {
        let request: ApiRequest = serde_json::from_value(json!({
            "query": {"op": "all_products", "params": {}}
        }))
        .unwrap();
        let ApiRequest::Query(QueryDocument::AllProducts(params)) = request else {
            panic!("expected all_products query");
        };
        assert_eq!(params, QueryParams::default());
    }

    #[test]
    fn test_mutation_serializes_under_input_key() {
        let request = ApiRequest::Mutation(MutationDocument::CreateCustomer(CustomerInput {
            name: "Alice".to_owned(),
            email: "alice@example.com".to_owned(),
            phone: Some("123-456-7890".to_owned()),
        }));
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "mutation": {
                    "op": "create_customer",
                    "input": {
                        "name": "Alice",
                        "email": "alice@example.com",
                        "phone": "123-456-7890"
                    }
                }
            })
        );
    }

    #[test]
    fn test_low_stock_mutation_has_no_input() {
        let request: ApiRequest = serde_json::from_value(json!({
            "mutation": {"op": "update_low_stock_products"}
        }))
        .unwrap();
        assert_eq!(
            request,
            ApiRequest::Mutation(MutationDocument::UpdateLowStockProducts)
        );
    }

    #[test]
    fn test_unknown_op_is_rejected() {
        let result = serde_json::from_value::<ApiRequest>(json!({
            "query": {"op": "drop_all_tables"}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_order_input_defaults() {
        let input: OrderInput = serde_json::from_value(json!({
            "customer_id": 4,
            "product_ids": [1, 2, 2]
        }))
        .unwrap();
        assert_eq!(input.customer_id, CustomerId::new(4));
        assert_eq!(input.product_ids.len(), 3);
        assert_eq!(input.order_date, None);
    }
}
