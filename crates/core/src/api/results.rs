//! Response envelope and operation result payloads.
//!
//! Every response is an [`ApiResponse`]: `data` on success, `errors` when
//! the engine could not run the operation (malformed document, unknown
//! sort field, database outage on a query). Domain outcomes of mutations
//! are not errors; they are `data` payloads tagged by `status`, so a
//! rejected create still decodes as `data`.

use serde::{Deserialize, Serialize};

use super::entities::{Customer, Order, Product};
use crate::types::ProductId;

/// The envelope wrapping every operation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    /// The operation result, absent when the engine rejected the request.
    #[serde(default)]
    pub data: Option<T>,
    /// Engine-level failures. Absent on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ApiErrorMessage>>,
}

impl<T> ApiResponse<T> {
    /// Wraps a successful result.
    pub const fn data(data: T) -> Self {
        Self {
            data: Some(data),
            errors: None,
        }
    }

    /// Builds a failure response with a single message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            data: None,
            errors: Some(vec![ApiErrorMessage::new(message)]),
        }
    }

    /// Collapses the envelope into the result or the error list.
    ///
    /// A response carrying neither side is reported as an error; a
    /// well-behaved server never produces one.
    pub fn into_result(self) -> Result<T, Vec<ApiErrorMessage>> {
        match (self.data, self.errors) {
            (_, Some(errors)) if !errors.is_empty() => Err(errors),
            (Some(data), _) => Ok(data),
            (None, _) => Err(vec![ApiErrorMessage::new(
                "response contained neither data nor errors",
            )]),
        }
    }
}

/// One engine-level failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorMessage {
    pub message: String,
}

impl ApiErrorMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ApiErrorMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of the `hello` query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelloData {
    pub hello: String,
}

/// Outcome of `create_customer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CreateCustomerResult {
    /// The customer was persisted.
    Created { customer: Customer, message: String },
    /// Validation failed; nothing was persisted.
    Rejected { message: String },
}

/// Outcome of `bulk_create_customers`.
///
/// Valid rows are persisted even when other rows fail; each failure is
/// reported as a `Row N: ...` message in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkCreateCustomersResult {
    /// The customers that were persisted, in input order.
    pub customers: Vec<Customer>,
    /// One message per rejected row.
    pub errors: Vec<String>,
}

/// Outcome of `create_product`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CreateProductResult {
    Created { product: Product, message: String },
    Rejected { message: String },
}

/// Outcome of `create_order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CreateOrderResult {
    Created { order: Order, message: String },
    Rejected { message: String },
}

/// One product touched by `update_low_stock_products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockProduct {
    pub id: ProductId,
    pub name: String,
    /// Stock level after restocking.
    pub stock: i32,
}

/// Outcome of `update_low_stock_products`.
///
/// `success` is true even when no product needed restocking; only a
/// failed update reports `success: false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockUpdateResult {
    pub success: bool,
    pub message: String,
    /// Number of products restocked.
    pub updated_count: u64,
    /// The restocked products with their new stock levels.
    pub updated_products: Vec<LowStockProduct>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_success_envelope_omits_errors() {
        let response = ApiResponse::data(HelloData {
            hello: "Hello, CRM!".to_owned(),
        });
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value, json!({"data": {"hello": "Hello, CRM!"}}));
    }

    #[test]
    fn test_failure_envelope_carries_null_data() {
        let response = ApiResponse::<HelloData>::error("boom");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({"data": null, "errors": [{"message": "boom"}]})
        );
    }

    #[test]
    fn test_into_result_prefers_errors() {
        let response = ApiResponse {
            data: Some(HelloData {
                hello: "hi".to_owned(),
            }),
            errors: Some(vec![ApiErrorMessage::new("partial failure")]),
        };
        let errors = response.into_result().unwrap_err();
        assert_eq!(errors[0].message, "partial failure");
    }

    #[test]
    fn test_into_result_rejects_empty_envelope() {
        let response: ApiResponse<HelloData> = ApiResponse {
            data: None,
            errors: None,
        };
        assert!(response.into_result().is_err());
    }

    #[test]
    fn test_rejected_create_is_tagged_data() {
        let result = CreateCustomerResult::Rejected {
            message: "Email already exists.".to_owned(),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({"status": "rejected", "message": "Email already exists."})
        );
    }

    #[test]
    fn test_low_stock_result_roundtrip() {
        let result = LowStockUpdateResult {
            success: true,
            message: "Successfully updated 2 low-stock products".to_owned(),
            updated_count: 2,
            updated_products: vec![LowStockProduct {
                id: ProductId::new(9),
                name: "Widget".to_owned(),
                stock: 13,
            }],
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: LowStockUpdateResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
