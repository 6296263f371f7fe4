//! The query/mutation surface.
//!
//! # Operations
//!
//! ```text
//! POST /api - execute one query or mutation document
//!
//! # Queries
//! hello                      - liveness probe
//! all_customers              - filtered, ordered, paginated customers
//! all_products               - filtered, ordered, paginated products
//! all_orders                 - filtered, ordered, paginated orders
//!
//! # Mutations
//! create_customer            - create one customer
//! bulk_create_customers      - create many customers in one transaction
//! create_product             - create one product
//! create_order               - create an order with product associations
//! update_low_stock_products  - restock every product below the threshold
//! ```
//!
//! Every executed document answers HTTP 200 with an [`ApiResponse`]
//! envelope. The envelope's error channel carries engine failures only;
//! domain rejections come back as tagged `data` payloads (see
//! [`crate::error::AppError`]).

pub mod mutation;
pub mod query;

use axum::{Json, Router, extract::State, routing::post};
use serde::Serialize;
use serde_json::Value;

use copperline_core::api::{ApiRequest, ApiResponse, MutationDocument, QueryDocument};

use crate::error::AppError;
use crate::state::AppState;

/// Create the API routes router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api", post(execute))
}

/// Execute one request document.
///
/// POST /api
///
/// The body is decoded here rather than by a typed extractor so that a
/// malformed document still answers with the envelope instead of a bare
/// 422.
pub async fn execute(State(state): State<AppState>, Json(body): Json<Value>) -> Json<Value> {
    let request = match serde_json::from_value::<ApiRequest>(body) {
        Ok(request) => request,
        Err(e) => {
            return envelope(AppError::Document(e.to_string()).into_error_response::<()>());
        }
    };

    match request {
        ApiRequest::Query(document) => match document {
            QueryDocument::Hello => envelope(query::hello()),
            QueryDocument::AllCustomers(params) => {
                envelope(query::all_customers(&state, params).await)
            }
            QueryDocument::AllProducts(params) => {
                envelope(query::all_products(&state, params).await)
            }
            QueryDocument::AllOrders(params) => envelope(query::all_orders(&state, params).await),
        },
        ApiRequest::Mutation(document) => match document {
            MutationDocument::CreateCustomer(input) => {
                envelope(mutation::create_customer(&state, input).await)
            }
            MutationDocument::BulkCreateCustomers(input) => {
                envelope(mutation::bulk_create_customers(&state, input).await)
            }
            MutationDocument::CreateProduct(input) => {
                envelope(mutation::create_product(&state, input).await)
            }
            MutationDocument::CreateOrder(input) => {
                envelope(mutation::create_order(&state, input).await)
            }
            MutationDocument::UpdateLowStockProducts => {
                envelope(mutation::update_low_stock_products(&state).await)
            }
        },
    }
}

/// Serialize a typed envelope for the wire.
fn envelope<T: Serialize>(response: ApiResponse<T>) -> Json<Value> {
    match serde_json::to_value(&response) {
        Ok(value) => Json(value),
        Err(e) => {
            let fallback = AppError::Internal(format!("response serialization failed: {e}"))
                .into_error_response::<()>();
            Json(serde_json::to_value(&fallback).unwrap_or_else(|_| {
                serde_json::json!({"data": null, "errors": [{"message": "Internal server error"}]})
            }))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use copperline_core::api::HelloData;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_envelope_serializes_data() {
        let Json(value) = envelope(ApiResponse::data(HelloData {
            hello: "Hello, CRM!".to_owned(),
        }));
        assert_eq!(value, json!({"data": {"hello": "Hello, CRM!"}}));
    }

    #[test]
    fn test_malformed_document_error_keeps_envelope_shape() {
        let response = AppError::Document("unknown op".to_owned()).into_error_response::<()>();
        let Json(value) = envelope(response);
        assert_eq!(value["data"], Value::Null);
        assert_eq!(
            value["errors"][0]["message"],
            "Malformed request document: unknown op"
        );
    }
}
