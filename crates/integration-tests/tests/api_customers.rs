//! End-to-end tests for the customer operations.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p copperline-api)
//!
//! Run with: cargo test -p copperline-integration-tests -- --ignored

use serde_json::{Value, json};

use copperline_integration_tests::{TestApi, unique_email, unique_marker};

fn create_customer_doc(name: &str, email: &str, phone: Option<&str>) -> Value {
    let mut input = json!({"name": name, "email": email});
    if let Some(phone) = phone {
        input["phone"] = json!(phone);
    }
    json!({"mutation": {"op": "create_customer", "input": input}})
}

// ============================================================================
// Envelope Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_hello_round_trip() {
    let api = TestApi::new();

    let envelope = api.post(&json!({"query": {"op": "hello"}})).await;

    assert_eq!(envelope["data"]["hello"], "Hello, CRM!");
    assert!(envelope.get("errors").is_none());
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_unknown_operation_uses_error_channel() {
    let api = TestApi::new();

    let envelope = api
        .post(&json!({"query": {"op": "drop_everything"}}))
        .await;

    assert_eq!(envelope["data"], Value::Null);
    assert!(envelope["errors"][0]["message"].as_str().is_some());
}

// ============================================================================
// Create & Duplicate Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_create_customer_then_duplicate_is_rejected() {
    let api = TestApi::new();
    let email = unique_email("dup");

    let envelope = api
        .post(&create_customer_doc(
            "Alice Johnson",
            &email,
            Some("+1234567890"),
        ))
        .await;
    let data = &envelope["data"];
    assert_eq!(data["status"], "created");
    assert_eq!(data["message"], "Customer created successfully.");
    assert_eq!(data["customer"]["email"], email.as_str());
    assert!(data["customer"]["id"].as_i64().is_some());

    // Same email again, different details: rejected, not an engine error
    let envelope = api
        .post(&create_customer_doc("Alice Again", &email, None))
        .await;
    assert_eq!(envelope["data"]["status"], "rejected");
    assert_eq!(envelope["data"]["message"], "Email already exists.");
    assert!(envelope.get("errors").is_none());
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_phone_formats() {
    let api = TestApi::new();

    // Both accepted shapes
    for phone in ["+1234567890", "123-456-7890"] {
        let envelope = api
            .post(&create_customer_doc(
                "Phone Check",
                &unique_email("phone"),
                Some(phone),
            ))
            .await;
        assert_eq!(
            envelope["data"]["status"], "created",
            "phone {phone} should be accepted"
        );
        assert_eq!(envelope["data"]["customer"]["phone"], phone);
    }

    // Rejected shapes create nothing
    for phone in ["12-34", "1234567890", "+123456789", "123-456-789"] {
        let envelope = api
            .post(&create_customer_doc(
                "Phone Check",
                &unique_email("phone"),
                Some(phone),
            ))
            .await;
        assert_eq!(
            envelope["data"]["status"], "rejected",
            "phone {phone} should be rejected"
        );
        assert_eq!(envelope["data"]["message"], "Invalid phone format.");
    }
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_empty_phone_is_stored_as_null() {
    let api = TestApi::new();

    let envelope = api
        .post(&create_customer_doc(
            "No Phone",
            &unique_email("nophone"),
            Some(""),
        ))
        .await;

    assert_eq!(envelope["data"]["status"], "created");
    assert_eq!(envelope["data"]["customer"]["phone"], Value::Null);
}

// ============================================================================
// Bulk Create Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_bulk_create_keeps_valid_rows() {
    let api = TestApi::new();
    let first = unique_email("bulk");
    let third = unique_email("bulk");

    // Row 2 duplicates row 1, which lands earlier in the same batch
    let envelope = api
        .post(&json!({
            "mutation": {"op": "bulk_create_customers", "input": {"customers": [
                {"name": "Bulk One", "email": first},
                {"name": "Bulk Two", "email": first},
                {"name": "Bulk Three", "email": third},
            ]}}
        }))
        .await;

    let data = &envelope["data"];
    assert_eq!(data["customers"].as_array().map(Vec::len), Some(2));
    assert_eq!(data["customers"][0]["email"], first.as_str());
    assert_eq!(data["customers"][1]["email"], third.as_str());
    assert_eq!(data["errors"], json!(["Row 2: Email already exists."]));
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_bulk_create_reports_invalid_rows_in_order() {
    let api = TestApi::new();

    let envelope = api
        .post(&json!({
            "mutation": {"op": "bulk_create_customers", "input": {"customers": [
                {"name": "Bad Email", "email": "not-an-email"},
                {"name": "Fine", "email": unique_email("bulk")},
                {"name": "Bad Phone", "email": unique_email("bulk"), "phone": "12-34"},
            ]}}
        }))
        .await;

    let data = &envelope["data"];
    assert_eq!(data["customers"].as_array().map(Vec::len), Some(1));
    assert_eq!(
        data["errors"],
        json!([
            "Row 1: Invalid email format.",
            "Row 3: Invalid phone format."
        ])
    );
}

// ============================================================================
// List & Pagination Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_customer_filter_and_cursor_walk() {
    let api = TestApi::new();
    let marker = unique_marker("walk");

    for n in 1..=3 {
        let envelope = api
            .post(&create_customer_doc(
                &format!("{marker} {n}"),
                &unique_email("walk"),
                None,
            ))
            .await;
        assert_eq!(envelope["data"]["status"], "created");
    }

    // First page of two
    let envelope = api
        .post(&json!({
            "query": {"op": "all_customers", "params": {
                "filter": {"name_contains": marker},
                "order_by": ["name"],
                "first": 2
            }}
        }))
        .await;
    let page = &envelope["data"];
    assert_eq!(page["total_count"], 3);
    assert_eq!(page["nodes"].as_array().map(Vec::len), Some(2));
    assert_eq!(page["page_info"]["has_next_page"], true);
    assert_eq!(page["page_info"]["has_previous_page"], false);
    let cursor = page["page_info"]["end_cursor"]
        .as_str()
        .expect("page should carry an end cursor")
        .to_string();

    // Remainder after the cursor
    let envelope = api
        .post(&json!({
            "query": {"op": "all_customers", "params": {
                "filter": {"name_contains": marker},
                "order_by": ["name"],
                "first": 2,
                "after": cursor
            }}
        }))
        .await;
    let page = &envelope["data"];
    assert_eq!(page["nodes"].as_array().map(Vec::len), Some(1));
    assert_eq!(page["nodes"][0]["name"], format!("{marker} 3"));
    assert_eq!(page["page_info"]["has_next_page"], false);
    assert_eq!(page["page_info"]["has_previous_page"], true);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_malformed_cursor_is_an_engine_error() {
    let api = TestApi::new();

    let envelope = api
        .post(&json!({
            "query": {"op": "all_customers", "params": {"after": "!!!"}}
        }))
        .await;

    assert_eq!(envelope["data"], Value::Null);
    assert_eq!(envelope["errors"][0]["message"], "cursor is not valid base64");
}
