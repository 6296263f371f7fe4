//! End-to-end tests for product and order operations.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p copperline-api)
//!
//! Run with: cargo test -p copperline-integration-tests -- --ignored

use rust_decimal::Decimal;
use serde_json::{Value, json};

use copperline_integration_tests::{TestApi, unique_email, unique_marker};

async fn create_product(api: &TestApi, name: &str, price: &str, stock: i64) -> i64 {
    let envelope = api
        .post(&json!({
            "mutation": {"op": "create_product", "input": {
                "name": name, "price": price, "stock": stock
            }}
        }))
        .await;
    assert_eq!(envelope["data"]["status"], "created");
    envelope["data"]["product"]["id"]
        .as_i64()
        .expect("created product should carry an id")
}

async fn create_customer(api: &TestApi, name: &str) -> i64 {
    let envelope = api
        .post(&json!({
            "mutation": {"op": "create_customer", "input": {
                "name": name, "email": unique_email("order")
            }}
        }))
        .await;
    assert_eq!(envelope["data"]["status"], "created");
    envelope["data"]["customer"]["id"]
        .as_i64()
        .expect("created customer should carry an id")
}

fn as_decimal(value: &Value) -> Decimal {
    value
        .as_str()
        .expect("decimal fields travel as strings")
        .parse()
        .expect("decimal fields parse exactly")
}

// ============================================================================
// Product Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_create_product_round_trip() {
    let api = TestApi::new();
    let name = unique_marker("widget");

    let envelope = api
        .post(&json!({
            "mutation": {"op": "create_product", "input": {
                "name": name, "price": "19.99", "stock": 7
            }}
        }))
        .await;

    let data = &envelope["data"];
    assert_eq!(data["status"], "created");
    assert_eq!(data["message"], "Product created successfully.");
    assert_eq!(data["product"]["name"], name.as_str());
    assert_eq!(as_decimal(&data["product"]["price"]), Decimal::new(1999, 2));
    assert_eq!(data["product"]["stock"], 7);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_product_stock_defaults_to_zero() {
    let api = TestApi::new();

    let envelope = api
        .post(&json!({
            "mutation": {"op": "create_product", "input": {
                "name": unique_marker("bare"), "price": "5.00"
            }}
        }))
        .await;

    assert_eq!(envelope["data"]["status"], "created");
    assert_eq!(envelope["data"]["product"]["stock"], 0);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_product_price_must_be_positive() {
    let api = TestApi::new();

    for price in ["0.00", "-5.00"] {
        let envelope = api
            .post(&json!({
                "mutation": {"op": "create_product", "input": {
                    "name": unique_marker("badprice"), "price": price
                }}
            }))
            .await;
        assert_eq!(
            envelope["data"]["status"], "rejected",
            "price {price} should be rejected"
        );
        assert_eq!(envelope["data"]["message"], "Price must be positive.");
    }
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_product_stock_cannot_be_negative() {
    let api = TestApi::new();

    let envelope = api
        .post(&json!({
            "mutation": {"op": "create_product", "input": {
                "name": unique_marker("badstock"), "price": "5.00", "stock": -1
            }}
        }))
        .await;

    assert_eq!(envelope["data"]["status"], "rejected");
    assert_eq!(envelope["data"]["message"], "Stock cannot be negative.");
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_low_stock_filter_keeps_products_below_ten() {
    let api = TestApi::new();
    let marker = unique_marker("threshold");
    let below = create_product(&api, &format!("{marker} below"), "5.00", 9).await;
    create_product(&api, &format!("{marker} at"), "5.00", 10).await;

    let envelope = api
        .post(&json!({
            "query": {"op": "all_products", "params": {
                "filter": {"name_contains": marker, "low_stock": true}
            }}
        }))
        .await;

    let data = &envelope["data"];
    assert_eq!(data["total_count"], 1);
    let nodes = data["nodes"].as_array().expect("product nodes");
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0]["id"], below);
    assert_eq!(nodes[0]["stock"], 9);

    // low_stock false places no constraint at all
    let envelope = api
        .post(&json!({
            "query": {"op": "all_products", "params": {
                "filter": {"name_contains": marker, "low_stock": false}
            }}
        }))
        .await;
    assert_eq!(envelope["data"]["total_count"], 2);
}

// ============================================================================
// Order Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_create_order_totals_its_products() {
    let api = TestApi::new();
    let customer_id = create_customer(&api, "Order Total").await;
    let first = create_product(&api, &unique_marker("total"), "19.99", 5).await;
    let second = create_product(&api, &unique_marker("total"), "5.01", 5).await;

    let envelope = api
        .post(&json!({
            "mutation": {"op": "create_order", "input": {
                "customer_id": customer_id, "product_ids": [first, second]
            }}
        }))
        .await;

    let data = &envelope["data"];
    assert_eq!(data["status"], "created");
    assert_eq!(data["message"], "Order created successfully.");
    assert_eq!(data["order"]["customer"]["id"], customer_id);
    assert_eq!(data["order"]["products"].as_array().map(Vec::len), Some(2));
    assert_eq!(as_decimal(&data["order"]["total_amount"]), Decimal::new(2500, 2));
    assert!(data["order"]["order_date"].as_str().is_some());
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_duplicate_product_references_count_once() {
    let api = TestApi::new();
    let customer_id = create_customer(&api, "Dedup").await;
    let product = create_product(&api, &unique_marker("dedup"), "10.00", 5).await;

    let envelope = api
        .post(&json!({
            "mutation": {"op": "create_order", "input": {
                "customer_id": customer_id, "product_ids": [product, product]
            }}
        }))
        .await;

    let data = &envelope["data"];
    assert_eq!(data["status"], "created");
    assert_eq!(data["order"]["products"].as_array().map(Vec::len), Some(1));
    assert_eq!(as_decimal(&data["order"]["total_amount"]), Decimal::new(1000, 2));
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_order_accepts_explicit_order_date() {
    let api = TestApi::new();
    let customer_id = create_customer(&api, "Backdated").await;
    let product = create_product(&api, &unique_marker("backdate"), "10.00", 5).await;

    let envelope = api
        .post(&json!({
            "mutation": {"op": "create_order", "input": {
                "customer_id": customer_id,
                "product_ids": [product],
                "order_date": "2026-08-10T12:00:00Z"
            }}
        }))
        .await;

    let data = &envelope["data"];
    assert_eq!(data["status"], "created");
    let order_date = data["order"]["order_date"]
        .as_str()
        .expect("order date should be present");
    assert!(
        order_date.starts_with("2026-08-10T12:00:00"),
        "unexpected order date {order_date}"
    );
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_order_rejects_unknown_customer() {
    let api = TestApi::new();
    let product = create_product(&api, &unique_marker("orphan"), "10.00", 5).await;

    let envelope = api
        .post(&json!({
            "mutation": {"op": "create_order", "input": {
                "customer_id": 99_999_999, "product_ids": [product]
            }}
        }))
        .await;

    assert_eq!(envelope["data"]["status"], "rejected");
    assert_eq!(envelope["data"]["message"], "Invalid customer ID.");
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_order_requires_at_least_one_product() {
    let api = TestApi::new();
    let customer_id = create_customer(&api, "Empty Cart").await;

    let envelope = api
        .post(&json!({
            "mutation": {"op": "create_order", "input": {
                "customer_id": customer_id, "product_ids": []
            }}
        }))
        .await;

    assert_eq!(envelope["data"]["status"], "rejected");
    assert_eq!(
        envelope["data"]["message"],
        "At least one product must be selected."
    );
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_order_with_unknown_product_creates_nothing() {
    let api = TestApi::new();
    let marker = unique_marker("atomic");
    let customer_id = create_customer(&api, &marker).await;
    let product = create_product(&api, &unique_marker("atomic"), "10.00", 5).await;

    let envelope = api
        .post(&json!({
            "mutation": {"op": "create_order", "input": {
                "customer_id": customer_id, "product_ids": [product, 99_999_999]
            }}
        }))
        .await;

    assert_eq!(envelope["data"]["status"], "rejected");
    assert_eq!(
        envelope["data"]["message"],
        "Invalid product ID: 99999999"
    );

    // The valid reference must not have produced a partial order
    let envelope = api
        .post(&json!({
            "query": {"op": "all_orders", "params": {
                "filter": {"customer_name_contains": marker}
            }}
        }))
        .await;
    assert_eq!(envelope["data"]["total_count"], 0);
}
