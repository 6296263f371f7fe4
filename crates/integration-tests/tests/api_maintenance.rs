//! End-to-end tests for the maintenance surface the scheduled jobs drive.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p copperline-api)
//!
//! Run with: cargo test -p copperline-integration-tests -- --ignored
//!
//! The restock tests mutate every qualifying product in the database, not
//! just their own rows, so they assert on their own rows and treat the
//! global counters as lower bounds.

use rust_decimal::Decimal;
use serde_json::json;

use copperline_integration_tests::{TestApi, base_url, unique_marker};

async fn create_product(api: &TestApi, name: &str, stock: i64) -> i64 {
    let envelope = api
        .post(&json!({
            "mutation": {"op": "create_product", "input": {
                "name": name, "price": "10.00", "stock": stock
            }}
        }))
        .await;
    assert_eq!(envelope["data"]["status"], "created");
    envelope["data"]["product"]["id"]
        .as_i64()
        .expect("created product should carry an id")
}

// ============================================================================
// Health Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_health_endpoints() {
    let base = base_url();
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{base}/health"))
        .send()
        .await
        .expect("Failed to reach health endpoint");
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let response = client
        .get(format!("{base}/health/ready"))
        .send()
        .await
        .expect("Failed to reach readiness endpoint");
    assert_eq!(response.status(), reqwest::StatusCode::OK);
}

// ============================================================================
// Low-Stock Restock Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_low_stock_restock_adds_ten() {
    let api = TestApi::new();
    let marker = unique_marker("restock");
    let low_a = create_product(&api, &format!("{marker} a"), 3).await;
    let high = create_product(&api, &format!("{marker} b"), 15).await;
    let low_b = create_product(&api, &format!("{marker} c"), 8).await;

    let envelope = api
        .post(&json!({"mutation": {"op": "update_low_stock_products"}}))
        .await;
    let data = &envelope["data"];
    assert_eq!(data["success"], true);
    assert!(
        data["message"]
            .as_str()
            .expect("restock message")
            .starts_with("Successfully updated"),
    );
    assert!(data["updated_count"].as_u64().expect("updated count") >= 2);

    let updated: Vec<(i64, i64)> = data["updated_products"]
        .as_array()
        .expect("updated products list")
        .iter()
        .map(|p| {
            (
                p["id"].as_i64().expect("product id"),
                p["stock"].as_i64().expect("product stock"),
            )
        })
        .collect();
    assert!(updated.contains(&(low_a, 13)));
    assert!(updated.contains(&(low_b, 18)));
    assert!(updated.iter().all(|(id, _)| *id != high));

    // New levels visible in the product list
    let envelope = api
        .post(&json!({
            "query": {"op": "all_products", "params": {
                "filter": {"name_contains": marker}, "order_by": ["name"]
            }}
        }))
        .await;
    let stocks: Vec<i64> = envelope["data"]["nodes"]
        .as_array()
        .expect("product nodes")
        .iter()
        .map(|node| node["stock"].as_i64().expect("stock"))
        .collect();
    assert_eq!(stocks, vec![13, 15, 18]);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_restocked_products_do_not_qualify_again() {
    let api = TestApi::new();
    let product = create_product(&api, &unique_marker("once"), 4).await;

    let envelope = api
        .post(&json!({"mutation": {"op": "update_low_stock_products"}}))
        .await;
    let restocked: Vec<i64> = envelope["data"]["updated_products"]
        .as_array()
        .expect("updated products list")
        .iter()
        .map(|p| p["id"].as_i64().expect("product id"))
        .collect();
    assert!(restocked.contains(&product));

    // Second pass: this product now sits at 14 and must be left alone
    let envelope = api
        .post(&json!({"mutation": {"op": "update_low_stock_products"}}))
        .await;
    let data = &envelope["data"];
    assert_eq!(data["success"], true);
    if data["updated_count"] == 0 {
        assert_eq!(data["message"], "No low-stock products found");
    } else {
        let restocked: Vec<i64> = data["updated_products"]
            .as_array()
            .expect("updated products list")
            .iter()
            .map(|p| p["id"].as_i64().expect("product id"))
            .collect();
        assert!(!restocked.contains(&product));
    }
}

// ============================================================================
// Report Source Tests
// ============================================================================

/// Fetch the totals the report job derives, the way the job derives them.
async fn fetch_totals(api: &TestApi) -> (i64, i64, Decimal) {
    let envelope = api
        .post(&json!({"query": {"op": "all_customers", "params": {"first": 0}}}))
        .await;
    let customer_count = envelope["data"]["total_count"]
        .as_i64()
        .expect("customer total");

    let mut orders = 0i64;
    let mut revenue = Decimal::ZERO;
    let mut after: Option<String> = None;
    loop {
        let mut params = json!({"first": 250});
        if let Some(cursor) = &after {
            params["after"] = json!(cursor);
        }
        let envelope = api
            .post(&json!({"query": {"op": "all_orders", "params": params}}))
            .await;
        let page = &envelope["data"];
        for node in page["nodes"].as_array().expect("order nodes") {
            orders += 1;
            revenue += node["total_amount"]
                .as_str()
                .expect("total amount string")
                .parse::<Decimal>()
                .expect("total amount decimal");
        }
        if page["page_info"]["has_next_page"] != true {
            break;
        }
        after = page["page_info"]["end_cursor"]
            .as_str()
            .map(ToString::to_string);
    }

    (customer_count, orders, revenue)
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_report_source_queries_are_repeatable() {
    let api = TestApi::new();

    let first = fetch_totals(&api).await;
    let second = fetch_totals(&api).await;

    assert_eq!(first, second);
}
