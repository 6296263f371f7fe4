//! Filter objects accepted by the list queries.
//!
//! Every field is optional and the set conditions are combined with AND.
//! Text matches are case-insensitive substring matches unless the field
//! name says otherwise.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// Filter for `all_customers`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_contains: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_contains: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at_gte: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at_lte: Option<DateTime<Utc>>,
    /// Prefix match on the phone number, e.g. `"+1"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_starts_with: Option<String>,
}

/// Filter for `all_products`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_contains: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_gte: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_lte: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_gte: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_lte: Option<i32>,
    /// When true, only products with stock below ten.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_stock: Option<bool>,
}

/// Filter for `all_orders`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount_gte: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount_lte: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_date_gte: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_date_lte: Option<DateTime<Utc>>,
    /// Substring match on the owning customer's name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name_contains: Option<String>,
    /// Substring match on any ordered product's name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name_contains: Option<String>,
    /// Only orders that include this product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
}
