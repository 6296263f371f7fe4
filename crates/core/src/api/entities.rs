//! Wire representations of the three CRM entities.
//!
//! These are the shapes the API returns and the jobs client consumes. The
//! server's repository layer maps database rows into them; they carry the
//! validated newtypes so a decoded entity is well-formed by construction.
//!
//! Decimals serialize as JSON strings (workspace `rust_decimal`
//! `serde-with-str` feature) to preserve precision on the wire.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CustomerId, Email, OrderId, Phone, ProductId};

/// A CRM customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Customer ID.
    pub id: CustomerId,
    /// Display name.
    pub name: String,
    /// Email address, unique across all customers.
    pub email: Email,
    /// Optional phone number.
    pub phone: Option<Phone>,
    /// When the customer record was created.
    pub created_at: DateTime<Utc>,
}

/// A CRM product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price. Always positive.
    pub price: Decimal,
    /// Units on hand. Never negative.
    pub stock: i32,
}

/// A CRM order.
///
/// `total_amount` is the sum of the constituent product prices at creation
/// time; it is never recomputed when prices change later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Order ID.
    pub id: OrderId,
    /// The owning customer.
    pub customer: Customer,
    /// The ordered products.
    pub products: Vec<Product>,
    /// Sum of product prices at creation time.
    pub total_amount: Decimal,
    /// When the order was placed.
    pub order_date: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_price_serializes_as_string() {
        let product = Product {
            id: ProductId::new(1),
            name: "Widget".to_owned(),
            price: "19.99".parse().unwrap(),
            stock: 3,
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["price"], serde_json::json!("19.99"));
    }

    #[test]
    fn test_customer_roundtrip() {
        let customer = Customer {
            id: CustomerId::new(7),
            name: "Carol Lane".to_owned(),
            email: Email::parse("carol@example.com").unwrap(),
            phone: Some(Phone::parse("123-456-7890").unwrap()),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&customer).unwrap();
        let back: Customer = serde_json::from_str(&json).unwrap();
        assert_eq!(back, customer);
    }
}
