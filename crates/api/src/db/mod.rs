//! Database operations for the CRM `PostgreSQL` store.
//!
//! # Schema: `crm`
//!
//! ## Tables
//!
//! - `customer` - CRM customers (unique email, optional phone)
//! - `product` - Products with price and stock level
//! - `orders` - Orders (one customer, derived total, order date)
//! - `order_product` - Order/product associations
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p copperline-cli -- migrate
//! ```

pub mod customers;
pub mod orders;
pub mod products;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use copperline_core::api::ordering::{SortDirection, SortKey};

pub use customers::{BulkRowOutcome, CustomerRepository, NewCustomer};
pub use orders::{OrderCreateOutcome, OrderRepository};
pub use products::ProductRepository;

/// One repository page plus the count of rows matching the filter overall.
#[derive(Debug)]
pub struct Page<T> {
    /// Rows on this page, in query order.
    pub items: Vec<T>,
    /// Rows matching the filter across all pages.
    pub total_count: i64,
    /// Whether rows exist beyond this page.
    pub has_more: bool,
}

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Build an `ILIKE` substring pattern from raw user text.
///
/// `%`, `_` and `\` are literal characters in user input, so they are
/// escaped before wrapping the text in wildcards.
pub(crate) fn contains_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("%{escaped}%")
}

/// Build an `ILIKE` prefix pattern from raw user text.
pub(crate) fn prefix_pattern(text: &str) -> String {
    let mut pattern = contains_pattern(text);
    pattern.remove(0);
    pattern
}

/// Render validated sort keys as an `ORDER BY` clause.
///
/// `columns` maps sortable field names to column expressions; the keys were
/// already checked against the same field set, so every lookup succeeds.
/// Falls back to `default_clause` when no keys were requested.
pub(crate) fn order_by_clause(
    keys: &[SortKey],
    columns: &[(&str, &str)],
    default_clause: &str,
) -> String {
    if keys.is_empty() {
        return format!("ORDER BY {default_clause}");
    }

    let rendered: Vec<String> = keys
        .iter()
        .filter_map(|key| {
            let column = columns
                .iter()
                .find(|(field, _)| *field == key.field)
                .map(|(_, column)| *column)?;
            let direction = match key.direction {
                SortDirection::Ascending => "ASC",
                SortDirection::Descending => "DESC",
            };
            Some(format!("{column} {direction}"))
        })
        .collect();

    format!("ORDER BY {}", rendered.join(", "))
}
