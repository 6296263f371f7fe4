//! Product repository for database operations.

use rust_decimal::Decimal;
use sqlx::PgPool;

use copperline_core::ProductId;
use copperline_core::api::ordering::SortKey;
use copperline_core::api::{Product, ProductFilter};

use super::{Page, RepositoryError, contains_pattern, order_by_clause};

/// Stock level below which a product counts as low stock.
pub const LOW_STOCK_THRESHOLD: i32 = 10;

/// Units added to each low-stock product when restocking.
pub const RESTOCK_INCREMENT: i32 = 10;

/// Sortable fields and the columns they map to.
const SORT_FIELDS: &[(&str, &str)] = &[
    ("id", "id"),
    ("name", "name"),
    ("price", "price"),
    ("stock", "stock"),
];

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` product queries.
///
/// Also assembled by the order repository from joined columns.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductRow {
    pub(crate) id: i32,
    pub(crate) name: String,
    pub(crate) price: Decimal,
    pub(crate) stock: i32,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            price: row.price,
            stock: row.stock,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Field names accepted by `order_by` on product queries.
#[must_use]
pub fn sortable_fields() -> Vec<&'static str> {
    SORT_FIELDS.iter().map(|(field, _)| *field).collect()
}

/// Shared filter predicate for `list` and its count query.
fn filter_where() -> String {
    format!(
        "($1::text IS NULL OR name ILIKE $1)
           AND ($2::numeric IS NULL OR price >= $2)
           AND ($3::numeric IS NULL OR price <= $3)
           AND ($4::int4 IS NULL OR stock >= $4)
           AND ($5::int4 IS NULL OR stock <= $5)
           AND ($6::boolean IS NULL OR NOT $6 OR stock < {LOW_STOCK_THRESHOLD})"
    )
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a single product.
    ///
    /// Price and stock ranges are validated by the caller; the table's check
    /// constraints are only a backstop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        name: &str,
        price: Decimal,
        stock: i32,
    ) -> Result<Product, RepositoryError> {
        let row: ProductRow = sqlx::query_as(
            "INSERT INTO crm.product (name, price, stock)
             VALUES ($1, $2, $3)
             RETURNING id, name, price, stock",
        )
        .bind(name)
        .bind(price)
        .bind(stock)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Add `increment` units to every product with stock below `threshold`.
    ///
    /// Runs as one statement, so the update is all-or-nothing. Returns the
    /// restocked products with their new stock levels, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails; no product
    /// is changed in that case.
    pub async fn restock_low_stock(
        &self,
        threshold: i32,
        increment: i32,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            "WITH restocked AS (
                 UPDATE crm.product
                 SET stock = stock + $2
                 WHERE stock < $1
                 RETURNING id, name, price, stock
             )
             SELECT id, name, price, stock FROM restocked ORDER BY id",
        )
        .bind(threshold)
        .bind(increment)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List products matching `filter`, sorted and paged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &self,
        filter: &ProductFilter,
        order: &[SortKey],
        limit: i64,
        offset: i64,
    ) -> Result<Page<Product>, RepositoryError> {
        let name_pattern = filter.name_contains.as_deref().map(contains_pattern);
        let filter_where = filter_where();

        let order_by = order_by_clause(order, SORT_FIELDS, "id ASC");
        let sql = format!(
            "SELECT id, name, price, stock
             FROM crm.product
             WHERE {filter_where}
             {order_by}
             LIMIT $7 OFFSET $8"
        );

        // One row beyond the page signals another page exists.
        let mut rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(name_pattern.as_deref())
            .bind(filter.price_gte)
            .bind(filter.price_lte)
            .bind(filter.stock_gte)
            .bind(filter.stock_lte)
            .bind(filter.low_stock)
            .bind(limit + 1)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM crm.product WHERE {filter_where}");
        let total_count: i64 = sqlx::query_scalar(&count_sql)
            .bind(name_pattern.as_deref())
            .bind(filter.price_gte)
            .bind(filter.price_lte)
            .bind(filter.stock_gte)
            .bind(filter.stock_lte)
            .bind(filter.low_stock)
            .fetch_one(self.pool)
            .await?;

        let page_len = usize::try_from(limit).unwrap_or(usize::MAX);
        let has_more = rows.len() > page_len;
        rows.truncate(page_len);

        Ok(Page {
            items: rows.into_iter().map(Into::into).collect(),
            total_count,
            has_more,
        })
    }
}
