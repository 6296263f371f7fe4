//! Order repository for database operations.
//!
//! Orders join one customer and many products. List queries hydrate whole
//! [`Order`] values: a page of order rows, then one query fetching the
//! products for every order on the page.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use copperline_core::api::ordering::SortKey;
use copperline_core::api::{Customer, Order, OrderFilter, Product};
use copperline_core::{CustomerId, OrderId, ProductId};

use super::customers::CustomerRow;
use super::products::ProductRow;
use super::{Page, RepositoryError, contains_pattern, order_by_clause};

/// Sortable fields and the columns they map to.
const SORT_FIELDS: &[(&str, &str)] = &[
    ("id", "o.id"),
    ("order_date", "o.order_date"),
    ("total_amount", "o.total_amount"),
];

/// Shared filter predicate for `list` and its count query.
const FILTER_WHERE: &str = "($1::numeric IS NULL OR o.total_amount >= $1)
       AND ($2::numeric IS NULL OR o.total_amount <= $2)
       AND ($3::timestamptz IS NULL OR o.order_date >= $3)
       AND ($4::timestamptz IS NULL OR o.order_date <= $4)
       AND ($5::text IS NULL OR c.name ILIKE $5)
       AND ($6::text IS NULL OR EXISTS (
             SELECT 1 FROM crm.order_product op
             JOIN crm.product p ON p.id = op.product_id
             WHERE op.order_id = o.id AND p.name ILIKE $6))
       AND ($7::int4 IS NULL OR EXISTS (
             SELECT 1 FROM crm.order_product op
             WHERE op.order_id = o.id AND op.product_id = $7))";

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` order queries, with the owning
/// customer's columns joined in.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    total_amount: Decimal,
    order_date: DateTime<Utc>,
    customer_id: i32,
    customer_name: String,
    customer_email: String,
    customer_phone: Option<String>,
    customer_created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, products: Vec<Product>) -> Result<Order, RepositoryError> {
        let customer: Customer = CustomerRow {
            id: self.customer_id,
            name: self.customer_name,
            email: self.customer_email,
            phone: self.customer_phone,
            created_at: self.customer_created_at,
        }
        .try_into()?;

        Ok(Order {
            id: OrderId::new(self.id),
            customer,
            products,
            total_amount: self.total_amount,
            order_date: self.order_date,
        })
    }
}

/// Internal row type for a freshly inserted order.
#[derive(Debug, sqlx::FromRow)]
struct OrderInsertRow {
    id: i32,
    order_date: DateTime<Utc>,
}

/// Internal row type joining products to the orders on a page.
#[derive(Debug, sqlx::FromRow)]
struct OrderProductRow {
    order_id: i32,
    id: i32,
    name: String,
    price: Decimal,
    stock: i32,
}

// =============================================================================
// Repository
// =============================================================================

/// Outcome of an order insert attempt.
#[derive(Debug)]
pub enum OrderCreateOutcome {
    /// The order and its product associations were persisted.
    Created(Order),
    /// The customer reference did not resolve; nothing was persisted.
    UnknownCustomer,
    /// The product list was empty; nothing was persisted.
    NoProducts,
    /// A product reference did not resolve; nothing was persisted.
    UnknownProduct(ProductId),
}

/// Field names accepted by `order_by` on order queries.
#[must_use]
pub fn sortable_fields() -> Vec<&'static str> {
    SORT_FIELDS.iter().map(|(field, _)| *field).collect()
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an order for `customer_id` covering `product_ids`.
    ///
    /// Runs in one transaction: the customer is resolved first, then every
    /// product, the total is the sum of the resolved products' prices, and
    /// the order plus its associations are inserted together. An empty
    /// product list or an unresolvable reference leaves the store untouched.
    /// Repeated product references count once. `order_date` defaults to the
    /// current time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; nothing
    /// is persisted in that case.
    pub async fn create(
        &self,
        customer_id: CustomerId,
        product_ids: &[ProductId],
        order_date: Option<DateTime<Utc>>,
    ) -> Result<OrderCreateOutcome, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let customer_row: Option<CustomerRow> =
            sqlx::query_as("SELECT id, name, email, phone, created_at FROM crm.customer WHERE id = $1")
                .bind(customer_id.as_i32())
                .fetch_optional(&mut *tx)
                .await?;
        let Some(customer_row) = customer_row else {
            return Ok(OrderCreateOutcome::UnknownCustomer);
        };
        let customer: Customer = customer_row.try_into()?;

        if product_ids.is_empty() {
            return Ok(OrderCreateOutcome::NoProducts);
        }

        let mut unique_ids: Vec<i32> = Vec::with_capacity(product_ids.len());
        for id in product_ids {
            if !unique_ids.contains(&id.as_i32()) {
                unique_ids.push(id.as_i32());
            }
        }

        let product_rows: Vec<ProductRow> =
            sqlx::query_as("SELECT id, name, price, stock FROM crm.product WHERE id = ANY($1) ORDER BY id")
                .bind(&unique_ids)
                .fetch_all(&mut *tx)
                .await?;
        let found: Vec<i32> = product_rows.iter().map(|row| row.id).collect();
        if let Some(missing) = unique_ids.iter().find(|id| !found.contains(id)) {
            return Ok(OrderCreateOutcome::UnknownProduct(ProductId::new(*missing)));
        }

        let products: Vec<Product> = product_rows.into_iter().map(Into::into).collect();
        let total_amount: Decimal = products.iter().map(|product| product.price).sum();

        let inserted: OrderInsertRow = sqlx::query_as(
            "INSERT INTO crm.orders (customer_id, total_amount, order_date)
             VALUES ($1, $2, COALESCE($3, now()))
             RETURNING id, order_date",
        )
        .bind(customer_id.as_i32())
        .bind(total_amount)
        .bind(order_date)
        .fetch_one(&mut *tx)
        .await?;

        for product in &products {
            sqlx::query("INSERT INTO crm.order_product (order_id, product_id) VALUES ($1, $2)")
                .bind(inserted.id)
                .bind(product.id.as_i32())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(OrderCreateOutcome::Created(Order {
            id: OrderId::new(inserted.id),
            customer,
            products,
            total_amount,
            order_date: inserted.order_date,
        }))
    }

    /// List orders matching `filter`, sorted and paged, with their customers
    /// and products hydrated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list(
        &self,
        filter: &OrderFilter,
        order: &[SortKey],
        limit: i64,
        offset: i64,
    ) -> Result<Page<Order>, RepositoryError> {
        let customer_pattern = filter
            .customer_name_contains
            .as_deref()
            .map(contains_pattern);
        let product_pattern = filter.product_name_contains.as_deref().map(contains_pattern);
        let product_id = filter.product_id.map(|id| id.as_i32());

        let order_by = order_by_clause(order, SORT_FIELDS, "o.id ASC");
        let sql = format!(
            "SELECT o.id, o.total_amount, o.order_date,
                    c.id AS customer_id, c.name AS customer_name,
                    c.email AS customer_email, c.phone AS customer_phone,
                    c.created_at AS customer_created_at
             FROM crm.orders o
             JOIN crm.customer c ON c.id = o.customer_id
             WHERE {FILTER_WHERE}
             {order_by}
             LIMIT $8 OFFSET $9"
        );

        // One row beyond the page signals another page exists.
        let mut rows: Vec<OrderRow> = sqlx::query_as(&sql)
            .bind(filter.total_amount_gte)
            .bind(filter.total_amount_lte)
            .bind(filter.order_date_gte)
            .bind(filter.order_date_lte)
            .bind(customer_pattern.as_deref())
            .bind(product_pattern.as_deref())
            .bind(product_id)
            .bind(limit + 1)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;

        let count_sql = format!(
            "SELECT COUNT(*)
             FROM crm.orders o
             JOIN crm.customer c ON c.id = o.customer_id
             WHERE {FILTER_WHERE}"
        );
        let total_count: i64 = sqlx::query_scalar(&count_sql)
            .bind(filter.total_amount_gte)
            .bind(filter.total_amount_lte)
            .bind(filter.order_date_gte)
            .bind(filter.order_date_lte)
            .bind(customer_pattern.as_deref())
            .bind(product_pattern.as_deref())
            .bind(product_id)
            .fetch_one(self.pool)
            .await?;

        let page_len = usize::try_from(limit).unwrap_or(usize::MAX);
        let has_more = rows.len() > page_len;
        rows.truncate(page_len);

        let order_ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
        let mut products_by_order = self.products_for_orders(&order_ids).await?;

        let items: Vec<Order> = rows
            .into_iter()
            .map(|row| {
                let products = products_by_order.remove(&row.id).unwrap_or_default();
                row.into_order(products)
            })
            .collect::<Result<_, _>>()?;

        Ok(Page {
            items,
            total_count,
            has_more,
        })
    }

    /// Fetch the products for a set of orders, grouped by order id.
    async fn products_for_orders(
        &self,
        order_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<Product>>, RepositoryError> {
        if order_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<OrderProductRow> = sqlx::query_as(
            "SELECT op.order_id, p.id, p.name, p.price, p.stock
             FROM crm.order_product op
             JOIN crm.product p ON p.id = op.product_id
             WHERE op.order_id = ANY($1)
             ORDER BY op.order_id, p.id",
        )
        .bind(order_ids)
        .fetch_all(self.pool)
        .await?;

        let mut grouped: HashMap<i32, Vec<Product>> = HashMap::new();
        for row in rows {
            grouped.entry(row.order_id).or_default().push(Product {
                id: ProductId::new(row.id),
                name: row.name,
                price: row.price,
                stock: row.stock,
            });
        }

        Ok(grouped)
    }
}
