//! Customer repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use copperline_core::api::{Customer, CustomerFilter};
use copperline_core::api::ordering::SortKey;
use copperline_core::{CustomerId, Email, Phone};

use super::{Page, RepositoryError, contains_pattern, order_by_clause, prefix_pattern};

/// Sortable fields and the columns they map to.
const SORT_FIELDS: &[(&str, &str)] = &[
    ("id", "id"),
    ("name", "name"),
    ("email", "email"),
    ("created_at", "created_at"),
];

/// Shared filter predicate for `list` and its count query.
const FILTER_WHERE: &str = "($1::text IS NULL OR name ILIKE $1)
       AND ($2::text IS NULL OR email ILIKE $2)
       AND ($3::timestamptz IS NULL OR created_at >= $3)
       AND ($4::timestamptz IS NULL OR created_at <= $4)
       AND ($5::text IS NULL OR phone ILIKE $5)";

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` customer queries.
///
/// Also assembled by the order repository from joined columns.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CustomerRow {
    pub(crate) id: i32,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) phone: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = RepositoryError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let phone = row
            .phone
            .as_deref()
            .map(Phone::parse)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid phone in database: {e}"))
            })?;

        Ok(Self {
            id: CustomerId::new(row.id),
            name: row.name,
            email,
            phone,
            created_at: row.created_at,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Validated input for customer creation.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub email: Email,
    pub phone: Option<Phone>,
}

/// Per-row outcome of a bulk customer insert.
#[derive(Debug)]
pub enum BulkRowOutcome {
    /// The row was inserted.
    Created(Customer),
    /// The row was skipped: its email exists in the table or earlier in the batch.
    DuplicateEmail,
}

/// Field names accepted by `order_by` on customer queries.
#[must_use]
pub fn sortable_fields() -> Vec<&'static str> {
    SORT_FIELDS.iter().map(|(field, _)| *field).collect()
}

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a single customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: &NewCustomer) -> Result<Customer, RepositoryError> {
        let row: CustomerRow = sqlx::query_as(
            "INSERT INTO crm.customer (name, email, phone)
             VALUES ($1, $2, $3)
             RETURNING id, name, email, phone, created_at",
        )
        .bind(&new.name)
        .bind(new.email.as_str())
        .bind(new.phone.as_ref().map(Phone::as_str))
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.try_into()
    }

    /// Insert a batch of customers in one transaction.
    ///
    /// Rows with an already-used email are skipped; every other row is
    /// inserted. Outcomes come back in input order. A database failure rolls
    /// the whole batch back.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; nothing
    /// from the batch is persisted in that case.
    pub async fn create_many(
        &self,
        rows: &[NewCustomer],
    ) -> Result<Vec<BulkRowOutcome>, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let mut outcomes = Vec::with_capacity(rows.len());

        for new in rows {
            // A unique violation would abort the surrounding transaction, so
            // duplicates are detected up front instead of caught.
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM crm.customer WHERE email = $1)")
                    .bind(new.email.as_str())
                    .fetch_one(&mut *tx)
                    .await?;
            if exists {
                outcomes.push(BulkRowOutcome::DuplicateEmail);
                continue;
            }

            let row: CustomerRow = sqlx::query_as(
                "INSERT INTO crm.customer (name, email, phone)
                 VALUES ($1, $2, $3)
                 RETURNING id, name, email, phone, created_at",
            )
            .bind(&new.name)
            .bind(new.email.as_str())
            .bind(new.phone.as_ref().map(Phone::as_str))
            .fetch_one(&mut *tx)
            .await?;

            outcomes.push(BulkRowOutcome::Created(row.try_into()?));
        }

        tx.commit().await?;
        Ok(outcomes)
    }

    /// List customers matching `filter`, sorted and paged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list(
        &self,
        filter: &CustomerFilter,
        order: &[SortKey],
        limit: i64,
        offset: i64,
    ) -> Result<Page<Customer>, RepositoryError> {
        let name_pattern = filter.name_contains.as_deref().map(contains_pattern);
        let email_pattern = filter.email_contains.as_deref().map(contains_pattern);
        let phone_pattern = filter.phone_starts_with.as_deref().map(prefix_pattern);

        let order_by = order_by_clause(order, SORT_FIELDS, "id ASC");
        let sql = format!(
            "SELECT id, name, email, phone, created_at
             FROM crm.customer
             WHERE {FILTER_WHERE}
             {order_by}
             LIMIT $6 OFFSET $7"
        );

        // One row beyond the page signals another page exists.
        let mut rows: Vec<CustomerRow> = sqlx::query_as(&sql)
            .bind(name_pattern.as_deref())
            .bind(email_pattern.as_deref())
            .bind(filter.created_at_gte)
            .bind(filter.created_at_lte)
            .bind(phone_pattern.as_deref())
            .bind(limit + 1)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM crm.customer WHERE {FILTER_WHERE}");
        let total_count: i64 = sqlx::query_scalar(&count_sql)
            .bind(name_pattern.as_deref())
            .bind(email_pattern.as_deref())
            .bind(filter.created_at_gte)
            .bind(filter.created_at_lte)
            .bind(phone_pattern.as_deref())
            .fetch_one(self.pool)
            .await?;

        let page_len = usize::try_from(limit).unwrap_or(usize::MAX);
        let has_more = rows.len() > page_len;
        rows.truncate(page_len);

        let items: Vec<Customer> = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<_, _>>()?;

        Ok(Page {
            items,
            total_count,
            has_more,
        })
    }
}
