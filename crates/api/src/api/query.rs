//! Read operation resolvers.
//!
//! Each list resolver turns `QueryParams` into a LIMIT/OFFSET window and a
//! sort key list, runs one repository page fetch, and wraps the page as a
//! cursor [`Connection`]. Engine failures (bad cursor, unknown sort field,
//! store errors) surface on the envelope's error channel.

use copperline_core::api::ordering::parse_order_by;
use copperline_core::api::pagination::{
    Connection, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, decode_cursor,
};
use copperline_core::api::{
    ApiResponse, Customer, CustomerFilter, HelloData, Order, OrderFilter, Product, ProductFilter,
    QueryParams,
};

use crate::db::{self, CustomerRepository, OrderRepository, ProductRepository};
use crate::error::AppError;
use crate::state::AppState;

/// Resolve the `hello` liveness probe.
pub fn hello() -> ApiResponse<HelloData> {
    ApiResponse::data(HelloData {
        hello: "Hello, CRM!".to_owned(),
    })
}

/// Resolve `all_customers`.
pub async fn all_customers(
    state: &AppState,
    params: QueryParams<CustomerFilter>,
) -> ApiResponse<Connection<Customer>> {
    respond(run_all_customers(state, params).await)
}

async fn run_all_customers(
    state: &AppState,
    params: QueryParams<CustomerFilter>,
) -> Result<Connection<Customer>, AppError> {
    let (limit, offset) = page_window(params.first, params.after.as_deref())?;
    let keys = parse_order_by(
        params.order_by.as_deref().unwrap_or_default(),
        &db::customers::sortable_fields(),
    )?;
    let filter = params.filter.unwrap_or_default();

    let page = CustomerRepository::new(state.pool())
        .list(&filter, &keys, limit, offset)
        .await?;
    Ok(Connection::from_offset_page(
        page.items,
        offset,
        page.total_count,
        page.has_more,
    ))
}

/// Resolve `all_products`.
pub async fn all_products(
    state: &AppState,
    params: QueryParams<ProductFilter>,
) -> ApiResponse<Connection<Product>> {
    respond(run_all_products(state, params).await)
}

async fn run_all_products(
    state: &AppState,
    params: QueryParams<ProductFilter>,
) -> Result<Connection<Product>, AppError> {
    let (limit, offset) = page_window(params.first, params.after.as_deref())?;
    let keys = parse_order_by(
        params.order_by.as_deref().unwrap_or_default(),
        &db::products::sortable_fields(),
    )?;
    let filter = params.filter.unwrap_or_default();

    let page = ProductRepository::new(state.pool())
        .list(&filter, &keys, limit, offset)
        .await?;
    Ok(Connection::from_offset_page(
        page.items,
        offset,
        page.total_count,
        page.has_more,
    ))
}

/// Resolve `all_orders`.
pub async fn all_orders(
    state: &AppState,
    params: QueryParams<OrderFilter>,
) -> ApiResponse<Connection<Order>> {
    respond(run_all_orders(state, params).await)
}

async fn run_all_orders(
    state: &AppState,
    params: QueryParams<OrderFilter>,
) -> Result<Connection<Order>, AppError> {
    let (limit, offset) = page_window(params.first, params.after.as_deref())?;
    let keys = parse_order_by(
        params.order_by.as_deref().unwrap_or_default(),
        &db::orders::sortable_fields(),
    )?;
    let filter = params.filter.unwrap_or_default();

    let page = OrderRepository::new(state.pool())
        .list(&filter, &keys, limit, offset)
        .await?;
    Ok(Connection::from_offset_page(
        page.items,
        offset,
        page.total_count,
        page.has_more,
    ))
}

/// Wrap a resolver result in the response envelope.
fn respond<T>(result: Result<T, AppError>) -> ApiResponse<T> {
    match result {
        Ok(data) => ApiResponse::data(data),
        Err(error) => error.into_error_response(),
    }
}

/// Resolve `first`/`after` into a LIMIT/OFFSET window.
///
/// A missing `first` selects the default page size; anything above the cap
/// is clamped down to it. The offset lands one past the `after` cursor.
fn page_window(first: Option<i64>, after: Option<&str>) -> Result<(i64, i64), AppError> {
    let limit = match first {
        None => DEFAULT_PAGE_SIZE,
        Some(n) if n < 0 => {
            return Err(AppError::BadRequest("first must be non-negative".to_owned()));
        }
        Some(n) => n.min(MAX_PAGE_SIZE),
    };
    let offset = match after {
        None => 0,
        Some(cursor) => decode_cursor(cursor)?.saturating_add(1),
    };
    Ok((limit, offset))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use copperline_core::api::pagination::encode_cursor;

    use super::*;

    #[test]
    fn test_hello_greeting() {
        let response = hello();
        assert_eq!(response.data.unwrap().hello, "Hello, CRM!");
    }

    #[test]
    fn test_page_window_defaults() {
        assert_eq!(page_window(None, None).unwrap(), (DEFAULT_PAGE_SIZE, 0));
    }

    #[test]
    fn test_page_window_clamps_oversized_first() {
        let (limit, _) = page_window(Some(MAX_PAGE_SIZE + 1), None).unwrap();
        assert_eq!(limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_page_window_rejects_negative_first() {
        let err = page_window(Some(-1), None).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_page_window_starts_after_cursor() {
        let cursor = encode_cursor(41);
        let (_, offset) = page_window(None, Some(&cursor)).unwrap();
        assert_eq!(offset, 42);
    }

    #[test]
    fn test_page_window_rejects_bad_cursor() {
        let err = page_window(None, Some("not base64!")).unwrap_err();
        assert!(matches!(err, AppError::Cursor(_)));
    }
}
