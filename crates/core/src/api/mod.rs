//! Wire protocol for the Copperline query/mutation surface.
//!
//! A single endpoint (`POST /api`) accepts one typed document per request
//! and answers with a `data`/`errors` envelope. The server deserializes
//! [`ApiRequest`] and serializes [`ApiResponse`]; the jobs client does the
//! reverse. Expected domain failures (duplicate email, bad phone, missing
//! reference, empty selection, no qualifying rows) travel inside `data` as
//! tagged result payloads; the `errors` channel is reserved for the
//! execution engine itself (unknown operation, invalid cursor or ordering
//! field, repository failure during a query).

pub mod documents;
pub mod entities;
pub mod filters;
pub mod ordering;
pub mod pagination;
pub mod results;

pub use documents::{
    ApiRequest, BulkCustomerInput, CustomerInput, MutationDocument, OrderInput, ProductInput,
    QueryDocument, QueryParams,
};
pub use entities::{Customer, Order, Product};
pub use filters::{CustomerFilter, OrderFilter, ProductFilter};
pub use ordering::{OrderingError, SortDirection, SortKey, parse_order_by};
pub use pagination::{Connection, CursorError, PageInfo, decode_cursor, encode_cursor};
pub use results::{
    ApiErrorMessage, ApiResponse, BulkCreateCustomersResult, CreateCustomerResult,
    CreateOrderResult, CreateProductResult, HelloData, LowStockProduct, LowStockUpdateResult,
};
