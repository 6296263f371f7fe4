//! Offset-based cursor pagination for the list queries.
//!
//! Cursors are opaque to clients: base64 over an `offset:N` payload where
//! `N` is the zero-based position of a node in the filtered, ordered
//! result set. A page request of `first` nodes `after` a cursor resolves
//! to offset `N + 1`.

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page size applied when a query sends no `first`.
pub const DEFAULT_PAGE_SIZE: i64 = 100;

/// Hard cap on `first`; larger requests are clamped down to this.
pub const MAX_PAGE_SIZE: i64 = 250;

const CURSOR_PAYLOAD_PREFIX: &str = "offset:";

/// One page of nodes plus paging metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection<T> {
    /// The nodes on this page, in query order.
    pub nodes: Vec<T>,
    /// Total number of nodes matching the filter, across all pages.
    pub total_count: i64,
    pub page_info: PageInfo,
}

/// Paging metadata for one [`Connection`] page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    /// Cursor of the first node on this page, if any.
    pub start_cursor: Option<String>,
    /// Cursor of the last node on this page, if any.
    pub end_cursor: Option<String>,
}

impl<T> Connection<T> {
    /// Assembles a page from nodes fetched at `offset`.
    ///
    /// `has_next_page` is decided by the caller, which knows whether the
    /// underlying fetch saw a row beyond the page.
    pub fn from_offset_page(
        nodes: Vec<T>,
        offset: i64,
        total_count: i64,
        has_next_page: bool,
    ) -> Self {
        let last_index = i64::try_from(nodes.len())
            .unwrap_or(i64::MAX)
            .saturating_sub(1);
        let page_info = PageInfo {
            has_next_page,
            has_previous_page: offset > 0,
            start_cursor: (!nodes.is_empty()).then(|| encode_cursor(offset)),
            end_cursor: (!nodes.is_empty()).then(|| encode_cursor(offset + last_index)),
        };
        Self {
            nodes,
            total_count,
            page_info,
        }
    }
}

/// Reasons a cursor fails to decode.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CursorError {
    /// Not valid base64.
    #[error("cursor is not valid base64")]
    Encoding,
    /// Decoded payload is not an `offset:N` record.
    #[error("cursor payload is malformed")]
    Payload,
}

/// Encodes a zero-based offset as an opaque cursor.
pub fn encode_cursor(offset: i64) -> String {
    STANDARD.encode(format!("{CURSOR_PAYLOAD_PREFIX}{offset}"))
}

/// Decodes a cursor back to its zero-based offset.
pub fn decode_cursor(cursor: &str) -> Result<i64, CursorError> {
    let raw = STANDARD
        .decode(cursor)
        .map_err(|_| CursorError::Encoding)?;
    let payload = String::from_utf8(raw).map_err(|_| CursorError::Payload)?;
    let offset = payload
        .strip_prefix(CURSOR_PAYLOAD_PREFIX)
        .and_then(|digits| digits.parse::<i64>().ok())
        .ok_or(CursorError::Payload)?;
    if offset < 0 {
        return Err(CursorError::Payload);
    }
    Ok(offset)
}
