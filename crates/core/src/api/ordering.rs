//! Sort key parsing for the list queries.
//!
//! `order_by` entries are field names with an optional `-` prefix for
//! descending order, e.g. `["-order_date", "id"]`. Fields are checked
//! against the entity's sortable set before any SQL is assembled; an
//! unknown field fails the whole request.

use thiserror::Error;

/// Sort order for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One validated sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// A member of the entity's sortable field set.
    pub field: String,
    pub direction: SortDirection,
}

/// Reasons an `order_by` list is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderingError {
    /// The field is not sortable for this entity.
    #[error("cannot sort by `{0}`")]
    UnknownField(String),
    /// An entry was empty or a bare `-`.
    #[error("sort keys cannot be empty")]
    EmptyKey,
}

/// Parses raw `order_by` entries against a sortable field set.
///
/// Keys come back in request order; later keys break ties among earlier
/// ones.
pub fn parse_order_by(specs: &[String], allowed: &[&str]) -> Result<Vec<SortKey>, OrderingError> {
    let mut keys = Vec::with_capacity(specs.len());
    for spec in specs {
        let (field, direction) = match spec.strip_prefix('-') {
            Some(rest) => (rest, SortDirection::Descending),
            None => (spec.as_str(), SortDirection::Ascending),
        };
        if field.is_empty() {
            return Err(OrderingError::EmptyKey);
        }
        if !allowed.contains(&field) {
            return Err(OrderingError::UnknownField(field.to_owned()));
        }
        keys.push(SortKey {
            field: field.to_owned(),
            direction,
        });
    }
    Ok(keys)
}
