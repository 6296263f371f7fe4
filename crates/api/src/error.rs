//! Unified error handling for the API engine.
//!
//! Domain outcomes (duplicate email, bad phone, unresolvable reference) are
//! not errors; mutations return them as structured payloads. `AppError`
//! covers the cases where the engine cannot run an operation at all, which
//! surface on the response error channel.

use thiserror::Error;

use copperline_core::api::ApiResponse;
use copperline_core::api::ordering::OrderingError;
use copperline_core::api::pagination::CursorError;

use crate::db::RepositoryError;

/// Application-level error type for the API engine.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Request document did not decode.
    #[error("Malformed request document: {0}")]
    Document(String),

    /// `order_by` named an unknown or empty field.
    #[error("{0}")]
    Ordering(#[from] OrderingError),

    /// The `after` cursor did not decode.
    #[error("{0}")]
    Cursor(#[from] CursorError),

    /// A query parameter was out of range.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Convert into the response envelope for the error channel.
    ///
    /// Infrastructure failures are captured with Sentry and logged; their
    /// details are not exposed to clients.
    pub fn into_error_response<T>(self) -> ApiResponse<T> {
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "API request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        ApiResponse::error(message)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn first_message<T>(response: ApiResponse<T>) -> String {
        response.errors.unwrap().remove(0).message
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::Document("unknown op `drop_all_tables`".to_string());
        assert_eq!(
            err.to_string(),
            "Malformed request document: unknown op `drop_all_tables`"
        );

        let err = AppError::BadRequest("first must be non-negative".to_string());
        assert_eq!(err.to_string(), "Bad request: first must be non-negative");
    }

    #[test]
    fn test_database_details_are_hidden_from_clients() {
        let err = AppError::Database(RepositoryError::DataCorruption(
            "invalid email in database".to_string(),
        ));
        let response = err.into_error_response::<()>();
        assert_eq!(first_message(response), "Internal server error");
    }

    #[test]
    fn test_request_errors_keep_their_message() {
        let err = AppError::Ordering(OrderingError::UnknownField("password".to_string()));
        let response = err.into_error_response::<()>();
        assert_eq!(first_message(response), "cannot sort by `password`");
    }
}
