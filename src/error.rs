use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::handlers::shared::ApiResponse;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    NothingToSettle(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Internal server error{}", .0.as_ref().map_or("".to_string(), |s| format!(": {}", s)))]
    InternalServerError(Option<String>),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        AppError::InvalidState(message.into())
    }

    pub fn internal_server_error_message(message: impl Into<String>) -> Self {
        AppError::InternalServerError(Some(message.into()))
    }

    /// Store failures are opaque to the client; everything else is safe to echo.
    pub fn client_message(&self) -> String {
        match self {
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::NothingToSettle(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidState(_) => StatusCode::CONFLICT,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            log::error!("Request failed with status {}: {}", status_code, self);
        } else {
            log::warn!("Request rejected with status {}: {}", status_code, self);
        }

        let response_body = ApiResponse::<()>::error(&self.client_message());

        HttpResponse::build(status_code).json(response_body)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        log::error!("Database error: {}", error);
        AppError::DatabaseError(error)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        log::error!("Anyhow error: {}", error);

        match error.downcast::<sqlx::Error>() {
            Ok(sqlx_err) => AppError::DatabaseError(sqlx_err),
            Err(original_error) => AppError::InternalServerError(Some(original_error.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn maps_engine_errors_to_client_statuses() {
        assert_eq!(
            AppError::validation("no entries with positive hours").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NothingToSettle("nothing".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::not_found("Work log not found").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::invalid_state("settled").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Forbidden("payroll".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn store_failures_hide_details_from_clients() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.client_message(), "Internal server error");

        let err = AppError::internal_server_error_message("pool exhausted");
        assert_eq!(err.client_message(), "Internal server error");
    }

    #[test]
    fn client_errors_keep_their_message() {
        let err = AppError::validation("no entries with positive hours");
        assert_eq!(err.client_message(), "no entries with positive hours");
    }

    #[test]
    fn anyhow_wrapping_a_sqlx_error_becomes_a_database_error() {
        let err = AppError::from(anyhow::Error::new(sqlx::Error::PoolTimedOut));
        assert!(matches!(err, AppError::DatabaseError(sqlx::Error::PoolTimedOut)));

        let err = AppError::from(anyhow::anyhow!("boom"));
        assert!(matches!(err, AppError::InternalServerError(Some(ref m)) if m == "boom"));
    }
}
