//! Request-level error taxonomy for the HTTP boundary.
//!
//! Every failure surfaces to the client as `{"success": false, "message",
//! "code"}` with a stable machine-readable code. Internal detail (Diesel
//! and pool errors) is logged and never leaks into the response body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Wrong HTTP verb for the endpoint.
    #[error("Invalid request method")]
    InvalidRequestMethod,
    /// A required field is missing or malformed.
    #[error("{0}")]
    InvalidInput(String),
    /// The engagement action string is not one of the supported actions.
    #[error("Invalid action")]
    InvalidAction,
    /// The referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),
    /// A uniqueness invariant (email, student id, award number) would break.
    #[error("{0}")]
    DuplicateEntity(String),
    /// Credentials did not verify.
    #[error("{0}")]
    Unauthorized(String),
    /// The underlying write or read was rejected.
    #[error("Internal server error")]
    Persistence(#[source] DieselError),
    /// Infrastructure failure outside a query: pool checkout, hashing.
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    /// Stable machine-readable code for the client.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequestMethod => "invalid_request_method",
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidAction => "invalid_action",
            Self::NotFound(_) => "not_found",
            Self::DuplicateEntity(_) => "duplicate_entity",
            Self::Unauthorized(_) => "unauthorized",
            Self::Persistence(_) | Self::Internal(_) => "persistence_failure",
        }
    }

    const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequestMethod => StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidInput(_) | Self::InvalidAction => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::DuplicateEntity(_) => StatusCode::CONFLICT,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Wrap an infrastructure failure that is not a query error.
    pub fn internal<E: std::fmt::Display>(err: E) -> Self { Self::Internal(err.to_string()) }
}

impl From<DieselError> for ApiError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                Self::DuplicateEntity("Record already exists".to_owned())
            }
            other => Self::Persistence(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Persistence(source) => error!(%source, "database operation failed"),
            ApiError::Internal(source) => error!(%source, "infrastructure failure"),
            _ => {}
        }
        let body = Json(json!({
            "success": false,
            "message": self.to_string(),
            "code": self.code(),
        }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(ApiError::InvalidRequestMethod, "invalid_request_method")]
    #[case(ApiError::InvalidAction, "invalid_action")]
    #[case(ApiError::NotFound("Post not found".into()), "not_found")]
    #[case(ApiError::DuplicateEntity("Email already exists".into()), "duplicate_entity")]
    #[case(ApiError::Internal("timed out".into()), "persistence_failure")]
    fn codes_are_stable(#[case] err: ApiError, #[case] code: &str) {
        assert_eq!(err.code(), code);
    }

    #[rstest]
    fn unique_violations_map_to_duplicate_entity() {
        let err = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("UNIQUE constraint failed: students.email".to_owned()),
        );
        assert!(matches!(ApiError::from(err), ApiError::DuplicateEntity(_)));
    }

    #[rstest]
    fn other_database_errors_stay_internal() {
        let err = ApiError::from(DieselError::RollbackTransaction);
        assert!(matches!(err, ApiError::Persistence(_)));
        assert_eq!(err.to_string(), "Internal server error");
    }
}
