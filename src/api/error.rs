//! The single mapping from failures to HTTP responses.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::validation::FieldViolation;

/// Every way a request can fail.
///
/// The `Display` text is what clients see in the `error` field. Store and
/// other internal failures are logged in full but reported generically.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation Error")]
    Validation(Vec<FieldViolation>),

    #[error("Experiment not found")]
    NotFound,

    #[error("Route not found")]
    RouteNotFound,

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(vec![FieldViolation::new("body", rejection.body_text())])
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(vec![FieldViolation::new("query", rejection.body_text())])
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = self.to_string();

        let details = match self {
            Self::Validation(violations) => {
                tracing::warn!("Validation error: {} violation(s)", violations.len());
                Some(violations)
            }
            Self::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                None
            }
            Self::NotFound | Self::RouteNotFound => None,
        };

        let body = ErrorResponse {
            success: false,
            error,
            details,
        };
        (status, Json(body)).into_response()
    }
}
