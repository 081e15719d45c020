//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Field-keyed validation messages. Ordered so the serialized map is stable.
pub type FieldErrors = BTreeMap<&'static str, Vec<String>>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error("a customer with this document type and number already exists")]
    DuplicateDocument,
    #[error("a customer with this email already exists")]
    DuplicateEmail,
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::DuplicateDocument | AppError::DuplicateEmail => {
                StatusCode::BAD_REQUEST
            }
            AppError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, details) = match &self {
            AppError::Validation(fields) => ("validation_error", serde_json::to_value(fields).ok()),
            AppError::DuplicateDocument => (
                "duplicate_record",
                Some(serde_json::json!({ "fields": ["document_type", "document_number"] })),
            ),
            AppError::DuplicateEmail => (
                "duplicate_record",
                Some(serde_json::json!({ "fields": ["email"] })),
            ),
            AppError::Db(_) => ("database_error", None),
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_and_duplicates_are_client_errors() {
        assert_eq!(
            AppError::Validation(FieldErrors::new()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::DuplicateDocument.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::DuplicateEmail.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn database_errors_are_opaque_server_errors() {
        assert_eq!(
            AppError::Db(sqlx::Error::PoolClosed).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn duplicate_message_names_the_condition() {
        assert_eq!(
            AppError::DuplicateDocument.to_string(),
            "a customer with this document type and number already exists"
        );
    }
}
