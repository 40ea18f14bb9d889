//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::DomainError;
use purchase::PurchaseError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Request validation error.
    Validation(DomainError),
    /// Purchase orchestration error.
    Purchase(PurchaseError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Validation(err) => validation_error_to_response(&err),
            ApiError::Purchase(err) => purchase_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn validation_error_to_response(err: &DomainError) -> (StatusCode, String) {
    match err {
        DomainError::ArticleNotFound(_) | DomainError::NotPublished(_) => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        _ => (StatusCode::BAD_REQUEST, err.to_string()),
    }
}

fn purchase_error_to_response(err: PurchaseError) -> (StatusCode, String) {
    match &err {
        PurchaseError::ArticleNotFound(_) | PurchaseError::AddressNotFound(_) => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        PurchaseError::NotPurchasable(_) | PurchaseError::SelfPurchase => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        PurchaseError::DuplicatePurchase { .. } => (StatusCode::CONFLICT, err.to_string()),
        PurchaseError::LedgerTransaction(_) | PurchaseError::LedgerUnavailable(_) => {
            (StatusCode::BAD_GATEWAY, err.to_string())
        }
        PurchaseError::Validation(domain_err) => validation_error_to_response(domain_err),
        PurchaseError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Validation(err)
    }
}

impl From<PurchaseError> for ApiError {
    fn from(err: PurchaseError) -> Self {
        ApiError::Purchase(err)
    }
}

impl From<record_store::StoreError> for ApiError {
    fn from(err: record_store::StoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
