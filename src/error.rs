//! Error types for the library catalog

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Stable numeric codes returned in error bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NoSuchItem = 2,
    NoSuchMember = 3,
    Duplicate = 4,
    ItemNotAvailable = 5,
    NotBorrowed = 6,
    ItemBorrowed = 7,
    MemberHasBorrowedItems = 8,
    BadValue = 9,
    StorageFailure = 11,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("A {kind} with {key_label} {key} already exists.")]
    DuplicateKey {
        kind: &'static str,
        key_label: &'static str,
        key: String,
    },

    #[error("No {kind} found with {key_label} {key}.")]
    NotFound {
        kind: &'static str,
        key_label: &'static str,
        key: String,
    },

    #[error("'{0}' is already borrowed.")]
    AlreadyBorrowed(String),

    #[error("'{0}' was not borrowed.")]
    NotBorrowed(String),

    #[error("Book with ISBN {isbn} is already borrowed by {member}.")]
    DuplicateBorrow { isbn: String, member: String },

    #[error("Book with ISBN {isbn} is not borrowed by {member}.")]
    NotBorrowedByMember { isbn: String, member: String },

    #[error("Member not found: {0}")]
    MemberNotFound(String),

    #[error("Book not found: {0}")]
    BookNotFound(String),

    #[error("Cannot delete '{0}' because it is currently borrowed")]
    BookBorrowed(String),

    #[error("Cannot delete member {0} while they still have borrowed books")]
    MemberHasLoans(String),

    #[error("Book with ISBN {0} not found in Open Library")]
    MetadataNotFound(String),

    #[error("Metadata lookup failed: {0}")]
    MetadataLookup(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Malformed store file {path}: {reason}")]
    MalformedStoreFile { path: String, reason: String },

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, code, message) = match &self {
            AppError::DuplicateKey { .. } => (StatusCode::CONFLICT, ErrorCode::Duplicate, message),
            AppError::NotFound { kind, .. } => {
                let code = if *kind == "member" {
                    ErrorCode::NoSuchMember
                } else {
                    ErrorCode::NoSuchItem
                };
                (StatusCode::NOT_FOUND, code, message)
            }
            AppError::AlreadyBorrowed(_) | AppError::DuplicateBorrow { .. } => {
                (StatusCode::CONFLICT, ErrorCode::ItemNotAvailable, message)
            }
            AppError::NotBorrowed(_) | AppError::NotBorrowedByMember { .. } => {
                (StatusCode::CONFLICT, ErrorCode::NotBorrowed, message)
            }
            AppError::MemberNotFound(_) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchMember, message)
            }
            AppError::BookNotFound(_) | AppError::MetadataNotFound(_) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchItem, message)
            }
            AppError::BookBorrowed(_) => (StatusCode::BAD_REQUEST, ErrorCode::ItemBorrowed, message),
            AppError::MemberHasLoans(_) => {
                (StatusCode::CONFLICT, ErrorCode::MemberHasBorrowedItems, message)
            }
            AppError::Validation(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::BadValue, message)
            }
            AppError::MetadataLookup(msg) => {
                tracing::error!("Metadata client error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
            AppError::Io(e) => {
                tracing::error!("Storage error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::StorageFailure,
                    "Storage error".to_string(),
                )
            }
            AppError::MalformedStoreFile { .. } => {
                tracing::error!("{}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::StorageFailure,
                    "Storage error".to_string(),
                )
            }
            AppError::Serialization(e) => {
                tracing::error!("Serialization error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
