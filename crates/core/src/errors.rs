//! Core error types for the account-opening wizard.
//!
//! This module defines storage-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, the filesystem bucket) are converted to these types by
//! the storage layer.

use thiserror::Error;

use crate::applications::DocumentKind;
use crate::wizard::WizardError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the wizard and its persistence gateway.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    #[error("Failed to upload {document} photo: {reason}")]
    Upload {
        document: DocumentKind,
        reason: String,
    },

    #[error("Document store error: {0}")]
    DocumentStore(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Storage-agnostic error type for record store operations.
///
/// Every variant carries a `String` so the storage layer can translate
/// Diesel/r2d2 errors into this shape without leaking their types.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated.
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A database transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for user input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Unsupported document type '{0}'; expected a JPEG, PNG or WebP image")]
    UnsupportedDocumentType(String),

    #[error("Document is {size} bytes; the limit is {max} bytes")]
    DocumentTooLarge { size: usize, max: usize },

    #[error("Graduation year {0} is outside the accepted range")]
    InvalidGraduationYear(u16),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::DocumentStore(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
