//! Unified error types and result handling.
//!
//! Every fallible operation in the crate returns [`Result`]. The variants map
//! onto the caller-visible error classes of the reconciliation core
//! (validation, conflict, not-found) plus the ambient failures the storage
//! and credential layers can produce.

use rust_decimal::Decimal;
use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong
        message: String,
    },

    /// Input failed a domain validation rule (unrecognized role value,
    /// unknown transaction kind, disallowed team name, ...).
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the rejected input
        message: String,
    },

    /// A uniqueness or referential constraint would be violated.
    #[error("Conflict: {message}")]
    Conflict {
        /// Description of the conflicting state
        message: String,
    },

    /// The referenced record does not exist (caller bug).
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record that was looked up
        entity: &'static str,
        /// Identifier that failed to resolve
        id: String,
    },

    /// The acting identity is not allowed to perform the operation.
    #[error("Permission denied: {message}")]
    PermissionDenied {
        /// Description of the refused action
        message: String,
    },

    /// A monetary amount was negative or otherwise unusable.
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// Password hashing or verification failed.
    #[error("Credential error: {message}")]
    Credential {
        /// Description from the password-hash layer
        message: String,
    },

    /// Underlying database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error (config file reads).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl Error {
    /// Maps a unique-constraint violation to [`Error::Conflict`] so callers
    /// can retry with fresh input; any other database error passes through
    /// unchanged.
    #[must_use]
    pub fn from_constraint(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(message)) => {
                Self::Conflict { message }
            }
            _ => Self::Database(err),
        }
    }
}

/// Convenience `Result` type.
pub type Result<T> = std::result::Result<T, Error>;
