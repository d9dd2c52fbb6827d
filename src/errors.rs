//! Unified error type for the recurring ledger engine.

use chrono::NaiveDate;
use thiserror::Error;

/// Every failure the engine and its binary can surface.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// A field failed validation before anything was written
    #[error("Validation error: {message}")]
    Validation {
        /// What went wrong
        message: String,
    },

    /// No recurring definition exists with this id
    #[error("Recurring definition not found: {id}")]
    DefinitionNotFound {
        /// The id that was looked up
        id: i64,
    },

    /// Amount is negative, NaN or infinite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// End date falls before the start date
    #[error("Invalid date range: end date {end} is before start date {start}")]
    InvalidDateRange {
        /// Definition start date
        start: NaiveDate,
        /// Definition end date
        end: NaiveDate,
    },

    /// Store failure; the surrounding transaction has been rolled back
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
