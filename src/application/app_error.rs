use thiserror::Error;

use crate::use_cases::bill_lookup::LookupError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found")]
    NotFound,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Stored data the cycle engine cannot act on, e.g. a day-of-month field
    /// outside 1–31. Should be unreachable through the write paths.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;
