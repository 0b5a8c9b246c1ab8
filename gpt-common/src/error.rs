//! Error type shared by the store, resolver and services

use thiserror::Error;

/// Result alias used throughout the practice tracker
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bad or incomplete configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unknown table, or a record id that is not loaded
    #[error("Not found: {0}")]
    NotFound(String),

    /// Stored row could not be mapped onto its record type
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Form submission rejected before any store mutation
    #[error("{0}")]
    Validation(String),

    /// Write attempted against a table opened read-only
    #[error("Table is read-only: {0}")]
    ReadOnly(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
