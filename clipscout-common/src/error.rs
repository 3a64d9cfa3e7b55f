//! Shared error type for the ClipScout crates

use thiserror::Error;

/// Result alias over [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Storage and configuration failures
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Upload storage or root folder I/O
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unreadable TOML or an unparsable setting value
    #[error("Configuration error: {0}")]
    Config(String),

    /// A stored row whose id or timestamp column does not parse
    #[error("Invalid stored row: {0}")]
    InvalidRow(String),
}
