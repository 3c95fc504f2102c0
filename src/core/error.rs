/// TutorPal Error Module
///
/// This module defines the error types shared by every layer of TutorPal.
/// Missing records are deliberately absent from this enum: a lookup that finds
/// nothing is an ordinary outcome and is reported through `Option` or `bool`
/// return values instead.
use thiserror::Error;

/// Error type for the TutorPal application.
///
/// This enum covers the failures an operation can surface to its caller:
/// - Storage failures (opening the store, executing statements, committing,
///   rows that no longer match the schema)
/// - Input rejected before any write is attempted
/// - Configuration loading and parsing
/// - File system operations
#[derive(Error, Debug)]
pub enum TutorError {
    /// The backing store could not be opened or a statement failed inside it
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] rusqlite::Error),

    /// A stored row does not decode into its record type
    #[error("Malformed {0} row")]
    MalformedRow(&'static str),

    /// Input that violates a record invariant (negative price, bad discount, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration loading and validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system and I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Result to use TutorError as the error type.
pub type Result<T> = std::result::Result<T, TutorError>;
