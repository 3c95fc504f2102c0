/// Core Module for TutorPal
///
/// This module contains the shared infrastructure the record operations are
/// built on: the scoped store access layer and the error taxonomy.

pub mod db;
pub mod error;

// Re-export commonly used types for convenience
pub use error::{Result, TutorError};
