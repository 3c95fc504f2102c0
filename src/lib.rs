// Core infrastructure modules
pub mod core;

// Feature-specific modules
pub mod cli;
pub mod config;
pub mod models;
pub mod results_grid;
pub mod truncate;
pub mod tutoring;

#[cfg(test)]
pub(crate) mod test_utils;

pub use crate::core::{Result, TutorError};
pub use crate::models::{Lesson, RecordId, Student, StudentUpdate, Tutor};
pub use crate::tutoring::TutoringSystem;
