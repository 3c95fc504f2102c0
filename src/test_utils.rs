/// # Test Utilities Module
///
/// Fixtures shared by the unit tests. Every fixture gets its own temporary
/// directory so tests never share a database file.

use crate::tutoring::TutoringSystem;
use std::path::PathBuf;
use tempfile::TempDir;

/// A tutoring system backed by a fresh database file in a temp directory
pub struct TempSystem {
    pub system: TutoringSystem,
    pub path: PathBuf,
    // Dropped last so the directory outlives the system using it
    _dir: TempDir,
}

impl TempSystem {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tutoring.db");
        let system = TutoringSystem::open(&path).unwrap();
        TempSystem {
            system,
            path,
            _dir: dir,
        }
    }
}
