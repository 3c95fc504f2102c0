/// Schema Module
///
/// The on-disk layout is a fixed contract: three tables keyed by text
/// identifiers, created on first use and never migrated.

use crate::core::db::query::QueryExecutor;
use crate::core::Result;
use rusqlite::params;
use tracing::debug;

const CREATE_STUDENTS_SQL: &str =
    "CREATE TABLE IF NOT EXISTS students (id TEXT PRIMARY KEY, name TEXT, hourly_price REAL, discount REAL)";

const CREATE_TUTORS_SQL: &str =
    "CREATE TABLE IF NOT EXISTS tutors (id TEXT PRIMARY KEY, name TEXT, hourly_rate REAL)";

const CREATE_LESSONS_SQL: &str = "CREATE TABLE IF NOT EXISTS lessons (id TEXT PRIMARY KEY, student_id TEXT, tutor_id TEXT, date TEXT, time TEXT, duration INTEGER)";

/// The tables that make up the store
///
/// Statements that need a table name take it from here, never from input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Students,
    Tutors,
    Lessons,
}

impl Table {
    pub const ALL: [Table; 3] = [Table::Students, Table::Tutors, Table::Lessons];

    pub fn name(&self) -> &'static str {
        match self {
            Table::Students => "students",
            Table::Tutors => "tutors",
            Table::Lessons => "lessons",
        }
    }

    /// Full-table scan in insertion order
    pub fn select_all_sql(&self) -> &'static str {
        match self {
            Table::Students => "SELECT * FROM students ORDER BY rowid",
            Table::Tutors => "SELECT * FROM tutors ORDER BY rowid",
            Table::Lessons => "SELECT * FROM lessons ORDER BY rowid",
        }
    }

    /// Single-row lookup by identifier
    pub fn select_by_id_sql(&self) -> &'static str {
        match self {
            Table::Students => "SELECT * FROM students WHERE id = ?1",
            Table::Tutors => "SELECT * FROM tutors WHERE id = ?1",
            Table::Lessons => "SELECT * FROM lessons WHERE id = ?1",
        }
    }

    /// Heading printed above a rendered snapshot of the table
    pub fn caption(&self) -> &'static str {
        match self {
            Table::Students => "Student Database:",
            Table::Tutors => "Tutor Database:",
            Table::Lessons => "Lesson Database:",
        }
    }

    fn create_sql(&self) -> &'static str {
        match self {
            Table::Students => CREATE_STUDENTS_SQL,
            Table::Tutors => CREATE_TUTORS_SQL,
            Table::Lessons => CREATE_LESSONS_SQL,
        }
    }
}

/// Creates any missing tables; safe to run against an existing store
pub fn initialize(executor: &mut QueryExecutor<'_>) -> Result<()> {
    for table in Table::ALL {
        executor.execute(table.create_sql(), params![])?;
        debug!("Ensured table {}", table.name());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_initialize_creates_tables() {
        let conn = Connection::open_in_memory().unwrap();
        let mut executor = QueryExecutor::new(&conn);
        initialize(&mut executor).unwrap();
        initialize(&mut executor).unwrap();

        executor
            .execute(
                "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
                params![],
            )
            .unwrap();
        let names: Vec<String> = executor
            .fetch_all()
            .iter()
            .filter_map(|row| row.text(0).map(String::from))
            .collect();
        assert_eq!(names, vec!["lessons", "students", "tutors"]);
    }

    #[test]
    fn test_column_layout() {
        let conn = Connection::open_in_memory().unwrap();
        let mut executor = QueryExecutor::new(&conn);
        initialize(&mut executor).unwrap();

        executor
            .execute(Table::Students.select_all_sql(), params![])
            .unwrap();
        assert_eq!(executor.columns(), ["id", "name", "hourly_price", "discount"]);

        executor.execute(Table::Tutors.select_all_sql(), params![]).unwrap();
        assert_eq!(executor.columns(), ["id", "name", "hourly_rate"]);

        executor.execute(Table::Lessons.select_all_sql(), params![]).unwrap();
        assert_eq!(
            executor.columns(),
            ["id", "student_id", "tutor_id", "date", "time", "duration"]
        );
    }
}
