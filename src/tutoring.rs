//! Student, tutor and lesson bookkeeping on top of the scoped store.
//!
//! Each public method is one unit of work: it validates its input, opens a
//! scope, runs its statements and releases the scope before returning. A
//! lookup that finds nothing is reported through the return value (`None` or
//! `false`) and logged; it is never an error.

use crate::core::db::{QueryExecutor, ResultRow, Store, Table};
use crate::core::{Result, TutorError};
use crate::models::{Lesson, RecordId, Student, StudentUpdate, Tutor};
use crate::results_grid::ResultsGrid;
use crate::truncate::{truncate_middle, DEFAULT_MAX_LENGTH};
use rusqlite::params;
use std::io::{self, Write};
use std::path::Path;
use tracing::{info, warn};

const INSERT_STUDENT_SQL: &str = "INSERT INTO students VALUES (?1, ?2, ?3, ?4)";
const INSERT_TUTOR_SQL: &str = "INSERT INTO tutors VALUES (?1, ?2, ?3)";
const INSERT_LESSON_SQL: &str = "INSERT INTO lessons VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

const UPDATE_PRICE_SQL: &str = "UPDATE students SET hourly_price = ?1 WHERE id = ?2";
const UPDATE_DISCOUNT_SQL: &str = "UPDATE students SET discount = ?1 WHERE id = ?2";
const UPDATE_PRICE_AND_DISCOUNT_SQL: &str =
    "UPDATE students SET hourly_price = ?1, discount = ?2 WHERE id = ?3";

pub struct TutoringSystem {
    store: Store,
}

impl TutoringSystem {
    /// Opens (and if needed creates) the store at `db_file`
    pub fn open<P: AsRef<Path>>(db_file: P) -> Result<Self> {
        Ok(TutoringSystem {
            store: Store::open(db_file)?,
        })
    }

    /// Adds a student and returns the generated identifier
    ///
    /// # Errors
    ///
    /// `TutorError::Validation` for a negative price or a discount outside
    /// `[0, 1)`; nothing is written in that case.
    pub fn add_student(&self, name: &str, hourly_price: f64, discount: f64) -> Result<RecordId> {
        validate_amount("hourly price", hourly_price)?;
        validate_discount(discount)?;

        let student = Student::new(name, hourly_price, discount);
        self.store.scope(|executor| {
            executor.execute(
                INSERT_STUDENT_SQL,
                params![student.id, student.name, student.hourly_price, student.discount],
            )?;
            Ok(())
        })?;
        info!("Student {} added [{}]", name, student.id);
        Ok(student.id)
    }

    /// Adds a tutor and returns the generated identifier
    pub fn add_tutor(&self, name: &str, hourly_rate: f64) -> Result<RecordId> {
        validate_amount("hourly rate", hourly_rate)?;

        let tutor = Tutor::new(name, hourly_rate);
        self.store.scope(|executor| {
            executor.execute(
                INSERT_TUTOR_SQL,
                params![tutor.id, tutor.name, tutor.hourly_rate],
            )?;
            Ok(())
        })?;
        info!("Tutor {} added [{}]", name, tutor.id);
        Ok(tutor.id)
    }

    /// Changes the price and/or discount of a student in place
    ///
    /// # Returns
    ///
    /// `true` if a student with `id` exists, `false` if no row matched. An
    /// update with no fields set writes nothing and only reports existence.
    pub fn update_student(&self, id: &RecordId, update: StudentUpdate) -> Result<bool> {
        if let Some(price) = update.hourly_price {
            validate_amount("hourly price", price)?;
        }
        if let Some(discount) = update.discount {
            validate_discount(discount)?;
        }

        let matched = self.store.scope(|executor| match (update.hourly_price, update.discount) {
            (Some(price), Some(discount)) => {
                executor.execute(UPDATE_PRICE_AND_DISCOUNT_SQL, params![price, discount, id])
            }
            (Some(price), None) => executor.execute(UPDATE_PRICE_SQL, params![price, id]),
            (None, Some(discount)) => executor.execute(UPDATE_DISCOUNT_SQL, params![discount, id]),
            (None, None) => {
                executor.execute(Table::Students.select_by_id_sql(), params![id])?;
                Ok(usize::from(executor.fetch_one().is_some()))
            }
        })? > 0;

        if matched {
            info!("Student [{}] has been updated", id);
        } else {
            warn!("Student [{}] not found in the database", id);
        }
        Ok(matched)
    }

    /// Books a lesson between an existing student and an existing tutor
    ///
    /// # Returns
    ///
    /// The new lesson's identifier, or `None` (with nothing written) when
    /// either referenced record does not exist at call time.
    pub fn schedule_lesson(
        &self,
        student_id: &RecordId,
        tutor_id: &RecordId,
        date: &str,
        time: &str,
        duration: u32,
    ) -> Result<Option<RecordId>> {
        validate_duration(duration)?;

        let lesson = self.store.scope(|executor| {
            let student = fetch_by_id(executor, Table::Students, student_id)?;
            let tutor = fetch_by_id(executor, Table::Tutors, tutor_id)?;
            if student.is_none() || tutor.is_none() {
                return Ok(None);
            }

            let lesson = Lesson::new(student_id, tutor_id, date, time, duration);
            executor.execute(
                INSERT_LESSON_SQL,
                params![
                    lesson.id,
                    lesson.student_id,
                    lesson.tutor_id,
                    lesson.date,
                    lesson.time,
                    lesson.duration
                ],
            )?;
            Ok(Some(lesson))
        })?;

        match lesson {
            Some(lesson) => {
                info!(
                    "Lesson scheduled for {} at {} for {} hour(s) [{}]",
                    date, time, duration, lesson.id
                );
                Ok(Some(lesson.id))
            }
            None => {
                warn!(
                    "Student [{}] or tutor [{}] not found in the database",
                    truncate_middle(student_id.as_str(), DEFAULT_MAX_LENGTH),
                    truncate_middle(tutor_id.as_str(), DEFAULT_MAX_LENGTH)
                );
                Ok(None)
            }
        }
    }

    /// Amount owed by a student for `hours` of tuition
    ///
    /// Computed as `hourly_price * hours * (1 - discount)`; `None` when the
    /// student does not exist.
    pub fn calculate_payment(&self, student_id: &RecordId, hours: f64) -> Result<Option<f64>> {
        validate_amount("hours", hours)?;

        match self.student(student_id)? {
            Some(student) => Ok(Some(student.payment_for(hours))),
            None => {
                warn!("Student [{}] not found in the database", student_id);
                Ok(None)
            }
        }
    }

    pub fn student(&self, id: &RecordId) -> Result<Option<Student>> {
        self.store.scope(|executor| {
            fetch_by_id(executor, Table::Students, id)?
                .map(|row| decode(&row, Table::Students, Student::from_row))
                .transpose()
        })
    }

    pub fn tutor(&self, id: &RecordId) -> Result<Option<Tutor>> {
        self.store.scope(|executor| {
            fetch_by_id(executor, Table::Tutors, id)?
                .map(|row| decode(&row, Table::Tutors, Tutor::from_row))
                .transpose()
        })
    }

    pub fn lesson(&self, id: &RecordId) -> Result<Option<Lesson>> {
        self.store.scope(|executor| {
            fetch_by_id(executor, Table::Lessons, id)?
                .map(|row| decode(&row, Table::Lessons, Lesson::from_row))
                .transpose()
        })
    }

    /// All students in insertion order
    pub fn students(&self) -> Result<Vec<Student>> {
        self.scan(Table::Students, Student::from_row)
    }

    /// All tutors in insertion order
    pub fn tutors(&self) -> Result<Vec<Tutor>> {
        self.scan(Table::Tutors, Tutor::from_row)
    }

    /// All lessons in insertion order
    pub fn lessons(&self) -> Result<Vec<Lesson>> {
        self.scan(Table::Lessons, Lesson::from_row)
    }

    /// Snapshot of a whole table as a grid of display strings
    pub fn table_grid(&self, table: Table) -> Result<ResultsGrid> {
        self.store.scope(|executor| {
            executor.execute(table.select_all_sql(), params![])?;
            let headers = executor.columns().to_vec();
            let rows = executor
                .fetch_all()
                .iter()
                .map(ResultRow::display_values)
                .collect();
            Ok(ResultsGrid::with_data(headers, rows))
        })
    }

    /// Caption line followed by the rendered table snapshot
    pub fn render_table(&self, table: Table) -> Result<String> {
        let grid = self.table_grid(table)?;
        Ok(format!("{}\n{}", table.caption(), grid.render()))
    }

    /// Writes the caption and table snapshot to `out`
    pub fn display_table<W: Write>(&self, table: Table, out: &mut W) -> Result<()> {
        out.write_all(self.render_table(table)?.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    pub fn display_students(&self) -> Result<()> {
        self.display_table(Table::Students, &mut io::stdout().lock())
    }

    pub fn display_tutors(&self) -> Result<()> {
        self.display_table(Table::Tutors, &mut io::stdout().lock())
    }

    pub fn display_lessons(&self) -> Result<()> {
        self.display_table(Table::Lessons, &mut io::stdout().lock())
    }

    fn scan<T>(&self, table: Table, from_row: fn(&ResultRow) -> Option<T>) -> Result<Vec<T>> {
        self.store.scope(|executor| {
            executor.execute(table.select_all_sql(), params![])?;
            executor
                .fetch_all()
                .iter()
                .map(|row| decode(row, table, from_row))
                .collect()
        })
    }
}

fn fetch_by_id(
    executor: &mut QueryExecutor<'_>,
    table: Table,
    id: &RecordId,
) -> Result<Option<ResultRow>> {
    executor.execute(table.select_by_id_sql(), params![id])?;
    Ok(executor.fetch_one())
}

fn decode<T>(row: &ResultRow, table: Table, from_row: fn(&ResultRow) -> Option<T>) -> Result<T> {
    from_row(row).ok_or(TutorError::MalformedRow(table.name()))
}

fn validate_amount(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(TutorError::Validation(format!(
            "{} must be a non-negative number, got {}",
            field, value
        )));
    }
    Ok(())
}

fn validate_discount(discount: f64) -> Result<()> {
    if !(0.0..1.0).contains(&discount) {
        return Err(TutorError::Validation(format!(
            "discount must be in [0, 1), got {}",
            discount
        )));
    }
    Ok(())
}

fn validate_duration(duration: u32) -> Result<()> {
    if duration == 0 {
        return Err(TutorError::Validation(
            "duration must be at least one hour".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TempSystem;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_add_student_then_payment() {
        let fixture = TempSystem::new();
        let id = fixture.system.add_student("Alice", 20.0, 0.1).unwrap();

        let payment = fixture.system.calculate_payment(&id, 5.0).unwrap();
        assert_close(payment.unwrap(), 90.0);
    }

    #[test]
    fn test_update_student_then_payment() {
        let fixture = TempSystem::new();
        let id = fixture.system.add_student("Alice", 20.0, 0.1).unwrap();

        let update = StudentUpdate {
            hourly_price: Some(22.0),
            discount: Some(0.2),
        };
        assert!(fixture.system.update_student(&id, update).unwrap());

        let payment = fixture.system.calculate_payment(&id, 5.0).unwrap();
        assert_close(payment.unwrap(), 88.0);
    }

    #[test]
    fn test_partial_updates_leave_other_field() {
        let fixture = TempSystem::new();
        let id = fixture.system.add_student("Bob", 25.0, 0.0).unwrap();

        assert!(fixture
            .system
            .update_student(&id, StudentUpdate::discount(0.5))
            .unwrap());
        let student = fixture.system.student(&id).unwrap().unwrap();
        assert_eq!(student.hourly_price, 25.0);
        assert_eq!(student.discount, 0.5);

        assert!(fixture
            .system
            .update_student(&id, StudentUpdate::price(30.0))
            .unwrap());
        let student = fixture.system.student(&id).unwrap().unwrap();
        assert_eq!(student.hourly_price, 30.0);
        assert_eq!(student.discount, 0.5);
    }

    #[test]
    fn test_update_unknown_student_reports_not_found() {
        let fixture = TempSystem::new();
        let missing = RecordId::from("nonexistent");

        assert!(!fixture
            .system
            .update_student(&missing, StudentUpdate::price(10.0))
            .unwrap());
        assert!(!fixture
            .system
            .update_student(&missing, StudentUpdate::default())
            .unwrap());
    }

    #[test]
    fn test_empty_update_reports_existence() {
        let fixture = TempSystem::new();
        let id = fixture.system.add_student("Carol", 18.0, 0.0).unwrap();

        assert!(fixture
            .system
            .update_student(&id, StudentUpdate::default())
            .unwrap());
        let student = fixture.system.student(&id).unwrap().unwrap();
        assert_eq!(student.hourly_price, 18.0);
    }

    #[test]
    fn test_payment_for_unknown_student() {
        let fixture = TempSystem::new();
        let payment = fixture
            .system
            .calculate_payment(&RecordId::from("nonexistent"), 4.0)
            .unwrap();
        assert!(payment.is_none());
    }

    #[test]
    fn test_schedule_lesson() {
        let fixture = TempSystem::new();
        let student = fixture.system.add_student("Alice", 20.0, 0.1).unwrap();
        let tutor = fixture.system.add_tutor("John", 30.0).unwrap();

        let lesson_id = fixture
            .system
            .schedule_lesson(&student, &tutor, "2023-05-20", "15:00", 2)
            .unwrap()
            .unwrap();

        let lesson = fixture.system.lesson(&lesson_id).unwrap().unwrap();
        assert_eq!(lesson.student_id, student);
        assert_eq!(lesson.tutor_id, tutor);
        assert_eq!(lesson.date, "2023-05-20");
        assert_eq!(lesson.time, "15:00");
        assert_eq!(lesson.duration, 2);
    }

    #[test]
    fn test_schedule_lesson_with_unknown_references() {
        let fixture = TempSystem::new();
        let student = fixture.system.add_student("Alice", 20.0, 0.1).unwrap();
        let tutor = fixture.system.add_tutor("John", 30.0).unwrap();
        let unknown = RecordId::from("unknown");

        let result = fixture
            .system
            .schedule_lesson(&unknown, &tutor, "2023-05-20", "15:00", 2)
            .unwrap();
        assert!(result.is_none());

        let result = fixture
            .system
            .schedule_lesson(&student, &unknown, "2023-05-20", "15:00", 2)
            .unwrap();
        assert!(result.is_none());

        assert!(fixture.system.lessons().unwrap().is_empty());
    }

    #[test]
    fn test_validation_rejects_before_writing() {
        let fixture = TempSystem::new();

        let cases = [
            fixture.system.add_student("Neg", -1.0, 0.0).map(|_| ()),
            fixture.system.add_student("Full", 10.0, 1.0).map(|_| ()),
            fixture.system.add_student("Below", 10.0, -0.1).map(|_| ()),
            fixture.system.add_student("NaN", f64::NAN, 0.0).map(|_| ()),
            fixture.system.add_tutor("Neg", -5.0).map(|_| ()),
        ];
        for result in cases {
            assert!(matches!(result, Err(TutorError::Validation(_))));
        }
        assert!(fixture.system.students().unwrap().is_empty());
        assert!(fixture.system.tutors().unwrap().is_empty());

        let student = fixture.system.add_student("Alice", 20.0, 0.1).unwrap();
        let tutor = fixture.system.add_tutor("John", 30.0).unwrap();
        let result = fixture
            .system
            .schedule_lesson(&student, &tutor, "2023-05-20", "15:00", 0);
        assert!(matches!(result, Err(TutorError::Validation(_))));
        assert!(fixture.system.lessons().unwrap().is_empty());

        let result = fixture
            .system
            .update_student(&student, StudentUpdate::discount(1.5));
        assert!(matches!(result, Err(TutorError::Validation(_))));
        assert_eq!(fixture.system.student(&student).unwrap().unwrap().discount, 0.1);
    }

    #[test]
    fn test_scans_preserve_insertion_order() {
        let fixture = TempSystem::new();
        let names = ["Zed", "Alice", "Mallory"];
        for name in names {
            fixture.system.add_tutor(name, 30.0).unwrap();
        }

        let tutors = fixture.system.tutors().unwrap();
        let listed: Vec<&str> = tutors.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(listed, names);
    }

    #[test]
    fn test_render_students_table() {
        let fixture = TempSystem::new();
        let id = fixture.system.add_student("Alice", 20.0, 0.1).unwrap();

        let rendered = fixture.system.render_table(Table::Students).unwrap();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Student Database:");
        assert_eq!(
            lines[1],
            format!("{:<16} | {:<5} | {:<12} | {:<8}", "id", "name", "hourly_price", "discount")
        );
        assert_eq!(lines[2].len(), lines[1].len());
        assert!(lines[3].starts_with(&truncate_middle(id.as_str(), 16)));
        assert!(lines[3].contains("| Alice | 20.0"));
    }

    #[test]
    fn test_render_empty_table() {
        let fixture = TempSystem::new();
        let rendered = fixture.system.render_table(Table::Tutors).unwrap();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Tutor Database:");
        assert_eq!(lines[1], "id | name | hourly_rate");
        assert_eq!(lines[2], "-".repeat(lines[1].len()));
    }

    #[test]
    fn test_display_table_writes_rendering() {
        let fixture = TempSystem::new();
        fixture.system.add_tutor("Sarah", 35.0).unwrap();

        let mut buffer = Vec::new();
        fixture
            .system
            .display_table(Table::Tutors, &mut buffer)
            .unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            fixture.system.render_table(Table::Tutors).unwrap()
        );
    }
}
