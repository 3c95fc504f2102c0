//! Record types for students, tutors and lessons.
//!
//! Constructors only assign identifiers; range checks on prices, discounts
//! and durations live with the operations that persist them.

use crate::core::db::ResultRow;
use rusqlite::types::{ToSql, ToSqlOutput};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier of a persisted record
///
/// Freshly created records get a random UUID v4. Identifiers coming from the
/// outside (command line, other records) are wrapped unchanged and may refer
/// to nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId(String);

impl RecordId {
    pub fn generate() -> Self {
        RecordId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        RecordId(value)
    }
}

impl ToSql for RecordId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub id: RecordId,
    pub name: String,
    pub hourly_price: f64,
    pub discount: f64,
}

impl Student {
    pub fn new(name: &str, hourly_price: f64, discount: f64) -> Self {
        Student {
            id: RecordId::generate(),
            name: name.to_string(),
            hourly_price,
            discount,
        }
    }

    /// Decodes a `students` row: id, name, hourly_price, discount
    pub(crate) fn from_row(row: &ResultRow) -> Option<Self> {
        Some(Student {
            id: RecordId::from(row.text(0)?),
            name: row.text(1).unwrap_or_default().to_string(),
            hourly_price: row.real(2)?,
            discount: row.real(3).unwrap_or(0.0),
        })
    }

    /// Amount owed for `hours` of tuition after the discount
    pub fn payment_for(&self, hours: f64) -> f64 {
        self.hourly_price * hours * (1.0 - self.discount)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tutor {
    pub id: RecordId,
    pub name: String,
    pub hourly_rate: f64,
}

impl Tutor {
    pub fn new(name: &str, hourly_rate: f64) -> Self {
        Tutor {
            id: RecordId::generate(),
            name: name.to_string(),
            hourly_rate,
        }
    }

    /// Decodes a `tutors` row: id, name, hourly_rate
    pub(crate) fn from_row(row: &ResultRow) -> Option<Self> {
        Some(Tutor {
            id: RecordId::from(row.text(0)?),
            name: row.text(1).unwrap_or_default().to_string(),
            hourly_rate: row.real(2)?,
        })
    }
}

/// A scheduled lesson; immutable once stored
#[derive(Debug, Clone, PartialEq)]
pub struct Lesson {
    pub id: RecordId,
    pub student_id: RecordId,
    pub tutor_id: RecordId,
    pub date: String,
    pub time: String,
    /// Whole hours
    pub duration: u32,
}

impl Lesson {
    pub fn new(
        student_id: &RecordId,
        tutor_id: &RecordId,
        date: &str,
        time: &str,
        duration: u32,
    ) -> Self {
        Lesson {
            id: RecordId::generate(),
            student_id: student_id.clone(),
            tutor_id: tutor_id.clone(),
            date: date.to_string(),
            time: time.to_string(),
            duration,
        }
    }

    /// Decodes a `lessons` row: id, student_id, tutor_id, date, time, duration
    pub(crate) fn from_row(row: &ResultRow) -> Option<Self> {
        Some(Lesson {
            id: RecordId::from(row.text(0)?),
            student_id: RecordId::from(row.text(1)?),
            tutor_id: RecordId::from(row.text(2)?),
            date: row.text(3).unwrap_or_default().to_string(),
            time: row.text(4).unwrap_or_default().to_string(),
            duration: u32::try_from(row.integer(5)?).ok()?,
        })
    }
}

/// Fields of a student that may be changed in place; `None` leaves a field as is
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StudentUpdate {
    pub hourly_price: Option<f64>,
    pub discount: Option<f64>,
}

impl StudentUpdate {
    pub fn price(hourly_price: f64) -> Self {
        StudentUpdate {
            hourly_price: Some(hourly_price),
            discount: None,
        }
    }

    pub fn discount(discount: f64) -> Self {
        StudentUpdate {
            hourly_price: None,
            discount: Some(discount),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hourly_price.is_none() && self.discount.is_none()
    }
}
