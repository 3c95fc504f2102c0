//! CLI argument definitions and command dispatch.
//!
//! The command layer turns operation results into console messages.
//! Identifiers in messages are shortened with `truncate_middle`; full
//! identifiers are printed on their own line wherever a caller needs to copy
//! one for a later command.

use crate::config::Config;
use crate::core::db::Table;
use crate::core::Result;
use crate::models::{RecordId, StudentUpdate};
use crate::truncate::{truncate_middle, DEFAULT_MAX_LENGTH};
use crate::tutoring::TutoringSystem;
use clap::{Parser, Subcommand};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the SQLite database file (overrides the config file)
    #[arg(short, long, global = true)]
    pub db: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Add a student with an hourly price and optional discount
    AddStudent {
        name: String,
        hourly_price: f64,
        /// Fraction taken off the price, in [0, 1)
        #[arg(long, default_value_t = 0.0)]
        discount: f64,
    },
    /// Add a tutor with an hourly rate
    AddTutor { name: String, hourly_rate: f64 },
    /// Change a student's price and/or discount
    UpdateStudent {
        id: String,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        discount: Option<f64>,
    },
    /// Book a lesson between an existing student and tutor
    ScheduleLesson {
        student_id: String,
        tutor_id: String,
        /// Calendar date, e.g. 2023-05-20
        date: String,
        /// Clock time, e.g. 15:00
        time: String,
        /// Whole hours
        duration: u32,
    },
    /// Amount owed by a student for a number of hours
    Payment { student_id: String, hours: f64 },
    /// Print the student table
    Students,
    /// Print the tutor table
    Tutors,
    /// Print the lesson table
    Lessons,
    /// Walk through a sample session on a fresh database
    Demo {
        /// Keep an existing database file instead of starting fresh
        #[arg(long)]
        keep: bool,
    },
}

/// Opens the configured store and runs `args.command` against it.
pub fn run<W: Write>(args: &Args, config: &Config, out: &mut W) -> Result<()> {
    let db_path = args.db.clone().unwrap_or_else(|| config.database_path());

    if args.command == (Command::Demo { keep: false }) && db_path.exists() {
        fs::remove_file(&db_path)?;
        writeln!(out, "File has been removed.")?;
    }

    info!("Using database {}", db_path.display());
    let system = TutoringSystem::open(&db_path)?;
    args.command.run(&system, out)
}

impl Command {
    pub fn run<W: Write>(&self, system: &TutoringSystem, out: &mut W) -> Result<()> {
        match self {
            Command::AddStudent {
                name,
                hourly_price,
                discount,
            } => {
                add_student(system, out, name, *hourly_price, *discount)?;
            }
            Command::AddTutor { name, hourly_rate } => {
                add_tutor(system, out, name, *hourly_rate)?;
            }
            Command::UpdateStudent {
                id,
                price,
                discount,
            } => {
                let update = StudentUpdate {
                    hourly_price: *price,
                    discount: *discount,
                };
                update_student(system, out, &RecordId::from(id.as_str()), update)?;
            }
            Command::ScheduleLesson {
                student_id,
                tutor_id,
                date,
                time,
                duration,
            } => {
                schedule_lesson(
                    system,
                    out,
                    &RecordId::from(student_id.as_str()),
                    &RecordId::from(tutor_id.as_str()),
                    date,
                    time,
                    *duration,
                )?;
            }
            Command::Payment { student_id, hours } => {
                payment(system, out, &RecordId::from(student_id.as_str()), *hours)?;
            }
            Command::Students => system.display_table(Table::Students, out)?,
            Command::Tutors => system.display_table(Table::Tutors, out)?,
            Command::Lessons => system.display_table(Table::Lessons, out)?,
            Command::Demo { .. } => demo(system, out)?,
        }
        Ok(())
    }
}

fn short(id: &RecordId) -> String {
    truncate_middle(id.as_str(), DEFAULT_MAX_LENGTH)
}

fn add_student<W: Write>(
    system: &TutoringSystem,
    out: &mut W,
    name: &str,
    hourly_price: f64,
    discount: f64,
) -> Result<RecordId> {
    let id = system.add_student(name, hourly_price, discount)?;
    writeln!(out, "Student {} added [{}].", name, short(&id))?;
    writeln!(out, "  id: {}", id)?;
    Ok(id)
}

fn add_tutor<W: Write>(
    system: &TutoringSystem,
    out: &mut W,
    name: &str,
    hourly_rate: f64,
) -> Result<RecordId> {
    let id = system.add_tutor(name, hourly_rate)?;
    writeln!(out, "Tutor {} added [{}].", name, short(&id))?;
    writeln!(out, "  id: {}", id)?;
    Ok(id)
}

fn update_student<W: Write>(
    system: &TutoringSystem,
    out: &mut W,
    id: &RecordId,
    update: StudentUpdate,
) -> Result<()> {
    if system.update_student(id, update)? {
        writeln!(out, "Student with id [{}] has been updated.", short(id))?;
    } else {
        writeln!(out, "Student with id [{}] not found in the database.", short(id))?;
    }
    Ok(())
}

fn schedule_lesson<W: Write>(
    system: &TutoringSystem,
    out: &mut W,
    student_id: &RecordId,
    tutor_id: &RecordId,
    date: &str,
    time: &str,
    duration: u32,
) -> Result<()> {
    let Some(lesson_id) = system.schedule_lesson(student_id, tutor_id, date, time, duration)? else {
        writeln!(out, "Student or tutor not found in the database.")?;
        return Ok(());
    };

    writeln!(
        out,
        "Lesson scheduled for {} at {} for {} hour(s).",
        date, time, duration
    )?;
    if let Some(student) = system.student(student_id)? {
        writeln!(out, "\tStudent: {} [{}]", student.name, short(student_id))?;
    }
    if let Some(tutor) = system.tutor(tutor_id)? {
        writeln!(out, "\tTutor: {} [{}]", tutor.name, short(tutor_id))?;
    }
    writeln!(out, "  id: {}", lesson_id)?;
    Ok(())
}

fn payment<W: Write>(
    system: &TutoringSystem,
    out: &mut W,
    student_id: &RecordId,
    hours: f64,
) -> Result<()> {
    match system.calculate_payment(student_id, hours)? {
        Some(amount) => writeln!(
            out,
            "Payment for student with id [{}]: £{:.2}",
            short(student_id),
            amount
        )?,
        None => writeln!(
            out,
            "Student with id [{}] not found in the database.",
            short(student_id)
        )?,
    }
    Ok(())
}

fn demo<W: Write>(system: &TutoringSystem, out: &mut W) -> Result<()> {
    let alice = add_student(system, out, "Alice", 20.0, 0.1)?;
    let bob = add_student(system, out, "Bob", 25.0, 0.0)?;

    let john = add_tutor(system, out, "John", 30.0)?;
    let sarah = add_tutor(system, out, "Sarah", 35.0)?;

    let update = StudentUpdate {
        hourly_price: Some(22.0),
        discount: Some(0.2),
    };
    update_student(system, out, &alice, update)?;

    system.display_table(Table::Students, out)?;
    system.display_table(Table::Tutors, out)?;

    payment(system, out, &alice, 5.0)?;
    payment(system, out, &bob, 3.0)?;
    payment(system, out, &RecordId::from("Not an ID"), 4.0)?;

    schedule_lesson(system, out, &alice, &john, "2023-05-20", "15:00", 2)?;
    schedule_lesson(system, out, &bob, &sarah, "2023-05-21", "14:30", 1)?;

    system.display_table(Table::Lessons, out)?;
    Ok(())
}
