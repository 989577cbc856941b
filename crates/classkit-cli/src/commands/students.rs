//! The `classkit students` command family.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use comfy_table::{Cell, Table};
use serde::Serialize;

use classkit_core::config::load_config_from;
use classkit_core::input::{parse_mark, Confirmation};
use classkit_core::store::{Extreme, SortOrder, StudentStore};
use classkit_core::students::{
    Student, StudentFields, StudentResult, MAX_COURSEWORK_MARK, MAX_EXAM_MARK,
};

use super::console::prompt_confirmation;

#[derive(Subcommand)]
pub enum StudentAction {
    /// List every record with totals and grades
    List {
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Order by overall percentage (display only, not saved)
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
    },

    /// Show one student's record
    Show {
        /// Student id
        id: String,
    },

    /// Add a new student
    Add {
        #[command(flatten)]
        record: RecordArgs,
    },

    /// Replace a student's name and marks
    Update {
        #[command(flatten)]
        record: RecordArgs,
    },

    /// Delete a student
    Delete {
        /// Student id
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Show the highest-scoring student
    Highest,

    /// Show the lowest-scoring student
    Lowest,

    /// Show class size and average percentage
    Summary,
}

/// Positional fields of a record, kept as text so bad marks are reported
/// by the record rules instead of the argument parser.
#[derive(clap::Args)]
pub struct RecordArgs {
    /// Student id
    id: String,
    /// Full name
    name: String,
    /// Coursework 1 mark (0-20)
    #[arg(allow_hyphen_values = true)]
    cw1: String,
    /// Coursework 2 mark (0-20)
    #[arg(allow_hyphen_values = true)]
    cw2: String,
    /// Coursework 3 mark (0-20)
    #[arg(allow_hyphen_values = true)]
    cw3: String,
    /// Exam mark (0-100)
    #[arg(allow_hyphen_values = true)]
    exam: String,
}

impl RecordArgs {
    fn fields(&self) -> Result<StudentFields> {
        let coursework = [
            parse_mark("coursework 1", &self.cw1, MAX_COURSEWORK_MARK)?,
            parse_mark("coursework 2", &self.cw2, MAX_COURSEWORK_MARK)?,
            parse_mark("coursework 3", &self.cw3, MAX_COURSEWORK_MARK)?,
        ];
        let exam = parse_mark("exam", &self.exam, MAX_EXAM_MARK)?;
        Ok(StudentFields::new(self.name.trim(), coursework, exam))
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SortArg {
    Asc,
    Desc,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Asc => SortOrder::Ascending,
            SortArg::Desc => SortOrder::Descending,
        }
    }
}

/// A record with its derived figures, as emitted by `list --format json`.
#[derive(Serialize)]
struct StudentView<'a> {
    #[serde(flatten)]
    student: &'a Student,
    #[serde(flatten)]
    result: StudentResult,
}

pub fn execute(file: Option<PathBuf>, action: StudentAction, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let path = file.unwrap_or(config.students_path);
    tracing::debug!(path = %path.display(), "opening student store");

    let (mut store, missing) = StudentStore::open_or_empty(path)?;
    if let Some(e) = missing {
        eprintln!("Warning: {e}");
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let result = run_action(&mut store, action, &mut stdin.lock(), &mut stdout.lock());
    if let Some(warning) = unsaved_warning(&store) {
        eprintln!("{warning}");
    }
    result
}

/// Warning shown when the last change could not be written back.
fn unsaved_warning(store: &StudentStore) -> Option<String> {
    store.is_dirty().then(|| {
        format!(
            "Warning: changes were not saved to {}; the file may be out of date",
            store.path().display()
        )
    })
}

/// Apply one action to `store`, reading confirmations from `input`.
pub fn run_action<I: BufRead, O: Write>(
    store: &mut StudentStore,
    action: StudentAction,
    input: &mut I,
    out: &mut O,
) -> Result<()> {
    match action {
        StudentAction::List { format, sort } => {
            if let Some(order) = sort {
                store.sort_by_percentage(order.into());
            }
            match format {
                OutputFormat::Json => {
                    let views: Vec<StudentView<'_>> = store
                        .students()
                        .iter()
                        .map(|student| StudentView {
                            student,
                            result: student.result(),
                        })
                        .collect();
                    writeln!(out, "{}", serde_json::to_string_pretty(&views)?)?;
                }
                OutputFormat::Text => {
                    writeln!(out, "Total Students: {}", store.len())?;
                    if store.is_empty() {
                        writeln!(out, "No student records found.")?;
                    } else {
                        writeln!(out, "{}", records_table(store.students()))?;
                    }
                }
            }
        }
        StudentAction::Show { id } => {
            let student = store.get(id.trim())?;
            print_card(out, "Individual Student Record", student)?;
        }
        StudentAction::Add { record } => {
            let fields = record.fields()?;
            let student = Student::new(record.id.trim(), fields.name, fields.coursework, fields.exam);
            let label = student.label();
            store.add(student)?;
            writeln!(out, "Added {label}")?;
        }
        StudentAction::Update { record } => {
            let fields = record.fields()?;
            store.update(record.id.trim(), fields)?;
            writeln!(out, "Updated {}", record.id.trim())?;
        }
        StudentAction::Delete { id, yes } => {
            let id = id.trim();
            let label = store.get(id)?.label();
            let confirmation = if yes {
                Confirmation::Confirmed
            } else {
                let question = format!("Delete {label}? (yes/no): ");
                prompt_confirmation(input, out, &question)?.unwrap_or(Confirmation::Declined)
            };
            match store.delete(id, confirmation)? {
                Some(removed) => writeln!(out, "Deleted {}", removed.label())?,
                None => writeln!(out, "Deletion cancelled.")?,
            }
        }
        StudentAction::Highest => print_extreme(out, store, Extreme::Highest)?,
        StudentAction::Lowest => print_extreme(out, store, Extreme::Lowest)?,
        StudentAction::Summary => {
            let summary = store.summary();
            writeln!(out, "Total Students: {}", summary.count)?;
            match summary.average_percentage {
                Some(avg) => writeln!(out, "Class Average: {avg:.2}%")?,
                None => writeln!(out, "No student records found.")?,
            }
        }
    }

    Ok(())
}

fn print_extreme<O: Write>(out: &mut O, store: &StudentStore, extreme: Extreme) -> Result<()> {
    let title = match extreme {
        Extreme::Highest => "Highest Scoring Student",
        Extreme::Lowest => "Lowest Scoring Student",
    };
    match store.find_extreme(extreme) {
        Some(student) => print_card(out, title, student),
        None => {
            writeln!(out, "No student records found.")?;
            Ok(())
        }
    }
}

fn print_card<O: Write>(out: &mut O, title: &str, student: &Student) -> Result<()> {
    let result = student.result();
    writeln!(out, "{title}")?;
    writeln!(out, "  Name: {}", student.name)?;
    writeln!(out, "  Number: {}", student.id)?;
    writeln!(out, "  Coursework Total: {}/60", result.coursework_total)?;
    writeln!(out, "  Exam Mark: {}/100", student.exam)?;
    writeln!(out, "  Overall %: {:.2}%", result.percentage)?;
    writeln!(out, "  Grade: {}", result.grade)?;
    Ok(())
}

fn records_table(students: &[Student]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "ID",
        "Name",
        "Coursework",
        "Exam",
        "Total",
        "Overall %",
        "Grade",
    ]);

    for student in students {
        let result = student.result();
        table.add_row(vec![
            Cell::new(&student.id),
            Cell::new(&student.name),
            Cell::new(format!("{}/60", result.coursework_total)),
            Cell::new(format!("{}/100", student.exam)),
            Cell::new(format!("{}/160", result.overall_total)),
            Cell::new(format!("{:.2}%", result.percentage)),
            Cell::new(result.grade),
        ]);
    }

    table
}
