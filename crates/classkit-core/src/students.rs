//! Student records, grading, and the flat-file record format.
//!
//! A record line is `id,name,cw1,cw2,cw3,exam`. Files may start with a
//! digits-only header holding the record count; it is skipped on load and
//! re-derived on save.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ClasskitError, Result};

/// Number of coursework components per student.
pub const COURSEWORK_COMPONENTS: usize = 3;
/// Highest mark for one coursework component.
pub const MAX_COURSEWORK_MARK: u32 = 20;
/// Highest exam mark.
pub const MAX_EXAM_MARK: u32 = 100;
/// Highest overall total (3 × 20 + 100).
pub const MAX_TOTAL: u32 = MAX_COURSEWORK_MARK * COURSEWORK_COMPONENTS as u32 + MAX_EXAM_MARK;

const FIELD_COUNT: usize = 6;

/// A single student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Unique identifier.
    pub id: String,
    pub name: String,
    /// Coursework component marks, each `0..=20`.
    pub coursework: [u32; COURSEWORK_COMPONENTS],
    /// Exam mark, `0..=100`.
    pub exam: u32,
}

/// The mutable part of a record, used by updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentFields {
    pub name: String,
    pub coursework: [u32; COURSEWORK_COMPONENTS],
    pub exam: u32,
}

impl Student {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        coursework: [u32; COURSEWORK_COMPONENTS],
        exam: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coursework,
            exam,
        }
    }

    /// Check every field against the record rules.
    pub fn validate(&self) -> Result<()> {
        validate_text("student id", &self.id)?;
        validate_text("name", &self.name)?;
        validate_marks(&self.coursework, self.exam)
    }

    /// Label used when listing students for selection.
    pub fn label(&self) -> String {
        format!("{} - {}", self.id, self.name)
    }

    pub fn result(&self) -> StudentResult {
        compute_result(self)
    }

    pub(crate) fn apply(&mut self, fields: StudentFields) {
        self.name = fields.name;
        self.coursework = fields.coursework;
        self.exam = fields.exam;
    }

    /// Render as one record line (no trailing newline).
    pub fn to_record_line(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            self.id,
            self.name,
            self.coursework[0],
            self.coursework[1],
            self.coursework[2],
            self.exam
        )
    }

    /// Parse one record line. Returns `None` for lines with fewer than six
    /// fields, empty id or name, or marks that are non-numeric or out of
    /// range; fields past the sixth are ignored.
    pub fn parse_record_line(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.trim().split(',').map(str::trim).collect();
        if fields.len() < FIELD_COUNT {
            return None;
        }

        let mark = |i: usize| fields[i].parse::<u32>().ok();
        let student = Self {
            id: fields[0].to_string(),
            name: fields[1].to_string(),
            coursework: [mark(2)?, mark(3)?, mark(4)?],
            exam: mark(5)?,
        };
        student.validate().ok()?;
        Some(student)
    }
}

impl StudentFields {
    pub fn new(name: impl Into<String>, coursework: [u32; COURSEWORK_COMPONENTS], exam: u32) -> Self {
        Self {
            name: name.into(),
            coursework,
            exam,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_text("name", &self.name)?;
        validate_marks(&self.coursework, self.exam)
    }
}

fn validate_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ClasskitError::Validation(format!("{field} must not be empty")));
    }
    if value.contains([',', '\n', '\r']) {
        return Err(ClasskitError::Validation(format!(
            "{field} must not contain commas or line breaks"
        )));
    }
    Ok(())
}

fn validate_marks(coursework: &[u32; COURSEWORK_COMPONENTS], exam: u32) -> Result<()> {
    for (i, &mark) in coursework.iter().enumerate() {
        if mark > MAX_COURSEWORK_MARK {
            return Err(ClasskitError::Validation(format!(
                "coursework {} must be between 0 and {MAX_COURSEWORK_MARK}, got {mark}",
                i + 1
            )));
        }
    }
    if exam > MAX_EXAM_MARK {
        return Err(ClasskitError::Validation(format!(
            "exam must be between 0 and {MAX_EXAM_MARK}, got {exam}"
        )));
    }
    Ok(())
}

/// Letter grade derived from a student's percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    A,
    B,
    C,
    D,
    F,
}

impl LetterGrade {
    /// A ≥ 70, B ≥ 60, C ≥ 50, D ≥ 40, else F.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 70.0 {
            LetterGrade::A
        } else if percentage >= 60.0 {
            LetterGrade::B
        } else if percentage >= 50.0 {
            LetterGrade::C
        } else if percentage >= 40.0 {
            LetterGrade::D
        } else {
            LetterGrade::F
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LetterGrade::A => "A",
            LetterGrade::B => "B",
            LetterGrade::C => "C",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
        };
        f.write_str(s)
    }
}

/// Derived figures for one student.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StudentResult {
    /// Sum of coursework marks, out of 60.
    pub coursework_total: u32,
    /// Coursework plus exam, out of 160.
    pub overall_total: u32,
    /// Overall total as a percentage of 160.
    pub percentage: f64,
    pub grade: LetterGrade,
}

/// Compute totals, percentage and grade for `student`.
pub fn compute_result(student: &Student) -> StudentResult {
    let coursework_total = student
        .coursework
        .iter()
        .fold(0u32, |total, &mark| total.saturating_add(mark));
    let overall_total = coursework_total.saturating_add(student.exam);
    let percentage = f64::from(overall_total) * 100.0 / f64::from(MAX_TOTAL);
    StudentResult {
        coursework_total,
        overall_total,
        percentage,
        grade: LetterGrade::from_percentage(percentage),
    }
}

/// Parse store file contents.
///
/// A digits-only first line is treated as a record-count header and
/// skipped. Blank and malformed lines are skipped with a warning.
pub fn parse_records(content: &str) -> Vec<Student> {
    let mut lines = content.lines().enumerate().peekable();

    if lines.peek().is_some_and(|(_, first)| is_count_header(first)) {
        lines.next();
    }

    lines
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| {
            let parsed = Student::parse_record_line(line);
            if parsed.is_none() {
                tracing::warn!(line = index + 1, "skipping malformed student record");
            }
            parsed
        })
        .collect()
}

fn is_count_header(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit())
}

/// Render records in store file format: count header, then one line each.
pub fn render_records(students: &[Student]) -> String {
    let mut out = format!("{}\n", students.len());
    for student in students {
        out.push_str(&student.to_record_line());
        out.push('\n');
    }
    out
}
