//! Flat-file student record store.
//!
//! The store owns the in-memory collection and the path it came from. Every
//! successful mutation rewrites the whole file. If that rewrite fails the
//! mutation is kept in memory, the store is marked dirty, and the
//! [`ClasskitError::Persistence`] error is returned so the caller can report
//! it. The next successful save clears the dirty flag.

use std::borrow::Cow;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{ClasskitError, Result};
use crate::input::Confirmation;
use crate::students::{compute_result, parse_records, render_records, Student, StudentFields};

/// Read every record from `path`.
///
/// Lines that are not valid UTF-8 are decoded lossily so one badly encoded
/// name does not make the rest of the file unreadable.
pub fn load_all(path: &Path) -> Result<Vec<Student>> {
    let bytes = std::fs::read(path).map_err(|source| ClasskitError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let students = parse_records(&decode_lines(path, &bytes));
    tracing::debug!(path = %path.display(), records = students.len(), "loaded student records");
    Ok(students)
}

fn decode_lines<'a>(path: &Path, bytes: &'a [u8]) -> Cow<'a, str> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Cow::Borrowed(text);
    }

    let lines: Vec<Cow<'_, str>> = bytes
        .split(|&b| b == b'\n')
        .enumerate()
        .map(|(index, line)| {
            let decoded = String::from_utf8_lossy(line);
            if let Cow::Owned(_) = decoded {
                tracing::warn!(
                    path = %path.display(),
                    line = index + 1,
                    "replaced invalid UTF-8 in student record"
                );
            }
            decoded
        })
        .collect();
    Cow::Owned(lines.join("\n"))
}

/// Overwrite `path` with a count header and one line per record.
pub fn save_all(path: &Path, students: &[Student]) -> Result<()> {
    std::fs::write(path, render_records(students)).map_err(|source| {
        ClasskitError::Persistence {
            path: path.to_path_buf(),
            source,
        }
    })?;
    tracing::debug!(path = %path.display(), records = students.len(), "saved student records");
    Ok(())
}

fn is_not_found(err: &ClasskitError) -> bool {
    matches!(err, ClasskitError::SourceUnavailable { source, .. } if source.kind() == io::ErrorKind::NotFound)
}

/// Which end of the percentage ranking to look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Highest,
    Lowest,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Class-wide figures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassSummary {
    pub count: usize,
    /// Mean percentage, `None` when there are no records.
    pub average_percentage: Option<f64>,
}

/// The student collection bound to its backing file.
#[derive(Debug, Clone)]
pub struct StudentStore {
    path: PathBuf,
    students: Vec<Student>,
    dirty: bool,
}

impl StudentStore {
    /// An empty store that will write to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            students: Vec::new(),
            dirty: false,
        }
    }

    /// Load the store from `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let students = load_all(&path)?;
        Ok(Self {
            path,
            students,
            dirty: false,
        })
    }

    /// Load the store, falling back to an empty one when the file does not
    /// exist yet. The not-found error is handed back so it can be reported
    /// once. Any other load failure is returned as an error, so a file that
    /// exists but cannot be read is never overwritten.
    pub fn open_or_empty(path: impl Into<PathBuf>) -> Result<(Self, Option<ClasskitError>)> {
        let path = path.into();
        match Self::open(&path) {
            Ok(store) => Ok((store, None)),
            Err(err) if is_not_found(&err) => {
                tracing::warn!(path = %path.display(), "starting with an empty student store");
                Ok((Self::empty(path), Some(err)))
            }
            Err(err) => Err(err),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Whether memory holds changes the last write failed to persist.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Rewrite the backing file from memory.
    pub fn save(&mut self) -> Result<()> {
        match save_all(&self.path, &self.students) {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(err) => {
                self.dirty = true;
                tracing::warn!(path = %self.path.display(), "in-memory records differ from disk");
                Err(err)
            }
        }
    }

    pub fn find(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    /// Like [`StudentStore::find`], but an unknown id is an error.
    pub fn get(&self, id: &str) -> Result<&Student> {
        let index = self.position(id)?;
        Ok(&self.students[index])
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.students
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| ClasskitError::UnknownStudent(id.to_string()))
    }

    /// Append a new record and persist.
    pub fn add(&mut self, student: Student) -> Result<()> {
        student.validate()?;
        if self.find(&student.id).is_some() {
            return Err(ClasskitError::Validation(format!(
                "student id '{}' already exists",
                student.id
            )));
        }

        tracing::info!(id = %student.id, "adding student");
        self.students.push(student);
        self.save()
    }

    /// Replace the name and marks of student `id` and persist.
    pub fn update(&mut self, id: &str, fields: StudentFields) -> Result<()> {
        fields.validate()?;
        let index = self.position(id)?;

        tracing::info!(id, "updating student");
        self.students[index].apply(fields);
        self.save()
    }

    /// Remove student `id` if the caller confirmed, then persist.
    ///
    /// A declined confirmation changes nothing and returns `Ok(None)`.
    pub fn delete(&mut self, id: &str, confirmation: Confirmation) -> Result<Option<Student>> {
        let index = self.position(id)?;
        if !confirmation.is_confirmed() {
            return Ok(None);
        }

        tracing::info!(id, "deleting student");
        let removed = self.students.remove(index);
        self.save()?;
        Ok(Some(removed))
    }

    /// The record with the highest or lowest percentage. Ties go to the
    /// earliest record.
    pub fn find_extreme(&self, extreme: Extreme) -> Option<&Student> {
        let mut best: Option<(&Student, u32)> = None;
        for student in &self.students {
            let total = compute_result(student).overall_total;
            let better = match best {
                None => true,
                Some((_, best_total)) => match extreme {
                    Extreme::Highest => total > best_total,
                    Extreme::Lowest => total < best_total,
                },
            };
            if better {
                best = Some((student, total));
            }
        }
        best.map(|(student, _)| student)
    }

    /// Stable in-place sort by percentage. Not persisted.
    pub fn sort_by_percentage(&mut self, order: SortOrder) {
        self.students.sort_by(|a, b| {
            let a = compute_result(a).overall_total;
            let b = compute_result(b).overall_total;
            match order {
                SortOrder::Ascending => a.cmp(&b),
                SortOrder::Descending => b.cmp(&a),
            }
        });
    }

    pub fn summary(&self) -> ClassSummary {
        let count = self.students.len();
        let average_percentage = (count > 0).then(|| {
            let sum: f64 = self
                .students
                .iter()
                .map(|s| compute_result(s).percentage)
                .sum();
            sum / count as f64
        });
        ClassSummary {
            count,
            average_percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Vec<Student> {
        vec![
            Student::new("1001", "Ada", [18, 17, 19], 80),
            Student::new("1002", "Bob", [5, 6, 7], 30),
            Student::new("1003", "Cy", [20, 20, 20], 100),
            Student::new("1004", "Di", [10, 10, 10], 50),
        ]
    }

    fn store_with(dir: &TempDir, students: &[Student]) -> StudentStore {
        let path = dir.path().join("students.txt");
        save_all(&path, students).unwrap();
        StudentStore::open(path).unwrap()
    }

    fn ids(store: &StudentStore) -> Vec<&str> {
        store.students().iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("students.txt");
        save_all(&path, &sample()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("4\n1001,Ada,18,17,19,80\n"));
        assert_eq!(load_all(&path).unwrap(), sample());
    }

    #[test]
    fn open_missing_file_is_source_unavailable() {
        let dir = TempDir::new().unwrap();
        let err = StudentStore::open(dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, ClasskitError::SourceUnavailable { .. }));

        let (store, err) = StudentStore::open_or_empty(dir.path().join("missing.txt")).unwrap();
        assert!(store.is_empty());
        assert!(err.is_some());
    }

    #[test]
    fn unreadable_file_is_not_replaced_by_empty_store() {
        let dir = TempDir::new().unwrap();
        // Reading a directory fails with something other than not-found.
        let err = StudentStore::open_or_empty(dir.path()).unwrap_err();
        assert!(matches!(err, ClasskitError::SourceUnavailable { .. }));
    }

    #[test]
    fn invalid_utf8_row_keeps_other_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("students.txt");
        let mut bytes = b"3\n1001,Ada,18,17,19,80\n1002,Jos".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b",5,6,7,30\n1003,Cy,20,20,20,100\n");
        std::fs::write(&path, bytes).unwrap();

        let (mut store, err) = StudentStore::open_or_empty(&path).unwrap();
        assert!(err.is_none());
        assert_eq!(ids(&store), ["1001", "1002", "1003"]);
        assert_eq!(store.students()[1].name, "Jos\u{FFFD}");

        store
            .add(Student::new("2000", "New", [1, 1, 1], 1))
            .unwrap();

        let reloaded = load_all(&path).unwrap();
        assert_eq!(reloaded.len(), 4);
        assert_eq!(reloaded[0].id, "1001");
        assert_eq!(reloaded[2].id, "1003");
    }

    #[test]
    fn out_of_range_marks_in_file_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("students.txt");
        std::fs::write(&path, "2\n1001,Ada,4294967295,1,0,0\n1002,Bob,5,6,7,30\n").unwrap();

        let store = StudentStore::open(&path).unwrap();
        assert_eq!(ids(&store), ["1002"]);
        assert_eq!(store.summary().count, 1);
        assert_eq!(
            store.find_extreme(Extreme::Highest).map(|s| s.id.as_str()),
            Some("1002")
        );
    }

    #[test]
    fn add_appends_and_persists() {
        let dir = TempDir::new().unwrap();
        let mut store = store_with(&dir, &sample());

        store
            .add(Student::new("1005", "Eve", [1, 2, 3], 4))
            .unwrap();

        assert_eq!(store.len(), 5);
        let reloaded = load_all(store.path()).unwrap();
        assert_eq!(reloaded.last().unwrap().id, "1005");
        let content = std::fs::read_to_string(store.path()).unwrap();
        assert!(content.starts_with("5\n"));
    }

    #[test]
    fn add_duplicate_id_leaves_file_unchanged() {
        let dir = TempDir::new().unwrap();
        let mut store = store_with(&dir, &sample());
        let before = std::fs::read_to_string(store.path()).unwrap();

        let err = store
            .add(Student::new("1002", "Impostor", [1, 1, 1], 1))
            .unwrap_err();

        assert!(matches!(err, ClasskitError::Validation(_)));
        assert_eq!(store.len(), 4);
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn add_rejects_out_of_range_marks() {
        let dir = TempDir::new().unwrap();
        let mut store = store_with(&dir, &sample());
        assert!(store.add(Student::new("2000", "X", [21, 0, 0], 0)).is_err());
        assert!(store.add(Student::new("2001", "X", [0, 0, 0], 101)).is_err());
        assert!(store.add(Student::new("2002", "", [0, 0, 0], 0)).is_err());
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn update_replaces_fields_in_place() {
        let dir = TempDir::new().unwrap();
        let mut store = store_with(&dir, &sample());

        store
            .update("1002", StudentFields::new("Robert", [15, 15, 15], 70))
            .unwrap();

        assert_eq!(ids(&store), vec!["1001", "1002", "1003", "1004"]);
        let bob = store.find("1002").unwrap();
        assert_eq!(bob.name, "Robert");
        assert_eq!(bob.exam, 70);
        assert_eq!(load_all(store.path()).unwrap()[1].name, "Robert");
    }

    #[test]
    fn update_unknown_or_invalid_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut store = store_with(&dir, &sample());

        assert!(matches!(
            store.update("9999", StudentFields::new("Nobody", [1, 1, 1], 1)),
            Err(ClasskitError::UnknownStudent(_))
        ));
        assert!(matches!(
            store.update("1001", StudentFields::new("Ada", [1, 1, 1], 150)),
            Err(ClasskitError::Validation(_))
        ));
        assert_eq!(store.find("1001").unwrap().exam, 80);
    }

    #[test]
    fn delete_requires_confirmation() {
        let dir = TempDir::new().unwrap();
        let mut store = store_with(&dir, &sample());

        assert_eq!(store.delete("1003", Confirmation::Declined).unwrap(), None);
        assert_eq!(store.len(), 4);

        let removed = store.delete("1003", Confirmation::Confirmed).unwrap();
        assert_eq!(removed.unwrap().name, "Cy");
        assert_eq!(ids(&store), vec!["1001", "1002", "1004"]);
        assert_eq!(load_all(store.path()).unwrap().len(), 3);

        assert!(matches!(
            store.delete("1003", Confirmation::Confirmed),
            Err(ClasskitError::UnknownStudent(_))
        ));
    }

    #[test]
    fn extremes_and_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, &sample());
        assert_eq!(store.find_extreme(Extreme::Highest).unwrap().id, "1003");
        assert_eq!(store.find_extreme(Extreme::Lowest).unwrap().id, "1002");

        let empty = StudentStore::empty(dir.path().join("none.txt"));
        assert!(empty.find_extreme(Extreme::Highest).is_none());
        assert!(empty.find_extreme(Extreme::Lowest).is_none());
    }

    #[test]
    fn extreme_ties_go_to_first_record() {
        let dir = TempDir::new().unwrap();
        let store = store_with(
            &dir,
            &[
                Student::new("a", "A", [10, 10, 10], 50),
                Student::new("b", "B", [10, 10, 10], 50),
            ],
        );
        assert_eq!(store.find_extreme(Extreme::Highest).unwrap().id, "a");
        assert_eq!(store.find_extreme(Extreme::Lowest).unwrap().id, "a");
    }

    #[test]
    fn sort_directions_reverse_each_other() {
        let dir = TempDir::new().unwrap();
        let mut store = store_with(&dir, &sample());

        store.sort_by_percentage(SortOrder::Ascending);
        let ascending: Vec<String> = ids(&store).iter().map(|s| s.to_string()).collect();
        assert_eq!(ascending, vec!["1002", "1004", "1001", "1003"]);

        store.sort_by_percentage(SortOrder::Descending);
        let mut descending: Vec<String> = ids(&store).iter().map(|s| s.to_string()).collect();
        descending.reverse();
        assert_eq!(descending, ascending);
    }

    #[test]
    fn sort_is_stable_for_ties() {
        let dir = TempDir::new().unwrap();
        let mut store = store_with(
            &dir,
            &[
                Student::new("t1", "T1", [10, 10, 10], 50),
                Student::new("hi", "Hi", [20, 20, 20], 100),
                Student::new("t2", "T2", [5, 10, 15], 50),
                Student::new("t3", "T3", [10, 10, 10], 50),
            ],
        );

        store.sort_by_percentage(SortOrder::Ascending);
        assert_eq!(ids(&store), vec!["t1", "t2", "t3", "hi"]);

        store.sort_by_percentage(SortOrder::Descending);
        assert_eq!(ids(&store), vec!["hi", "t1", "t2", "t3"]);
    }

    #[test]
    fn sort_does_not_persist() {
        let dir = TempDir::new().unwrap();
        let mut store = store_with(&dir, &sample());
        let before = std::fs::read_to_string(store.path()).unwrap();
        store.sort_by_percentage(SortOrder::Descending);
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn failed_write_keeps_memory_and_marks_dirty() {
        let dir = TempDir::new().unwrap();
        // A directory path cannot be written as a file.
        let mut store = StudentStore::empty(dir.path());

        let err = store
            .add(Student::new("1", "Ada", [1, 2, 3], 4))
            .unwrap_err();

        assert!(matches!(err, ClasskitError::Persistence { .. }));
        assert_eq!(store.len(), 1);
        assert!(store.is_dirty());
    }

    #[test]
    fn summary_average() {
        let dir = TempDir::new().unwrap();
        let store = store_with(
            &dir,
            &[
                Student::new("a", "A", [20, 20, 20], 100),
                Student::new("b", "B", [0, 0, 0], 0),
            ],
        );
        let summary = store.summary();
        assert_eq!(summary.count, 2);
        assert!((summary.average_percentage.unwrap() - 50.0).abs() < 1e-9);
        assert_eq!(
            StudentStore::empty("x.txt").summary().average_percentage,
            None
        );
    }
}
