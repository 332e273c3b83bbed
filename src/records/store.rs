use atomic_write_file::AtomicWriteFile;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use super::types::{ExamResult, NewStudent, Student, StudentPatch, StudentRecord};
use super::validation::{validate_exam_result, validate_new_student, validate_patch};
use crate::benefits::Band;

const BOOK_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("student {0} not found")]
    NotFound(u64),
    #[error("a student with document number {0} already exists")]
    DuplicateDocument(String),
    #[error("an exam result with registration number {0} already exists")]
    DuplicateRegistration(String),
    #[error("invalid record: {}", .0.join("; "))]
    Invalid(Vec<String>),
    #[error("unsupported record book version: {0}")]
    UnsupportedVersion(u32),
    #[error("record file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("record file {path} is malformed: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage for students and their exam results.
///
/// Lookups return owned records so implementations are free to load lazily.
pub trait RecordStore {
    fn list(&self) -> StoreResult<Vec<StudentRecord>>;
    fn get(&self, id: u64) -> StoreResult<Option<StudentRecord>>;
    fn find_by_document(&self, document_number: &str) -> StoreResult<Option<StudentRecord>>;
    /// Records whose global score falls in `band`. Students without a result never match.
    fn find_by_score(&self, band: &Band) -> StoreResult<Vec<StudentRecord>>;
    fn create(&mut self, input: NewStudent) -> StoreResult<u64>;
    fn update(&mut self, id: u64, patch: StudentPatch) -> StoreResult<()>;
    /// Attach or replace the exam result of a student.
    fn set_exam_result(&mut self, id: u64, result: ExamResult) -> StoreResult<()>;
    /// Delete a student together with its exam result.
    /// Returns true if the student existed.
    fn delete(&mut self, id: u64) -> StoreResult<bool>;
}

/// In-memory record book. Also the on-disk format of [`JsonFileStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordBook {
    pub version: u32,
    #[serde(default = "first_id")]
    pub next_id: u64,
    #[serde(default)]
    pub records: BTreeMap<u64, StudentRecord>,
}

fn first_id() -> u64 {
    1
}

impl Default for RecordBook {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordBook {
    /// Create a new empty record book with version 1
    pub fn new() -> Self {
        Self {
            version: BOOK_VERSION,
            next_id: first_id(),
            records: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn document_taken(&self, document_number: &str, except: Option<u64>) -> bool {
        self.records
            .values()
            .any(|r| r.student.document_number == document_number && Some(r.student.id) != except)
    }

    fn registration_taken(&self, registration_number: &str, except: Option<u64>) -> bool {
        self.records.values().any(|r| {
            Some(r.student.id) != except
                && r.exam_result
                    .as_ref()
                    .is_some_and(|e| e.registration_number == registration_number)
        })
    }
}

/// Document and registration numbers are keys; surrounding whitespace is not part of them.
fn normalize_key(key: &mut String) {
    let trimmed = key.trim();
    if trimmed.len() != key.len() {
        *key = trimmed.to_string();
    }
}

fn normalize_exam_result(result: &mut ExamResult) {
    normalize_key(&mut result.registration_number);
}

impl RecordStore for RecordBook {
    fn list(&self) -> StoreResult<Vec<StudentRecord>> {
        Ok(self.records.values().cloned().collect())
    }

    fn get(&self, id: u64) -> StoreResult<Option<StudentRecord>> {
        Ok(self.records.get(&id).cloned())
    }

    fn find_by_document(&self, document_number: &str) -> StoreResult<Option<StudentRecord>> {
        let wanted = document_number.trim();
        Ok(self
            .records
            .values()
            .find(|r| r.student.document_number == wanted)
            .cloned())
    }

    fn find_by_score(&self, band: &Band) -> StoreResult<Vec<StudentRecord>> {
        Ok(self
            .records
            .values()
            .filter(|r| r.global_score().is_some_and(|s| band.matches(s.value())))
            .cloned()
            .collect())
    }

    fn create(&mut self, mut input: NewStudent) -> StoreResult<u64> {
        validate_new_student(&input).map_err(StoreError::Invalid)?;
        normalize_key(&mut input.document_number);
        if let Some(ref mut result) = input.exam_result {
            normalize_exam_result(result);
        }

        if self.document_taken(&input.document_number, None) {
            return Err(StoreError::DuplicateDocument(input.document_number));
        }
        if let Some(ref result) = input.exam_result {
            if self.registration_taken(&result.registration_number, None) {
                return Err(StoreError::DuplicateRegistration(
                    result.registration_number.clone(),
                ));
            }
        }

        let id = self.next_id;
        self.next_id += 1;
        let now = Utc::now();
        let student = Student {
            id,
            document_type: input.document_type,
            document_number: input.document_number,
            first_name: input.first_name,
            second_name: input.second_name,
            first_last_name: input.first_last_name,
            second_last_name: input.second_last_name,
            email: input.email,
            phone: input.phone,
            created_at: now,
            updated_at: now,
        };
        debug!(id, document = %student.document_number, "created student");
        self.records.insert(
            id,
            StudentRecord {
                student,
                exam_result: input.exam_result,
            },
        );
        Ok(id)
    }

    fn update(&mut self, id: u64, mut patch: StudentPatch) -> StoreResult<()> {
        validate_patch(&patch).map_err(StoreError::Invalid)?;
        if let Some(ref mut doc) = patch.document_number {
            normalize_key(doc);
        }

        if let Some(ref doc) = patch.document_number {
            if self.document_taken(doc, Some(id)) {
                return Err(StoreError::DuplicateDocument(doc.clone()));
            }
        }

        let record = self.records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        patch.apply(&mut record.student, Utc::now());
        debug!(id, "updated student");
        Ok(())
    }

    fn set_exam_result(&mut self, id: u64, mut result: ExamResult) -> StoreResult<()> {
        validate_exam_result(&result).map_err(StoreError::Invalid)?;
        normalize_exam_result(&mut result);

        if !self.records.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        if self.registration_taken(&result.registration_number, Some(id)) {
            return Err(StoreError::DuplicateRegistration(result.registration_number));
        }

        if let Some(record) = self.records.get_mut(&id) {
            record.exam_result = Some(result);
            record.student.updated_at = Utc::now();
        }
        debug!(id, "stored exam result");
        Ok(())
    }

    fn delete(&mut self, id: u64) -> StoreResult<bool> {
        let existed = self.records.remove(&id).is_some();
        if existed {
            debug!(id, "deleted student and exam result");
        }
        Ok(existed)
    }
}

/// Load a record book from a JSON file
///
/// If the file doesn't exist, returns a new empty book.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_record_book(path: &Path) -> StoreResult<RecordBook> {
    if !path.exists() {
        debug!(path = %path.display(), "record file missing, starting empty");
        return Ok(RecordBook::new());
    }

    let file = File::open(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let book: RecordBook = serde_json::from_reader(file).map_err(|source| StoreError::Format {
        path: path.to_path_buf(),
        source,
    })?;

    if book.version != BOOK_VERSION {
        return Err(StoreError::UnsupportedVersion(book.version));
    }

    Ok(book)
}

/// Save a record book to a JSON file atomically
///
/// Creates the parent directory if it doesn't exist.
pub fn save_record_book(path: &Path, book: &RecordBook) -> StoreResult<()> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut file = AtomicWriteFile::open(path).map_err(io_err)?;

    serde_json::to_writer_pretty(&mut file, book).map_err(|source| StoreError::Format {
        path: path.to_path_buf(),
        source,
    })?;
    file.write_all(b"\n").map_err(io_err)?;

    file.commit().map_err(io_err)?;

    Ok(())
}

/// A [`RecordBook`] persisted to a JSON file. Every mutation is written
/// through before it returns.
///
/// Mutations are applied to a copy of the book, which replaces the in-memory
/// book only once it is on disk. A failed write leaves the store unchanged.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    book: RecordBook,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let book = load_record_book(&path)?;
        info!(path = %path.display(), students = book.len(), "opened record store");
        Ok(Self { path, book })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `mutate` on a staged copy and commit it if `changed` says the
    /// result touched the book.
    fn commit<T>(
        &mut self,
        mutate: impl FnOnce(&mut RecordBook) -> StoreResult<T>,
        changed: impl FnOnce(&T) -> bool,
    ) -> StoreResult<T> {
        let mut staged = self.book.clone();
        let value = mutate(&mut staged)?;
        if changed(&value) {
            save_record_book(&self.path, &staged)?;
            self.book = staged;
        }
        Ok(value)
    }
}

impl RecordStore for JsonFileStore {
    fn list(&self) -> StoreResult<Vec<StudentRecord>> {
        self.book.list()
    }

    fn get(&self, id: u64) -> StoreResult<Option<StudentRecord>> {
        self.book.get(id)
    }

    fn find_by_document(&self, document_number: &str) -> StoreResult<Option<StudentRecord>> {
        self.book.find_by_document(document_number)
    }

    fn find_by_score(&self, band: &Band) -> StoreResult<Vec<StudentRecord>> {
        self.book.find_by_score(band)
    }

    fn create(&mut self, input: NewStudent) -> StoreResult<u64> {
        self.commit(|book| book.create(input), |_| true)
    }

    fn update(&mut self, id: u64, patch: StudentPatch) -> StoreResult<()> {
        self.commit(|book| book.update(id, patch), |_| true)
    }

    fn set_exam_result(&mut self, id: u64, result: ExamResult) -> StoreResult<()> {
        self.commit(|book| book.set_exam_result(id, result), |_| true)
    }

    fn delete(&mut self, id: u64) -> StoreResult<bool> {
        self.commit(|book| book.delete(id), |existed| *existed)
    }
}
