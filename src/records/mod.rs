pub mod filter;
pub mod store;
pub mod types;
pub mod validation;

pub use filter::{in_band, with_exam_result, with_scholarship};
pub use store::{
    load_record_book, save_record_book, JsonFileStore, RecordBook, RecordStore, StoreError,
    StoreResult,
};
pub use types::{
    Competency, CompetencyResult, ExamResult, NewStudent, Student, StudentPatch, StudentRecord,
};
pub use validation::{validate_exam_result, validate_new_student, validate_patch};
