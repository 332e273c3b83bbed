use super::types::StudentRecord;
use crate::benefits::{classify_with, Band, PolicyConfig};

/// Keep only students that have an exam result on file
pub fn with_exam_result(records: Vec<StudentRecord>) -> Vec<StudentRecord> {
    records
        .into_iter()
        .filter(|r| r.exam_result.is_some())
        .collect()
}

/// Keep students whose global score falls in `band`
pub fn in_band(records: Vec<StudentRecord>, band: &Band) -> Vec<StudentRecord> {
    records
        .into_iter()
        .filter(|r| r.global_score().is_some_and(|s| band.matches(s.value())))
        .collect()
}

/// Keep students whose score earns any scholarship under `policy`
pub fn with_scholarship(records: Vec<StudentRecord>, policy: &PolicyConfig) -> Vec<StudentRecord> {
    records
        .into_iter()
        .filter(|r| {
            r.global_score()
                .is_some_and(|s| classify_with(s.value(), policy).scholarship_percent() > 0)
        })
        .collect()
}
