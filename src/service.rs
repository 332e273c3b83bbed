use serde::Serialize;
use tracing::{debug, info};

use crate::benefits::{classify_with, narrate, Band, BenefitOutcome, PolicyConfig};
use crate::records::{ExamResult, RecordStore, Student, StoreResult, StudentRecord};
use crate::roster::{assess_records, RosterEntry};

/// A single student's result view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentResult {
    pub student: Student,
    pub exam_result: ExamResult,
    pub outcome: BenefitOutcome,
    pub narrative: String,
}

/// Benefit lookups over an injected record store.
pub struct BenefitService<S> {
    store: S,
    policy: PolicyConfig,
}

impl<S: RecordStore> BenefitService<S> {
    pub fn new(store: S, policy: PolicyConfig) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Classify and narrate a bare score.
    pub fn assess(&self, score: i64) -> (BenefitOutcome, String) {
        let outcome = classify_with(score, &self.policy);
        let narrative = narrate(&outcome);
        (outcome, narrative)
    }

    /// Result view for a student id. `None` if the student or its exam result is missing.
    pub fn student_result(&self, id: u64) -> StoreResult<Option<StudentResult>> {
        let record = self.store.get(id)?;
        Ok(record.and_then(|r| self.to_result(r)))
    }

    /// Result view for a document number. `None` if the student or its exam result is missing.
    pub fn student_result_by_document(
        &self,
        document_number: &str,
    ) -> StoreResult<Option<StudentResult>> {
        let record = self.store.find_by_document(document_number)?;
        Ok(record.and_then(|r| self.to_result(r)))
    }

    /// Attach or replace the exam result of the student holding `document_number`,
    /// then return the refreshed result view. `None` if no such student exists.
    pub fn record_exam_result(
        &mut self,
        document_number: &str,
        result: ExamResult,
    ) -> StoreResult<Option<StudentResult>> {
        let Some(record) = self.store.find_by_document(document_number)? else {
            return Ok(None);
        };
        let id = record.student.id;
        let replaced = record.exam_result.is_some();
        self.store.set_exam_result(id, result)?;
        info!(id, replaced, "recorded exam result");
        self.student_result(id)
    }

    /// One entry per stored student, in store order.
    pub fn benefits_report(&self) -> StoreResult<Vec<RosterEntry>> {
        let records = self.store.list()?;
        info!(students = records.len(), "building benefits report");
        Ok(assess_records(records, &self.policy))
    }

    /// Report restricted to students whose score falls in `band`.
    pub fn benefits_in_band(&self, band: &Band) -> StoreResult<Vec<RosterEntry>> {
        let records = self.store.find_by_score(band)?;
        debug!(band = %band, students = records.len(), "filtered report by score band");
        Ok(assess_records(records, &self.policy))
    }

    fn to_result(&self, record: StudentRecord) -> Option<StudentResult> {
        let Some(exam_result) = record.exam_result else {
            debug!(id = record.student.id, "student has no exam result");
            return None;
        };
        let (outcome, narrative) = self.assess(exam_result.global_score.value());
        Some(StudentResult {
            student: record.student,
            exam_result,
            outcome,
            narrative,
        })
    }
}
