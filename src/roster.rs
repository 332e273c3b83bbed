use serde::Serialize;
use std::cmp::Ordering;

use crate::benefits::{classify_with, BenefitOutcome, Exemption, PolicyConfig};
use crate::records::{ExamResult, Student, StudentRecord};

/// One row of the benefits report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterEntry {
    pub student: Student,
    pub exam_result: Option<ExamResult>,
    /// `None` when the student has no exam result on file
    pub outcome: Option<BenefitOutcome>,
}

impl RosterEntry {
    pub fn score(&self) -> Option<i64> {
        self.exam_result.as_ref().map(|r| r.global_score.value())
    }
}

/// Classify every record independently.
pub fn assess_records(records: Vec<StudentRecord>, policy: &PolicyConfig) -> Vec<RosterEntry> {
    records
        .into_iter()
        .map(|record| {
            let outcome = record
                .exam_result
                .as_ref()
                .map(|r| classify_with(r.global_score.value(), policy));
            RosterEntry {
                student: record.student,
                exam_result: record.exam_result,
                outcome,
            }
        })
        .collect()
}

/// Sort by score descending, ties by document number. Students without a
/// result go last.
pub fn rank_entries(entries: &mut [RosterEntry]) {
    entries.sort_by(|a, b| match (a.score(), b.score()) {
        (Some(x), Some(y)) => y
            .cmp(&x)
            .then_with(|| a.student.document_number.cmp(&b.student.document_number)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.student.document_number.cmp(&b.student.document_number),
    });
}

/// Aggregate counts over a benefits report.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BenefitStats {
    pub total: usize,
    pub with_result: usize,
    pub with_exemption: usize,
    pub full_scholarship: usize,
    pub half_scholarship: usize,
    pub no_scholarship: usize,
    pub unclassified: usize,
    pub average_score: Option<i64>,
    pub max_score: Option<i64>,
    pub min_score: Option<i64>,
}

impl BenefitStats {
    pub fn from_entries(entries: &[RosterEntry]) -> Self {
        let mut stats = BenefitStats {
            total: entries.len(),
            ..Default::default()
        };

        let scores: Vec<i64> = entries.iter().filter_map(RosterEntry::score).collect();
        stats.with_result = scores.len();
        if !scores.is_empty() {
            let sum: i128 = scores.iter().map(|&s| s as i128).sum();
            let avg = sum as f64 / scores.len() as f64;
            stats.average_score = Some(avg.round() as i64);
            stats.max_score = scores.iter().copied().max();
            stats.min_score = scores.iter().copied().min();
        }

        for outcome in entries.iter().filter_map(|e| e.outcome.as_ref()) {
            match outcome.classification() {
                Some(c) => {
                    if c.exemption != Exemption::None {
                        stats.with_exemption += 1;
                    }
                    match c.scholarship_percent {
                        100 => stats.full_scholarship += 1,
                        50 => stats.half_scholarship += 1,
                        _ => stats.no_scholarship += 1,
                    }
                }
                None => stats.unclassified += 1,
            }
        }

        stats
    }
}
