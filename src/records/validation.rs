use super::types::{ExamResult, NewStudent, StudentPatch};
use crate::benefits::{MAX_SCORE, MIN_SCORE};

const CEFR_LEVELS: [&str; 7] = ["A0", "A1", "A2", "B1", "B2", "C1", "C2"];

/// Validate a new student before it reaches the store.
/// Returns all validation errors at once (not just the first).
pub fn validate_new_student(input: &NewStudent) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    require("document_type", &input.document_type, &mut errors);
    require("document_number", &input.document_number, &mut errors);
    require("first_name", &input.first_name, &mut errors);
    require("first_last_name", &input.first_last_name, &mut errors);

    if let Some(ref email) = input.email {
        check_email(email, &mut errors);
    }

    if let Some(ref result) = input.exam_result {
        errors.extend(exam_result_errors(result));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a partial update. Fields that are present must not be blank.
pub fn validate_patch(patch: &StudentPatch) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (field, value) in [
        ("document_type", &patch.document_type),
        ("document_number", &patch.document_number),
        ("first_name", &patch.first_name),
        ("first_last_name", &patch.first_last_name),
    ] {
        if let Some(v) = value {
            require(field, v, &mut errors);
        }
    }

    if let Some(ref email) = patch.email {
        check_email(email, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate an exam result on its own.
pub fn validate_exam_result(result: &ExamResult) -> Result<(), Vec<String>> {
    let errors = exam_result_errors(result);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn exam_result_errors(result: &ExamResult) -> Vec<String> {
    let mut errors = Vec::new();

    require("exam_result.registration_number", &result.registration_number, &mut errors);
    require("exam_result.global_level", &result.global_level, &mut errors);

    if !result.global_score.in_nominal_range() {
        errors.push(format!(
            "exam_result.global_score: {} is outside {}-{}",
            result.global_score, MIN_SCORE, MAX_SCORE
        ));
    }

    for (i, c) in result.competencies.iter().enumerate() {
        if let Some(score) = c.score {
            if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
                errors.push(format!(
                    "exam_result.competencies[{}] ({}): score {} is outside {}-{}",
                    i, c.competency, score, MIN_SCORE, MAX_SCORE
                ));
            }
        }
        if result.competencies[..i].iter().any(|prev| prev.competency == c.competency) {
            errors.push(format!(
                "exam_result.competencies[{}] ({}): reported more than once",
                i, c.competency
            ));
        }
    }

    if let Some(ref cefr) = result.english_cefr_level {
        if !CEFR_LEVELS.contains(&cefr.as_str()) {
            errors.push(format!(
                "exam_result.english_cefr_level: '{}' is not one of {}",
                cefr,
                CEFR_LEVELS.join(", ")
            ));
        }
    }

    errors
}

fn require(field: &str, value: &str, errors: &mut Vec<String>) {
    if value.trim().is_empty() {
        errors.push(format!("{}: must not be empty", field));
    }
}

fn check_email(email: &str, errors: &mut Vec<String>) {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.trim().is_empty() && !domain.trim().is_empty() && !domain.contains('@')
        }
        None => false,
    };
    if !valid {
        errors.push(format!("email: invalid address '{}'", email));
    }
}
