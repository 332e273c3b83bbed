//! File-backed store driven through the benefit service, the way the CLI uses it.

use exam_benefits::benefits::{Band, PolicyConfig, Score, Tier};
use chrono::NaiveDate;
use exam_benefits::output::{format_student_detail, write_benefits_csv};
use exam_benefits::records::{
    Competency, CompetencyResult, ExamResult, JsonFileStore, NewStudent, RecordStore, StoreError,
    StudentPatch,
};
use exam_benefits::roster::{rank_entries, BenefitStats};
use exam_benefits::BenefitService;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn student(doc: &str, first: &str, last: &str, score: Option<i64>) -> NewStudent {
    NewStudent {
        document_type: "CC".to_string(),
        document_number: doc.to_string(),
        first_name: first.to_string(),
        first_last_name: last.to_string(),
        exam_result: score.map(|s| ExamResult::new(format!("EK2024{}", doc), Score::new(s), "3")),
        ..Default::default()
    }
}

fn seeded_store(dir: &TempDir) -> JsonFileStore {
    let mut store = JsonFileStore::open(dir.path().join("records.json")).unwrap();
    for input in [
        student("1001", "Ana", "Suárez", Some(75)),
        student("1002", "Luis", "Mejía", Some(150)),
        student("1003", "Sara", "Ortiz", Some(195)),
        student("1004", "Iván", "Rojas", Some(225)),
        student("1005", "Eva", "Castro", Some(250)),
        student("1006", "Tomás", "Niño", Some(241)),
        student("1007", "Paula", "León", None),
    ] {
        store.create(input).unwrap();
    }
    store
}

#[test]
fn per_student_lookup_survives_reopen() {
    let dir = TempDir::new().unwrap();
    drop(seeded_store(&dir));

    let store = JsonFileStore::open(dir.path().join("records.json")).unwrap();
    let service = BenefitService::new(store, PolicyConfig::default());

    let result = service.student_result_by_document("1004").unwrap().unwrap();
    assert_eq!(result.student.full_name(), "Iván Rojas");
    assert_eq!(result.outcome.tier(), Some(Tier::Level2));
    assert!(result.narrative.contains("50%"));

    assert!(service.student_result_by_document("1007").unwrap().is_none());
}

#[test]
fn report_stats_and_export() {
    let dir = TempDir::new().unwrap();
    let service = BenefitService::new(seeded_store(&dir), PolicyConfig::default());

    let mut entries = service.benefits_report().unwrap();
    assert_eq!(entries.len(), 7);
    rank_entries(&mut entries);
    let order: Vec<&str> = entries.iter().map(|e| e.student.document_number.as_str()).collect();
    assert_eq!(order, vec!["1005", "1006", "1004", "1003", "1002", "1001", "1007"]);

    let stats = BenefitStats::from_entries(&entries);
    assert_eq!(stats.full_scholarship, 1);
    assert_eq!(stats.half_scholarship, 1);
    assert_eq!(stats.unclassified, 1);
    assert_eq!(stats.with_exemption, 3);

    let mut buf = Vec::new();
    write_benefits_csv(&mut buf, &entries).unwrap();
    let csv = String::from_utf8(buf).unwrap();
    assert_eq!(csv.lines().count(), 8);
    assert!(csv.contains(r#""1006","Tomás Niño","241","N/A","N/A","N/A","0""#));
}

#[test]
fn band_lookup_and_policy_switch() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);

    let reference = BenefitService::new(store, PolicyConfig::default());
    let top = reference.benefits_in_band(&Band::GreaterEqual(241)).unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top.iter().filter(|e| e.outcome.as_ref().is_some_and(|o| o.is_classified())).count(), 1);

    let store = JsonFileStore::open(dir.path().join("records.json")).unwrap();
    let inclusive = BenefitService::new(store, PolicyConfig::inclusive());
    let top = inclusive.benefits_in_band(&Band::GreaterEqual(241)).unwrap();
    assert!(top.iter().all(|e| e.outcome.as_ref().and_then(|o| o.tier()) == Some(Tier::Level3)));
}

#[test]
fn crud_through_service_store() {
    let dir = TempDir::new().unwrap();
    let mut service = BenefitService::new(seeded_store(&dir), PolicyConfig::default());

    let id = service.store().find_by_document("1007").unwrap().unwrap().student.id;
    service
        .store_mut()
        .set_exam_result(id, ExamResult::new("EK20241007", Score::new(212), "3"))
        .unwrap();
    service
        .store_mut()
        .update(id, StudentPatch {
            second_last_name: Some("Vargas".to_string()),
            ..Default::default()
        })
        .unwrap();

    let result = service.student_result(id).unwrap().unwrap();
    assert_eq!(result.student.full_name(), "Paula León Vargas");
    assert_eq!(result.outcome.tier(), Some(Tier::Level2));

    assert!(service.store_mut().delete(id).unwrap());
    assert!(service.student_result(id).unwrap().is_none());

    let reopened = JsonFileStore::open(dir.path().join("records.json")).unwrap();
    assert_eq!(reopened.list().unwrap().len(), 6);
}

#[test]
fn detailed_exam_result_recorded_by_document() {
    let dir = TempDir::new().unwrap();
    let mut service = BenefitService::new(seeded_store(&dir), PolicyConfig::default());

    let mut result = ExamResult::new(" EK20241007 ", Score::new(236), "3");
    result.competencies = ["critical-reading=182:3", "english=205:B2", "software-design=:2"]
        .iter()
        .map(|raw| raw.parse::<CompetencyResult>().unwrap())
        .collect();
    result.english_cefr_level = Some("B2".to_string());
    result.exam_date = NaiveDate::from_ymd_opt(2024, 11, 24);

    let recorded = service.record_exam_result("1007", result).unwrap().unwrap();
    assert_eq!(recorded.outcome.tier(), Some(Tier::Level2));
    assert_eq!(recorded.exam_result.registration_number, "EK20241007");

    let store = JsonFileStore::open(dir.path().join("records.json")).unwrap();
    let service = BenefitService::new(store, PolicyConfig::default());
    let reloaded = service.student_result_by_document("1007").unwrap().unwrap();
    let exam = &reloaded.exam_result;
    assert_eq!(exam.competencies.len(), 3);
    assert_eq!(exam.competency(Competency::English).and_then(|c| c.score), Some(205));
    assert_eq!(exam.english_cefr_level.as_deref(), Some("B2"));

    let detail = format_student_detail(&reloaded, false);
    assert!(detail.contains("English (CEFR): B2"));
    assert!(detail.contains("Exam date: 2024-11-24"));
    assert!(detail.contains("Critical Reading: 182 (3)"));
    assert!(detail.contains("Software Design: - (2)"));
}

#[test]
fn exam_result_for_unknown_or_conflicting_student() {
    let dir = TempDir::new().unwrap();
    let mut service = BenefitService::new(seeded_store(&dir), PolicyConfig::default());

    let orphan = ExamResult::new("EK2024404", Score::new(200), "3");
    assert!(service.record_exam_result("404", orphan).unwrap().is_none());

    // 1001 already holds EK20241001
    let taken = ExamResult::new("EK20241001", Score::new(200), "3");
    let err = service.record_exam_result("1002", taken).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateRegistration(_)));

    let mut bad_cefr = ExamResult::new("EK20249999", Score::new(200), "3");
    bad_cefr.english_cefr_level = Some("Z9".to_string());
    let err = service.record_exam_result("1002", bad_cefr).unwrap_err();
    assert!(matches!(err, StoreError::Invalid(_)));

    let unchanged = service.student_result_by_document("1002").unwrap().unwrap();
    assert_eq!(unchanged.exam_result.global_score, Score::new(150));
}
