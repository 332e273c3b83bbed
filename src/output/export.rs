use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::roster::RosterEntry;

const NOT_AVAILABLE: &str = "N/A";

/// One CSV row of the benefits report
#[derive(Debug, Serialize)]
struct BenefitRow {
    #[serde(rename = "Document")]
    document: String,
    #[serde(rename = "Full Name")]
    full_name: String,
    #[serde(rename = "Score")]
    score: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Exemption")]
    exemption: String,
    #[serde(rename = "Grade")]
    grade: String,
    #[serde(rename = "Scholarship (%)")]
    scholarship: u8,
}

impl From<&RosterEntry> for BenefitRow {
    fn from(entry: &RosterEntry) -> Self {
        let classification = entry.outcome.as_ref().and_then(|o| o.classification());
        let or_na = |value: Option<String>| value.unwrap_or_else(|| NOT_AVAILABLE.to_string());

        BenefitRow {
            document: entry.student.document_number.clone(),
            full_name: entry.student.full_name(),
            score: or_na(entry.score().map(|s| s.to_string())),
            category: or_na(classification.map(|c| c.category.to_string())),
            exemption: or_na(classification.map(|c| c.exemption.to_string())),
            grade: or_na(classification.map(|c| c.grade.to_string())),
            scholarship: classification.map_or(0, |c| c.scholarship_percent),
        }
    }
}

/// Default export file name: `benefits_report_<YYYY-MM-DD>.csv`
pub fn default_export_path(date: NaiveDate) -> PathBuf {
    PathBuf::from(format!("benefits_report_{}.csv", date.format("%Y-%m-%d")))
}

/// Write the benefits report as CSV with a header row. Every field is quoted.
pub fn write_benefits_csv<W: Write>(writer: W, entries: &[RosterEntry]) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(writer);

    if entries.is_empty() {
        // serde only emits headers alongside the first record
        csv_writer
            .write_record([
                "Document",
                "Full Name",
                "Score",
                "Category",
                "Exemption",
                "Grade",
                "Scholarship (%)",
            ])
            .context("Failed to write CSV header")?;
    }

    for entry in entries {
        csv_writer
            .serialize(BenefitRow::from(entry))
            .with_context(|| format!("Failed to write CSV row for {}", entry.student.document_number))?;
    }

    csv_writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Write the benefits report to a file
pub fn export_benefits_csv(path: &Path, entries: &[RosterEntry]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create CSV file at {}", path.display()))?;
    write_benefits_csv(file, entries)
        .with_context(|| format!("Failed to export benefits report to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benefits::{PolicyConfig, Score};
    use crate::records::{ExamResult, Student, StudentRecord};
    use crate::roster::assess_records;
    use chrono::Utc;

    fn entries() -> Vec<RosterEntry> {
        let student = |doc: &str| Student {
            id: 1,
            document_type: "CC".to_string(),
            document_number: doc.to_string(),
            first_name: "Juan".to_string(),
            second_name: None,
            first_last_name: "Díaz".to_string(),
            second_last_name: Some("Mora".to_string()),
            email: None,
            phone: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assess_records(
            vec![
                StudentRecord {
                    student: student("100"),
                    exam_result: Some(ExamResult::new("EK100", Score::new(225), "3")),
                },
                StudentRecord {
                    student: student("101"),
                    exam_result: Some(ExamResult::new("EK101", Score::new(150), "2")),
                },
                StudentRecord {
                    student: student("102"),
                    exam_result: None,
                },
            ],
            &PolicyConfig::default(),
        )
    }

    fn render(entries: &[RosterEntry]) -> String {
        let mut buf = Vec::new();
        write_benefits_csv(&mut buf, entries).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_csv_header_and_rows() {
        let csv = render(&entries());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            r#""Document","Full Name","Score","Category","Exemption","Grade","Scholarship (%)""#
        );
        assert!(lines[1].starts_with(r#""100","Juan Díaz Mora","225","Level 2 — Excellent","Exemption from"#));
        assert!(lines[1].ends_with(r#""4.7","50""#));
        assert_eq!(
            lines[2],
            r#""101","Juan Díaz Mora","150","Approved","None","0","0""#
        );
        assert_eq!(
            lines[3],
            r#""102","Juan Díaz Mora","N/A","N/A","N/A","N/A","0""#
        );
    }

    #[test]
    fn test_csv_empty_report_has_header() {
        let csv = render(&[]);
        assert_eq!(csv.lines().count(), 1);
        assert!(csv.starts_with(r#""Document""#));
    }

    #[test]
    fn test_csv_round_trips_through_reader() {
        let csv = render(&entries());
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][6], "50");
        assert!(rows[0][4].contains("Degree Seminar IV"));
    }

    #[test]
    fn test_default_export_path() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        assert_eq!(
            default_export_path(date),
            PathBuf::from("benefits_report_2026-10-17.csv")
        );
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.csv");
        export_benefits_csv(&path, &entries()).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 4);
    }
}
