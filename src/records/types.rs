use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context};

use crate::benefits::Score;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: u64,
    pub document_type: String,   // "CC", "TI", ...
    pub document_number: String, // unique
    pub first_name: String,
    pub second_name: Option<String>,
    pub first_last_name: String,
    pub second_last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    /// Present name parts joined by single spaces
    pub fn full_name(&self) -> String {
        [
            Some(self.first_name.as_str()),
            self.second_name.as_deref(),
            Some(self.first_last_name.as_str()),
            self.second_last_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Competency modules reported alongside the global score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Competency {
    WrittenCommunication,
    QuantitativeReasoning,
    CriticalReading,
    CitizenshipCompetencies,
    English,
    EngineeringProjects,
    ScientificThinking,
    SoftwareDesign,
}

impl Competency {
    pub const ALL: [Competency; 8] = [
        Competency::WrittenCommunication,
        Competency::QuantitativeReasoning,
        Competency::CriticalReading,
        Competency::CitizenshipCompetencies,
        Competency::English,
        Competency::EngineeringProjects,
        Competency::ScientificThinking,
        Competency::SoftwareDesign,
    ];

    /// Short name used on the command line, e.g. `quantitative-reasoning`.
    pub fn key(self) -> &'static str {
        match self {
            Competency::WrittenCommunication => "written-communication",
            Competency::QuantitativeReasoning => "quantitative-reasoning",
            Competency::CriticalReading => "critical-reading",
            Competency::CitizenshipCompetencies => "citizenship-competencies",
            Competency::English => "english",
            Competency::EngineeringProjects => "engineering-projects",
            Competency::ScientificThinking => "scientific-thinking",
            Competency::SoftwareDesign => "software-design",
        }
    }
}

impl FromStr for Competency {
    type Err = anyhow::Error;

    /// Accepts the kebab-case key, with `_` allowed in place of `-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Competency::ALL
            .into_iter()
            .find(|c| c.key() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Competency::ALL.iter().map(|c| c.key()).collect();
                anyhow!("unknown competency '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

impl fmt::Display for Competency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Competency::WrittenCommunication => "Written Communication",
            Competency::QuantitativeReasoning => "Quantitative Reasoning",
            Competency::CriticalReading => "Critical Reading",
            Competency::CitizenshipCompetencies => "Citizenship Competencies",
            Competency::English => "English",
            Competency::EngineeringProjects => "Engineering Projects",
            Competency::ScientificThinking => "Scientific Thinking",
            Competency::SoftwareDesign => "Software Design",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetencyResult {
    pub competency: Competency,
    pub score: Option<i64>,
    pub level: Option<String>,
}

impl FromStr for CompetencyResult {
    type Err = anyhow::Error;

    /// Parse `name=score`, `name=score:level` or `name=:level`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((name, value)) = s.split_once('=') else {
            bail!("expected <competency>=<score>[:<level>], got '{}'", s);
        };
        let competency: Competency = name.parse()?;
        let (score, level) = match value.split_once(':') {
            Some((score, level)) => (score, Some(level)),
            None => (value, None),
        };

        let score = match score.trim() {
            "" => None,
            raw => Some(
                raw.parse::<i64>()
                    .with_context(|| format!("invalid {} score '{}'", competency.key(), raw))?,
            ),
        };
        let level = level
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string);

        if score.is_none() && level.is_none() {
            bail!("{} needs a score, a level, or both", competency.key());
        }

        Ok(CompetencyResult {
            competency,
            score,
            level,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamResult {
    pub registration_number: String, // unique
    pub global_score: Score,
    pub global_level: String,
    #[serde(default)]
    pub competencies: Vec<CompetencyResult>,
    #[serde(default)]
    pub english_cefr_level: Option<String>, // A0, A1, A2, B1, B2
    #[serde(default)]
    pub exam_date: Option<NaiveDate>,
}

impl ExamResult {
    pub fn new(registration_number: impl Into<String>, global_score: Score, global_level: impl Into<String>) -> Self {
        Self {
            registration_number: registration_number.into(),
            global_score,
            global_level: global_level.into(),
            competencies: Vec::new(),
            english_cefr_level: None,
            exam_date: None,
        }
    }

    pub fn competency(&self, competency: Competency) -> Option<&CompetencyResult> {
        self.competencies.iter().find(|c| c.competency == competency)
    }
}

/// A student with the exam result on file, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub student: Student,
    #[serde(default)]
    pub exam_result: Option<ExamResult>,
}

impl StudentRecord {
    pub fn global_score(&self) -> Option<Score> {
        self.exam_result.as_ref().map(|r| r.global_score)
    }
}

/// Input for creating a student.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewStudent {
    pub document_type: String,
    pub document_number: String,
    pub first_name: String,
    pub second_name: Option<String>,
    pub first_last_name: String,
    pub second_last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub exam_result: Option<ExamResult>,
}

/// Partial update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentPatch {
    pub document_type: Option<String>,
    pub document_number: Option<String>,
    pub first_name: Option<String>,
    pub second_name: Option<String>,
    pub first_last_name: Option<String>,
    pub second_last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl StudentPatch {
    pub fn is_empty(&self) -> bool {
        *self == StudentPatch::default()
    }

    /// Apply the patch, stamping `updated_at`.
    pub fn apply(self, student: &mut Student, now: DateTime<Utc>) {
        if let Some(v) = self.document_type {
            student.document_type = v;
        }
        if let Some(v) = self.document_number {
            student.document_number = v;
        }
        if let Some(v) = self.first_name {
            student.first_name = v;
        }
        if let Some(v) = self.second_name {
            student.second_name = Some(v);
        }
        if let Some(v) = self.first_last_name {
            student.first_last_name = v;
        }
        if let Some(v) = self.second_last_name {
            student.second_last_name = Some(v);
        }
        if let Some(v) = self.email {
            student.email = Some(v);
        }
        if let Some(v) = self.phone {
            student.phone = Some(v);
        }
        student.updated_at = now;
    }
}
