use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::benefits::{BenefitOutcome, Tier};
use crate::roster::{BenefitStats, RosterEntry};
use crate::service::StudentResult;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Short label for an outcome: the category, "Unclassified", or "N/A" without a result
pub fn outcome_label(outcome: Option<&BenefitOutcome>) -> &'static str {
    match outcome {
        Some(BenefitOutcome::Classified(c)) => c.category,
        Some(BenefitOutcome::Unclassified) => "Unclassified",
        None => "N/A",
    }
}

/// Paint text with the color of a tier (traffic light, green for scholarships)
fn paint(text: &str, tier: Option<Tier>) -> String {
    match tier {
        Some(Tier::Level3) | Some(Tier::Level2) => text.green().bold().to_string(),
        Some(Tier::Level1) => text.cyan().to_string(),
        Some(Tier::Approved) => text.to_string(),
        Some(Tier::NotApproved) => text.red().to_string(),
        None => text.yellow().to_string(),
    }
}

/// Render an outcome and its narrative for a bare score (the `classify` command)
pub fn format_outcome(score: i64, outcome: &BenefitOutcome, narrative: &str, use_colors: bool) -> String {
    let label = outcome_label(Some(outcome));
    let label = if use_colors {
        paint(label, outcome.tier())
    } else {
        label.to_string()
    };
    format!("Score {}: {}\n\n{}", score, label, narrative.trim_end())
}

/// Format a student's result with detailed multi-line output
pub fn format_student_detail(result: &StudentResult, use_colors: bool) -> String {
    let name = result.student.full_name();
    let category = outcome_label(Some(&result.outcome));
    let exam = &result.exam_result;

    let (name, category) = if use_colors {
        (name.bold().to_string(), paint(category, result.outcome.tier()))
    } else {
        (name, category.to_string())
    };

    let mut out = format!(
        "{}\n  Document: {} {}\n  Registration: {}\n  Global score: {} (level {})\n  Category: {}",
        name,
        result.student.document_type,
        result.student.document_number,
        exam.registration_number,
        exam.global_score,
        exam.global_level,
        category,
    );

    if let Some(ref cefr) = exam.english_cefr_level {
        out.push_str(&format!("\n  English (CEFR): {}", cefr));
    }
    if let Some(date) = exam.exam_date {
        out.push_str(&format!("\n  Exam date: {}", date.format("%Y-%m-%d")));
    }
    for c in &exam.competencies {
        let score = c.score.map_or_else(|| "-".to_string(), |s| s.to_string());
        out.push_str(&format!(
            "\n    {}: {}{}",
            c.competency,
            score,
            c.level.as_deref().map(|l| format!(" ({})", l)).unwrap_or_default()
        ));
    }

    out.push_str("\n\n");
    out.push_str(result.narrative.trim_end());
    out
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn format_scholarship(outcome: Option<&BenefitOutcome>) -> String {
    match outcome.and_then(|o| o.classification()) {
        Some(c) if c.scholarship_percent > 0 => format!("{}%", c.scholarship_percent),
        Some(_) => "-".to_string(),
        None => "N/A".to_string(),
    }
}

/// Format a ranked roster as a table with columns: Index, Score, Category, Scholarship, Name
/// No headers. Index column is right-aligned with a trailing dot.
pub fn format_roster_table(entries: &[RosterEntry], use_colors: bool) -> String {
    if entries.is_empty() {
        return "No students found.".to_string();
    }

    let term_width = get_terminal_width();

    let index_width = 4; // "999."
    let score_width = 5;
    let category_width = Tier::ALL
        .iter()
        .map(|t| t.category().chars().count())
        .max()
        .unwrap_or(0)
        .max("Unclassified".len());
    let scholarship_width = 4; // "100%"
    let separator = "  ";

    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let index_str = format!("{:>width$}", format!("{}.", idx + 1), width = index_width);
            let score_str = entry
                .score()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "N/A".to_string());
            let score_padded = format!("{:>width$}", score_str, width = score_width);
            let category = outcome_label(entry.outcome.as_ref());
            let category_padded = format!("{:<width$}", category, width = category_width);
            let scholarship = format!(
                "{:>width$}",
                format_scholarship(entry.outcome.as_ref()),
                width = scholarship_width
            );

            let fixed_width = index_width
                + 1
                + score_width
                + category_width
                + scholarship_width
                + separator.len() * 3;
            let full_name = entry.student.full_name();
            let name = match term_width {
                Some(width) if width > fixed_width + 10 => truncate_name(&full_name, width - fixed_width),
                Some(_) => truncate_name(&full_name, 20),
                None => full_name,
            };

            if use_colors {
                let tier = entry.outcome.as_ref().and_then(|o| o.tier());
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    score_padded.bold(),
                    separator,
                    paint(&category_padded, tier),
                    separator,
                    scholarship,
                    separator,
                    name
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str,
                    score_padded,
                    separator,
                    category_padded,
                    separator,
                    scholarship,
                    separator,
                    name
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a roster as tab-separated values for scripting
/// Columns: document, name, score, category, grade, scholarship (no headers, no colors)
pub fn format_tsv(entries: &[RosterEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }

    entries
        .iter()
        .map(|entry| {
            let classification = entry.outcome.as_ref().and_then(|o| o.classification());
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                entry.student.document_number,
                entry.student.full_name(),
                entry.score().map(|s| s.to_string()).unwrap_or_else(|| "N/A".to_string()),
                outcome_label(entry.outcome.as_ref()),
                classification.map(|c| c.grade.to_string()).unwrap_or_else(|| "N/A".to_string()),
                classification.map(|c| c.scholarship_percent).unwrap_or(0),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format roster statistics as a summary block
pub fn format_stats(stats: &BenefitStats) -> String {
    let score = |s: Option<i64>| s.map(|v| v.to_string()).unwrap_or_else(|| "N/A".to_string());
    [
        format!("Students:              {}", stats.total),
        format!("With exam result:      {}", stats.with_result),
        format!("With exemption:        {}", stats.with_exemption),
        format!("Scholarship 100%:      {}", stats.full_scholarship),
        format!("Scholarship 50%:       {}", stats.half_scholarship),
        format!("No scholarship:        {}", stats.no_scholarship),
        format!("Unclassified:          {}", stats.unclassified),
        format!("Average score:         {}", score(stats.average_score)),
        format!("Highest score:         {}", score(stats.max_score)),
        format!("Lowest score:          {}", score(stats.min_score)),
    ]
    .join("\n")
}
