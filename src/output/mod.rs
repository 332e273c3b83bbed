pub mod export;
pub mod formatter;

pub use export::{default_export_path, export_benefits_csv, write_benefits_csv};
pub use formatter::{
    format_outcome, format_roster_table, format_stats, format_student_detail, format_tsv,
    outcome_label, should_use_colors,
};
