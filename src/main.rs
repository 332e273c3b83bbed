use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};

use exam_benefits::benefits::{Band, Score};
use exam_benefits::records::{
    CompetencyResult, ExamResult, JsonFileStore, NewStudent, RecordStore, StoreError, StudentPatch,
};
use exam_benefits::roster::{rank_entries, BenefitStats};
use exam_benefits::{config, logging, output, BenefitService};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_NOT_FOUND: i32 = 1;
const EXIT_STORE: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a raw global score and explain the benefit
    Classify {
        /// Global score (integer)
        #[arg(allow_hyphen_values = true)]
        score: String,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a student's result and benefit by document number
    Show {
        document: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List students ranked by score with their benefit tier
    Report {
        /// Only include scores in this band ("<80", "211-240", ">=180", ...)
        #[arg(short, long, allow_hyphen_values = true)]
        range: Option<String>,
        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// Summarize exemptions and scholarships across all students
    Stats,
    /// Export the benefits report as CSV
    Export {
        /// Output file (defaults to benefits_report_<date>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Add a student, optionally with an exam result
    Add(AddArgs),
    /// Update a student's identity or contact fields
    Update(UpdateArgs),
    /// Attach or replace the exam result of an existing student
    #[command(name = "result")]
    SetResult(ResultArgs),
    /// Remove a student and its exam result
    Remove { document: String },
}

#[derive(Args, Debug)]
struct AddArgs {
    #[arg(long, default_value = "CC")]
    document_type: String,
    #[arg(long)]
    document: String,
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    second_name: Option<String>,
    #[arg(long)]
    first_last_name: String,
    #[arg(long)]
    second_last_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    /// Global score; requires --registration
    #[arg(long, requires = "registration", allow_hyphen_values = true)]
    score: Option<String>,
    /// Exam registration number
    #[arg(long, requires = "score")]
    registration: Option<String>,
    /// Global performance level reported with the score
    #[arg(long, default_value = "N/A")]
    level: String,
    #[command(flatten)]
    details: ExamDetailArgs,
}

#[derive(Args, Debug)]
struct ResultArgs {
    /// Document number of the student
    document: String,
    /// Exam registration number
    #[arg(long)]
    registration: String,
    /// Global score
    #[arg(long, allow_hyphen_values = true)]
    score: String,
    /// Global performance level reported with the score
    #[arg(long, default_value = "N/A")]
    level: String,
    #[command(flatten)]
    details: ExamDetailArgs,
}

/// Optional per-module detail of an exam result
#[derive(Args, Debug)]
struct ExamDetailArgs {
    /// Competency result, repeatable (e.g. --competency english=190:B1)
    #[arg(long = "competency", value_name = "NAME=SCORE[:LEVEL]")]
    competencies: Vec<CompetencyResult>,
    /// English level on the CEFR scale (A0-C2)
    #[arg(long)]
    cefr: Option<String>,
    /// Exam date (YYYY-MM-DD)
    #[arg(long)]
    exam_date: Option<NaiveDate>,
}

impl ExamDetailArgs {
    fn is_empty(&self) -> bool {
        self.competencies.is_empty() && self.cefr.is_none() && self.exam_date.is_none()
    }

    fn into_result(self, registration: String, score: Score, level: String) -> ExamResult {
        ExamResult {
            competencies: self.competencies,
            english_cefr_level: self.cefr,
            exam_date: self.exam_date,
            ..ExamResult::new(registration, score, level)
        }
    }
}

#[derive(Args, Debug)]
struct UpdateArgs {
    /// Current document number of the student
    document: String,
    #[arg(long)]
    document_type: Option<String>,
    #[arg(long)]
    new_document: Option<String>,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    second_name: Option<String>,
    #[arg(long)]
    first_last_name: Option<String>,
    #[arg(long)]
    second_last_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
}

#[derive(Parser, Debug)]
#[command(name = "exam-benefits")]
#[command(about = "Saber Pro benefit and scholarship classification", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file (defaults to ~/.config/exam-benefits/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the record file (overrides store_path from config)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn store_exit_code(err: &StoreError) -> i32 {
    match err {
        StoreError::NotFound(_) => EXIT_NOT_FOUND,
        StoreError::DuplicateDocument(_)
        | StoreError::DuplicateRegistration(_)
        | StoreError::Invalid(_) => EXIT_CONFIG,
        StoreError::UnsupportedVersion(_) | StoreError::Io { .. } | StoreError::Format { .. } => {
            EXIT_STORE
        }
    }
}

fn fail(message: impl std::fmt::Display, code: i32) -> ! {
    eprintln!("{}", message);
    std::process::exit(code);
}

fn fail_store(err: StoreError) -> ! {
    let code = store_exit_code(&err);
    fail(format!("Record store error: {}", err), code)
}

fn parse_score(raw: &str) -> Score {
    Score::from_str(raw).unwrap_or_else(|e| fail(format!("Invalid score: {}", e), EXIT_CONFIG))
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => fail(format!("Config error: {:#}", e), EXIT_CONFIG),
    };

    if let Err(errors) = config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }
    debug!(policy = ?config.policy, "effective policy");

    let store_override = cli.store;
    let open_service = || {
        let store_path = match config::resolve_store_path(store_override.clone(), &config) {
            Ok(p) => p,
            Err(e) => fail(format!("Config error: {:#}", e), EXIT_CONFIG),
        };
        let store = JsonFileStore::open(&store_path).unwrap_or_else(|e| fail_store(e));
        BenefitService::new(store, config.policy.clone())
    };
    let use_colors = output::should_use_colors();

    match cli.command {
        // Scoring a bare number needs no records
        Commands::Classify { score, json } => {
            let score = parse_score(&score).value();
            let outcome = exam_benefits::classify_with(score, &config.policy);
            let narrative = exam_benefits::narrate(&outcome);
            if json {
                let body = serde_json::json!({
                    "score": score,
                    "outcome": outcome,
                    "narrative": narrative,
                });
                println!("{}", body);
            } else {
                println!("{}", output::format_outcome(score, &outcome, &narrative, use_colors));
            }
        }
        Commands::Show { document, json } => {
            let service = open_service();
            let result = service
                .student_result_by_document(&document)
                .unwrap_or_else(|e| fail_store(e));
            let Some(result) = result else {
                fail(
                    format!("No exam result on file for document {}", document),
                    EXIT_NOT_FOUND,
                );
            };
            if json {
                match serde_json::to_string_pretty(&result) {
                    Ok(body) => println!("{}", body),
                    Err(e) => fail(format!("Failed to serialize result: {}", e), EXIT_STORE),
                }
            } else {
                println!("{}", output::format_student_detail(&result, use_colors));
            }
        }
        Commands::Report { range, tsv } => {
            let service = open_service();
            let mut entries = match range {
                Some(raw) => {
                    let band = Band::parse(&raw)
                        .unwrap_or_else(|e| fail(format!("Invalid range '{}': {}", raw, e), EXIT_CONFIG));
                    service.benefits_in_band(&band)
                }
                None => service.benefits_report(),
            }
            .unwrap_or_else(|e| fail_store(e));

            rank_entries(&mut entries);
            if tsv {
                println!("{}", output::format_tsv(&entries));
            } else {
                println!("{}", output::format_roster_table(&entries, use_colors));
            }
        }
        Commands::Stats => {
            let service = open_service();
            let entries = service.benefits_report().unwrap_or_else(|e| fail_store(e));
            println!("{}", output::format_stats(&BenefitStats::from_entries(&entries)));
        }
        Commands::Export { output: path } => {
            let service = open_service();
            let mut entries = service.benefits_report().unwrap_or_else(|e| fail_store(e));
            rank_entries(&mut entries);
            let path = path.unwrap_or_else(|| {
                output::default_export_path(chrono::Local::now().date_naive())
            });
            if let Err(e) = output::export_benefits_csv(&path, &entries) {
                fail(format!("{:#}", e), EXIT_STORE);
            }
            info!(rows = entries.len(), path = %path.display(), "exported benefits report");
            println!("Exported {} students to {}", entries.len(), path.display());
        }
        Commands::Add(args) => {
            let mut service = open_service();
            let exam_result = match (args.score, args.registration) {
                (Some(score), Some(registration)) => {
                    Some(args.details.into_result(registration, parse_score(&score), args.level))
                }
                _ if !args.details.is_empty() => fail(
                    "--competency, --cefr and --exam-date need --score and --registration",
                    EXIT_CONFIG,
                ),
                _ => None,
            };
            let input = NewStudent {
                document_type: args.document_type,
                document_number: args.document,
                first_name: args.first_name,
                second_name: args.second_name,
                first_last_name: args.first_last_name,
                second_last_name: args.second_last_name,
                email: args.email,
                phone: args.phone,
                exam_result,
            };
            let document = input.document_number.clone();
            let id = service
                .store_mut()
                .create(input)
                .unwrap_or_else(|e| fail_store(e));
            println!("Added student {} (id {})", document, id);
        }
        Commands::Update(args) => {
            let mut service = open_service();
            let id = find_id(&service, &args.document);
            let patch = StudentPatch {
                document_type: args.document_type,
                document_number: args.new_document,
                first_name: args.first_name,
                second_name: args.second_name,
                first_last_name: args.first_last_name,
                second_last_name: args.second_last_name,
                email: args.email,
                phone: args.phone,
            };
            if patch.is_empty() {
                fail("Nothing to update. Pass at least one field flag.", EXIT_CONFIG);
            }
            service
                .store_mut()
                .update(id, patch)
                .unwrap_or_else(|e| fail_store(e));
            println!("Updated student {}", args.document);
        }
        Commands::SetResult(args) => {
            let mut service = open_service();
            let result = args
                .details
                .into_result(args.registration, parse_score(&args.score), args.level);
            let recorded = service
                .record_exam_result(&args.document, result)
                .unwrap_or_else(|e| fail_store(e));
            let Some(recorded) = recorded else {
                fail(format!("No student with document {}", args.document), EXIT_NOT_FOUND);
            };
            println!("{}", output::format_student_detail(&recorded, use_colors));
        }
        Commands::Remove { document } => {
            let mut service = open_service();
            let id = find_id(&service, &document);
            service
                .store_mut()
                .delete(id)
                .unwrap_or_else(|e| fail_store(e));
            println!("Removed student {}", document);
        }
    }

    std::process::exit(EXIT_SUCCESS);
}

fn find_id<S: RecordStore>(service: &BenefitService<S>, document: &str) -> u64 {
    match service.store().find_by_document(document) {
        Ok(Some(record)) => record.student.id,
        Ok(None) => fail(format!("No student with document {}", document), EXIT_NOT_FOUND),
        Err(e) => fail_store(e),
    }
}
