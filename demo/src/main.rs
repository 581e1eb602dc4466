//! Acuity assessment demo CLI
//!
//! Usage:
//!   cargo run -p acuity-demo -- questions --age 10
//!   cargo run -p acuity-demo -- bands
//!   cargo run -p acuity-demo -- score sheet.json --export report.json
//!   cargo run -p acuity-demo -- walkthrough

mod walkthrough;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use acuity_bands::BandTable;
use acuity_contracts::{
    error::{AcuityError, AcuityResult},
    patient::{PatientContext, PatientDemographics, PatientField},
    session::SessionPhase,
};
use acuity_core::{scoring, traits::QuestionSource, AssessmentResults, Assessor};
use acuity_ledger::{InMemoryDraftStore, InMemoryLedger};
use acuity_reference::{JsonFileQuestionSource, StaticQuestionSource, TableQuestionSource};

// ── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "acuity-demo",
    about = "Patient acuity assessment demo",
    long_about = "Lists checklist questions, shows the interpretation bands, scores\n\
                  answer sheets, and runs a scripted assessment walkthrough."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Where question reference data comes from. Built-in set when both are unset.
#[derive(clap::Args)]
struct QuestionArgs {
    /// JSON file holding an array of questions.
    #[arg(long, conflicts_with = "tables")]
    questions: Option<PathBuf>,
    /// JSON export of the Category/Question/answer/Population tables.
    #[arg(long)]
    tables: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// List the questions that apply to a patient of the given age.
    Questions {
        /// Patient age in years. Omit to list only all-ages questions.
        #[arg(long)]
        age: Option<u32>,
        #[command(flatten)]
        source: QuestionArgs,
    },
    /// Show the interpretation bands.
    Bands {
        /// Band table TOML. Defaults to the standard table.
        #[arg(long)]
        bands: Option<PathBuf>,
    },
    /// Score an answer sheet and submit it if complete.
    Score {
        /// JSON answer sheet: { "patient": {...}, "answers": { "<question id>": "<value>" } }
        sheet: PathBuf,
        #[command(flatten)]
        source: QuestionArgs,
        #[arg(long)]
        bands: Option<PathBuf>,
        /// Write the results report as JSON to this path.
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Run a scripted two-patient assessment against the in-memory ledger.
    Walkthrough,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnswerSheet {
    patient: PatientDemographics,
    #[serde(default)]
    answers: BTreeMap<String, String>,
    #[serde(default)]
    assessed_by: Option<String>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Questions { age, source } => run_questions(age, &source),
        Command::Bands { bands } => run_bands(bands.as_deref()),
        Command::Score {
            sheet,
            source,
            bands,
            export,
        } => run_score(&sheet, &source, bands.as_deref(), export.as_deref()),
        Command::Walkthrough => walkthrough::run(),
    };

    if let Err(e) = result {
        eprintln!("acuity-demo error: {}", e);
        std::process::exit(1);
    }
}

// ── Wiring ────────────────────────────────────────────────────────────────────

fn question_source(args: &QuestionArgs) -> AcuityResult<Box<dyn QuestionSource>> {
    Ok(match (&args.questions, &args.tables) {
        (Some(path), _) => Box::new(JsonFileQuestionSource::new(path)),
        (None, Some(path)) => Box::new(TableQuestionSource::from_file(path)?),
        (None, None) => Box::new(StaticQuestionSource::standard()),
    })
}

fn band_table(path: Option<&Path>) -> AcuityResult<BandTable> {
    match path {
        Some(path) => BandTable::from_file(path),
        None => BandTable::standard(),
    }
}

// ── Subcommands ───────────────────────────────────────────────────────────────

fn run_questions(age: Option<u32>, args: &QuestionArgs) -> AcuityResult<()> {
    let questions = question_source(args)?.load_questions()?;
    let context = PatientContext { age };
    let applicable = scoring::applicable_questions(&questions, &context);

    match age {
        Some(age) => println!("{} of {} questions apply at age {}:", applicable.len(), questions.len(), age),
        None => println!("{} of {} questions apply with age unknown:", applicable.len(), questions.len()),
    }
    println!();
    for question in &applicable {
        println!("  [{}] {} ({})", question.id, question.title, question.category);
        for option in &question.options {
            println!("      {:<24} {:>2}  {}", option.value, option.score, option.label);
        }
    }
    Ok(())
}

fn run_bands(path: Option<&Path>) -> AcuityResult<()> {
    let table = band_table(path)?;
    println!("  {:<10} {:<8} Description", "Level", "Scores");
    for (idx, band) in table.bands().iter().enumerate() {
        let range = match table.range_of(idx) {
            Some((lo, Some(hi))) => format!("{lo}-{hi}"),
            Some((lo, None)) => format!("{lo}+"),
            None => "?".to_string(),
        };
        println!("  {:<10} {:<8} {}", band.level, range, band.description);
    }
    Ok(())
}

fn run_score(
    sheet_path: &Path,
    args: &QuestionArgs,
    bands: Option<&Path>,
    export: Option<&Path>,
) -> AcuityResult<()> {
    let content = std::fs::read_to_string(sheet_path).map_err(|e| AcuityError::StorageError {
        reason: format!("failed to read answer sheet '{}': {}", sheet_path.display(), e),
    })?;
    let sheet: AnswerSheet = serde_json::from_str(&content).map_err(|e| AcuityError::StorageError {
        reason: format!("failed to parse answer sheet '{}': {}", sheet_path.display(), e),
    })?;

    let source = question_source(args)?;
    let ledger = InMemoryLedger::new();
    let assessor = Assessor::new(
        source.as_ref(),
        Box::new(band_table(bands)?),
        Box::new(ledger.clone()),
        Box::new(InMemoryDraftStore::new()),
    )?;

    let mut session = assessor.start(sheet.patient, Utc::now())?;
    for (question_id, value) in &sheet.answers {
        session = assessor.answer(&session, question_id, value)?;
    }

    let results = assessor.results(&session)?;
    print_results(&results);

    if let Some(path) = export {
        let report = assessor.report(&session, Utc::now())?;
        let json = serde_json::to_vec_pretty(&report).map_err(|e| AcuityError::StorageError {
            reason: format!("failed to encode report: {}", e),
        })?;
        std::fs::write(path, json).map_err(|e| AcuityError::StorageError {
            reason: format!("failed to write report '{}': {}", path.display(), e),
        })?;
        info!(path = %path.display(), "report exported");
        println!("  Report written to {}", path.display());
    }

    if results.phase != SessionPhase::Complete {
        let applicable = assessor.applicable(&session);
        let missing = scoring::missing_items(&session, &applicable, &PatientField::REQUIRED);
        println!("  Not submitted; still missing: {}", missing.join(", "));
        return Ok(());
    }

    let (_, submission) = assessor.submit(&session, Local::now(), sheet.assessed_by)?;
    println!(
        "  Submitted {} ({:?} shift); ledger {}",
        submission.id,
        submission.shift,
        if ledger.verify_integrity() { "VERIFIED" } else { "FAILED" }
    );
    Ok(())
}

/// Print the score summary shared by `score` and `walkthrough`.
fn print_results(results: &AssessmentResults) {
    println!();
    println!(
        "  Total score:     {} ({})",
        results.total_score, results.interpretation.level
    );
    println!("  Interpretation:  {}", results.interpretation.description);
    println!(
        "  Progress:        {}/{} answered ({}%)",
        results.progress.answered, results.progress.total, results.progress.percentage
    );
    println!("  Phase:           {:?}", results.phase);
    if !results.category_breakdown.is_empty() {
        println!("  Categories:");
        for category in &results.category_breakdown {
            println!(
                "    {:<18} {:>2}/{:<2} {:>3}%",
                category.category, category.score, category.max_possible, category.percentage
            );
        }
    }
    println!();
}
