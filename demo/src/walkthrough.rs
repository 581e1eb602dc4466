//! Scripted two-patient assessment.
//!
//! Walks one pediatric patient through draft resume, a rejected selection,
//! a blocked submission and an age correction, then submits two patients to
//! the ledger and prints the history, unit averages and chain integrity.

use chrono::{Local, Utc};

use acuity_bands::BandTable;
use acuity_contracts::{
    error::{AcuityError, AcuityResult},
    patient::PatientDemographics,
};
use acuity_core::{traits::DraftStore, Assessor};
use acuity_ledger::{HistoryFilter, InMemoryDraftStore, InMemoryLedger};
use acuity_reference::StaticQuestionSource;

use crate::print_results;

fn patient(patient_id: &str, name: &str, age: u32, unit: &str) -> PatientDemographics {
    PatientDemographics {
        patient_id: patient_id.to_string(),
        name: name.to_string(),
        age: Some(age),
        unit_id: Some(unit.to_string()),
        ..Default::default()
    }
}

pub fn run() -> AcuityResult<()> {
    let ledger = InMemoryLedger::new();
    let drafts = InMemoryDraftStore::new();
    let assessor = Assessor::new(
        &StaticQuestionSource::standard(),
        Box::new(BandTable::standard()?),
        Box::new(ledger.clone()),
        Box::new(drafts.clone()),
    )?;

    // ── Patient 1: pediatric, interrupted ─────────────────────────────────────

    println!("=== Patient 1: Sam Rivera, age 10, unit peds ===");
    let sam = patient("MRN-1001", "Sam Rivera", 10, "peds");
    let session = assessor.start(sam.clone(), Utc::now())?;
    let applicable: Vec<String> = assessor.applicable(&session).into_iter().map(|q| q.id).collect();
    println!("  Applicable questions: {}", applicable.join(", "));

    let session = assessor.answer(&session, "neurological-1", "lethargic")?;
    let session = assessor.answer(&session, "pediatric-pain", "moderate-distress")?;

    match assessor.answer(&session, "respiratory-1", "gasping") {
        Err(e @ AcuityError::InvalidSelection { .. }) => println!("  Rejected as expected: {}", e),
        other => println!("  Unexpected result for bad selection: {:?}", other.map(|s| s.id)),
    }

    match assessor.submit(&session, Local::now(), None) {
        Err(e @ AcuityError::IncompleteAssessment { .. }) => println!("  Submit blocked: {}", e),
        other => println!("  Unexpected submit result: {:?}", other.map(|(s, _)| s.id)),
    }

    // Same patient id picks the draft back up.
    let resumed = assessor.start(sam.clone(), Utc::now())?;
    println!(
        "  Resumed draft {} with {} answer(s)",
        resumed.id,
        resumed.answers.len()
    );

    // The age was wrong: Sam is 15, so the pediatric pain answer stops applying.
    let corrected = PatientDemographics {
        age: Some(15),
        ..sam
    };
    let session = assessor.update_patient(&resumed, corrected)?;
    println!(
        "  Age corrected to 15; {} answer(s) still apply",
        session.answers.len()
    );

    let session = assessor.answer(&session, "respiratory-1", "mild-tachy")?;
    let session = assessor.answer(&session, "cardiovascular-1", "moderate-tachy-hr")?;
    let session = assessor.answer(&session, "adult-pain", "moderate-pain")?;
    print_results(&assessor.results(&session)?);

    let (closed, submission) = assessor.submit(&session, Local::now(), Some("RN Okafor".to_string()))?;
    println!(
        "  Submitted {} during the {:?} shift",
        submission.id, submission.shift
    );

    match assessor.answer(&closed, "adult-pain", "no-pain") {
        Err(e @ AcuityError::SessionClosed { .. }) => println!("  Submitted session is read-only: {}", e),
        other => println!("  Unexpected result after submit: {:?}", other.map(|s| s.id)),
    }
    println!();

    // ── Patient 2: adult, straight through ────────────────────────────────────

    println!("=== Patient 2: Lee Chen, age 67, unit icu ===");
    let session = assessor.start(patient("MRN-2002", "Lee Chen", 67, "icu"), Utc::now())?;
    let session = assessor.answer(&session, "neurological-1", "stuporous")?;
    let session = assessor.answer(&session, "respiratory-1", "severe-tachy")?;
    let session = assessor.answer(&session, "cardiovascular-1", "severe-tachy-hr")?;
    let session = assessor.answer(&session, "adult-pain", "severe-pain")?;
    print_results(&assessor.results(&session)?);
    assessor.submit(&session, Local::now(), Some("RN Okafor".to_string()))?;

    // ── Ledger ────────────────────────────────────────────────────────────────

    println!("=== Ledger ===");
    for stored in ledger.history(&HistoryFilter::default()) {
        println!(
            "  {}  {:<12} score {:>2}  {}",
            stored.assessed_at.format("%Y-%m-%d %H:%M"),
            stored.patient.name,
            stored.total_score,
            stored.interpretation.level
        );
    }
    for unit in ledger.unit_metrics() {
        println!(
            "  Unit {:<6} morning avg {:>5.1}  evening avg {:>5.1}  ({} assessment(s))",
            unit.unit_id, unit.morning_avg, unit.evening_avg, unit.total_assessments
        );
    }
    println!(
        "  Chain integrity: {} ({} entries, head {})",
        if ledger.verify_integrity() { "VERIFIED" } else { "FAILED" },
        ledger.len(),
        ledger.terminal_hash()
    );
    println!(
        "  Draft store empty after submit: {}",
        matches!(drafts.load(), Ok(None))
    );
    println!();

    Ok(())
}
