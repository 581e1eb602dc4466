//! # acuity-core
//!
//! The scoring engine for patient acuity assessments and the orchestration
//! around it.
//!
//! This crate provides:
//! - `scoring`: pure functions for question applicability, answer recording,
//!   totals, category roll-ups and completion
//! - the four port traits (`QuestionSource`, `SubmissionSink`, `DraftStore`,
//!   `Interpreter`)
//! - the `Assessor` that wires the ports around the engine
//!
//! ## Usage
//!
//! ```rust,ignore
//! use acuity_core::{scoring, Assessor};
//!
//! let applicable = scoring::applicable_questions(&all, &patient.context());
//! let session = scoring::record_answer(&session, &applicable, "q1", "alert")?;
//! let total = scoring::total_score(&session);
//! ```

pub mod assessor;
pub mod scoring;
pub mod traits;

pub use assessor::{AssessmentResults, Assessor};
