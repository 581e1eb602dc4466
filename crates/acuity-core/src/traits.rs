//! Port traits around the scoring engine.
//!
//! The engine itself does no I/O. Everything that reads or writes outside
//! the process sits behind one of these four traits:
//!
//! - `QuestionSource`: read-only question reference data
//! - `SubmissionSink`: persistence of completed assessments
//! - `DraftStore`: save/load of the one in-progress session
//! - `Interpreter`: classification of a total score into an acuity band
//!
//! The `Assessor` wires them together around `scoring`.

use acuity_contracts::{
    error::AcuityResult,
    question::Question,
    score::Interpretation,
    session::AssessmentSession,
    submission::AssessmentSubmission,
};

/// Supplies the full question reference set.
///
/// Implementations must return every question, fully loaded and in display
/// order. The engine does not handle partial or streaming sets.
pub trait QuestionSource: Send + Sync {
    fn load_questions(&self) -> AcuityResult<Vec<Question>>;
}

/// Accepts completed assessments as an opaque write.
pub trait SubmissionSink: Send + Sync {
    /// Persist `submission`.
    ///
    /// A failed write leaves the session unsubmitted so the caller can retry.
    fn submit(&self, submission: &AssessmentSubmission) -> AcuityResult<()>;
}

/// Holds at most one in-progress session so a clinician can resume it.
pub trait DraftStore: Send + Sync {
    /// Replace any stored draft with `session`.
    fn save(&self, session: &AssessmentSession) -> AcuityResult<()>;

    /// Return the stored draft, if any.
    fn load(&self) -> AcuityResult<Option<AssessmentSession>>;

    /// Discard the stored draft. Clearing an empty store is not an error.
    fn clear(&self) -> AcuityResult<()>;
}

/// Maps a total acuity score to its interpretation band.
pub trait Interpreter: Send + Sync {
    fn interpret(&self, total_score: u32) -> AcuityResult<Interpretation>;
}
