//! The assessor: drives one assessment session through its lifecycle.
//!
//! The assessor owns the ports and calls the pure scoring engine in between:
//!
//!   start → answer / update_patient (draft saved each time) → submit
//!
//! It never mutates a session in place. Each call returns the next session
//! value, and a failed call leaves the previous one valid. Drafts are
//! best-effort: a draft store failure is logged and the session carries on,
//! because losing the resume point must not block charting.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use acuity_contracts::{
    error::{AcuityError, AcuityResult},
    patient::{PatientDemographics, PatientField},
    question::Question,
    score::{CategoryScore, Interpretation, Progress},
    session::{AssessmentSession, SessionPhase},
    submission::{AssessmentReport, AssessmentSubmission, Shift},
};

use crate::scoring;
use crate::traits::{DraftStore, Interpreter, QuestionSource, SubmissionSink};

/// Snapshot of everything the results screen shows for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResults {
    pub total_score: u32,
    pub interpretation: Interpretation,
    pub category_breakdown: Vec<CategoryScore>,
    pub progress: Progress,
    pub phase: SessionPhase,
}

/// Orchestrates sessions against one loaded question set.
///
/// Construct one assessor per question set. Question data is loaded once in
/// `new()` and is immutable afterwards.
pub struct Assessor {
    questions: Vec<Question>,
    interpreter: Box<dyn Interpreter>,
    sink: Box<dyn SubmissionSink>,
    drafts: Box<dyn DraftStore>,
    required: Vec<PatientField>,
}

impl Assessor {
    /// Load the full question set from `source` and wire up the ports.
    pub fn new(
        source: &dyn QuestionSource,
        interpreter: Box<dyn Interpreter>,
        sink: Box<dyn SubmissionSink>,
        drafts: Box<dyn DraftStore>,
    ) -> AcuityResult<Self> {
        let questions = source.load_questions()?;
        info!(question_count = questions.len(), "question set loaded");
        Ok(Self {
            questions,
            interpreter,
            sink,
            drafts,
            required: PatientField::REQUIRED.to_vec(),
        })
    }

    /// Override which patient fields must be filled in before submission.
    pub fn with_required_fields(mut self, required: Vec<PatientField>) -> Self {
        self.required = required;
        self
    }

    /// The full reference set, in load order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// The questions that apply to the session's patient.
    pub fn applicable(&self, session: &AssessmentSession) -> Vec<Question> {
        scoring::applicable_questions(&self.questions, &session.patient.context())
    }

    /// Start an assessment for `patient`.
    ///
    /// If the draft store holds an unsubmitted session for the same patient
    /// id, it is resumed with the new demographics applied. Any other draft
    /// is replaced.
    pub fn start(
        &self,
        patient: PatientDemographics,
        now: DateTime<Utc>,
    ) -> AcuityResult<AssessmentSession> {
        patient.validate()?;

        let draft = match self.drafts.load() {
            Ok(draft) => draft,
            Err(e) => {
                warn!(error = %e, "could not load draft; starting fresh");
                None
            }
        };

        let session = match draft {
            Some(draft)
                if !draft.is_submitted()
                    && patient.has(PatientField::PatientId)
                    && draft.patient.patient_id == patient.patient_id =>
            {
                info!(
                    session_id = %draft.id,
                    answers = draft.answers.len(),
                    "resuming draft assessment"
                );
                scoring::update_patient(&draft, patient, &self.questions)?
            }
            _ => {
                let session = AssessmentSession::new(patient, now);
                info!(session_id = %session.id, "starting new assessment");
                session
            }
        };

        self.save_draft(&session);
        Ok(session)
    }

    /// Record an answer and save the updated draft.
    pub fn answer(
        &self,
        session: &AssessmentSession,
        question_id: &str,
        selected_value: &str,
    ) -> AcuityResult<AssessmentSession> {
        let applicable = self.applicable(session);
        let next = scoring::record_answer(session, &applicable, question_id, selected_value)
            .inspect_err(|e| {
                warn!(
                    session_id = %session.id,
                    question_id,
                    error = %e,
                    "answer rejected"
                );
            })?;

        debug!(
            session_id = %next.id,
            question_id,
            selected_value,
            total_score = scoring::total_score(&next),
            "answer recorded"
        );
        self.save_draft(&next);
        Ok(next)
    }

    /// Replace the patient's demographics, dropping answers that stop applying.
    pub fn update_patient(
        &self,
        session: &AssessmentSession,
        patient: PatientDemographics,
    ) -> AcuityResult<AssessmentSession> {
        let next = scoring::update_patient(session, patient, &self.questions)?;
        let dropped = session.answers.len() - next.answers.len();
        if dropped > 0 {
            info!(
                session_id = %next.id,
                dropped,
                "answers no longer applicable after patient update"
            );
        }
        self.save_draft(&next);
        Ok(next)
    }

    /// Compute totals, breakdown, interpretation and progress for `session`.
    pub fn results(&self, session: &AssessmentSession) -> AcuityResult<AssessmentResults> {
        let applicable = self.applicable(session);
        let total_score = scoring::total_score(session);
        Ok(AssessmentResults {
            total_score,
            interpretation: self.interpreter.interpret(total_score)?,
            category_breakdown: scoring::category_breakdown(session, &applicable),
            progress: scoring::progress(session, &applicable),
            phase: scoring::phase(session, &applicable, &self.required),
        })
    }

    /// Build the exportable report for `session`.
    pub fn report(
        &self,
        session: &AssessmentSession,
        generated_at: DateTime<Utc>,
    ) -> AcuityResult<AssessmentReport> {
        let applicable = self.applicable(session);
        let interpretation = self.interpreter.interpret(scoring::total_score(session))?;
        Ok(scoring::build_report(session, &applicable, interpretation, generated_at))
    }

    /// Persist a completed session.
    ///
    /// `assessed_at` is taken in the clinician's timezone so the shift is
    /// judged by local wall-clock time. On success the draft is cleared and
    /// the returned session is marked persisted.
    ///
    /// # Errors
    ///
    /// - `SessionClosed` if the session was already submitted
    /// - `IncompleteAssessment` if questions or required fields are missing
    /// - any error the interpreter or submission sink returns
    pub fn submit<Tz: TimeZone>(
        &self,
        session: &AssessmentSession,
        assessed_at: DateTime<Tz>,
        assessed_by: Option<String>,
    ) -> AcuityResult<(AssessmentSession, AssessmentSubmission)> {
        if session.is_submitted() {
            return Err(AcuityError::SessionClosed {
                session_id: session.id.to_string(),
            });
        }

        let applicable = self.applicable(session);
        let missing = scoring::missing_items(session, &applicable, &self.required);
        if !missing.is_empty() {
            warn!(
                session_id = %session.id,
                missing = %missing.join(", "),
                "submission blocked: assessment incomplete"
            );
            return Err(AcuityError::IncompleteAssessment { missing });
        }

        let shift = Shift::at(&assessed_at);
        let assessed_at = assessed_at.with_timezone(&Utc);
        let interpretation = self.interpreter.interpret(scoring::total_score(session))?;
        let mut submission = scoring::build_submission(
            session,
            &applicable,
            interpretation,
            assessed_at,
            shift,
            &self.required,
        )?;
        submission.assessed_by = assessed_by;

        self.sink.submit(&submission)?;

        info!(
            session_id = %submission.id,
            total_score = submission.total_score,
            level = %submission.interpretation.level,
            shift = ?submission.shift,
            "assessment submitted"
        );

        if let Err(e) = self.drafts.clear() {
            warn!(session_id = %submission.id, error = %e, "could not clear draft after submit");
        }

        let mut persisted = session.clone();
        persisted.submitted_at = Some(assessed_at);
        Ok((persisted, submission))
    }

    /// Abandon the current session and start an empty one.
    pub fn reset(&self, now: DateTime<Utc>) -> AcuityResult<AssessmentSession> {
        self.drafts.clear()?;
        debug!("draft cleared; assessment reset");
        Ok(AssessmentSession::new(PatientDemographics::default(), now))
    }

    fn save_draft(&self, session: &AssessmentSession) {
        if let Err(e) = self.drafts.save(session) {
            warn!(session_id = %session.id, error = %e, "could not save draft");
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::{FixedOffset, TimeZone, Utc};

    use acuity_contracts::{
        error::{AcuityError, AcuityResult},
        patient::{PatientDemographics, PatientField},
        question::{AgeGroup, Question, QuestionOption},
        score::{AcuityLevel, Interpretation},
        session::{AssessmentSession, SessionPhase},
        submission::{AssessmentSubmission, Shift},
    };

    use crate::traits::{DraftStore, Interpreter, QuestionSource, SubmissionSink};

    use super::Assessor;

    // ── Mock ports ───────────────────────────────────────────────────────────

    struct StaticSource(Vec<Question>);

    impl QuestionSource for StaticSource {
        fn load_questions(&self) -> AcuityResult<Vec<Question>> {
            Ok(self.0.clone())
        }
    }

    /// Low up to 3, Critical above. Enough to tell results apart.
    struct TwoBand;

    impl Interpreter for TwoBand {
        fn interpret(&self, total_score: u32) -> AcuityResult<Interpretation> {
            let level = if total_score <= 3 {
                AcuityLevel::Low
            } else {
                AcuityLevel::Critical
            };
            Ok(Interpretation {
                level,
                description: level.as_str().to_string(),
                total_score,
            })
        }
    }

    #[derive(Clone)]
    struct MockSink {
        submitted: Arc<Mutex<Vec<AssessmentSubmission>>>,
        fail: bool,
    }

    impl MockSink {
        fn new(fail: bool) -> Self {
            Self {
                submitted: Arc::new(Mutex::new(vec![])),
                fail,
            }
        }
    }

    impl SubmissionSink for MockSink {
        fn submit(&self, submission: &AssessmentSubmission) -> AcuityResult<()> {
            if self.fail {
                return Err(AcuityError::StorageError {
                    reason: "sink offline".to_string(),
                });
            }
            self.submitted.lock().unwrap().push(submission.clone());
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct MockDrafts {
        slot: Arc<Mutex<Option<AssessmentSession>>>,
    }

    impl DraftStore for MockDrafts {
        fn save(&self, session: &AssessmentSession) -> AcuityResult<()> {
            *self.slot.lock().unwrap() = Some(session.clone());
            Ok(())
        }

        fn load(&self) -> AcuityResult<Option<AssessmentSession>> {
            Ok(self.slot.lock().unwrap().clone())
        }

        fn clear(&self) -> AcuityResult<()> {
            *self.slot.lock().unwrap() = None;
            Ok(())
        }
    }

    // ── Fixtures ─────────────────────────────────────────────────────────────

    fn question(id: &str, category: &str, age_group: AgeGroup) -> Question {
        Question {
            id: id.to_string(),
            title: id.to_string(),
            description: None,
            category: category.to_string(),
            age_group,
            options: vec![
                QuestionOption {
                    value: "none".to_string(),
                    label: "None".to_string(),
                    score: 0,
                },
                QuestionOption {
                    value: "severe".to_string(),
                    label: "Severe".to_string(),
                    score: 3,
                },
            ],
            is_required: true,
        }
    }

    fn questions() -> Vec<Question> {
        vec![
            question("consciousness", "Neurological", AgeGroup::All),
            question("pediatric-pain", "Pain Assessment", AgeGroup::Pediatric),
            question("adult-pain", "Pain Assessment", AgeGroup::Adult),
        ]
    }

    fn patient(id: &str, age: u32) -> PatientDemographics {
        PatientDemographics {
            patient_id: id.to_string(),
            name: "Jordan Lee".to_string(),
            age: Some(age),
            unit_id: Some("icu".to_string()),
            ..Default::default()
        }
    }

    fn assessor(sink: MockSink, drafts: MockDrafts) -> Assessor {
        Assessor::new(
            &StaticSource(questions()),
            Box::new(TwoBand),
            Box::new(sink),
            Box::new(drafts),
        )
        .unwrap()
    }

    // ── Lifecycle ────────────────────────────────────────────────────────────

    #[test]
    fn full_lifecycle_submits_and_clears_draft() {
        let sink = MockSink::new(false);
        let drafts = MockDrafts::default();
        let assessor = assessor(sink.clone(), drafts.clone());

        let s = assessor.start(patient("MRN-1", 40), Utc::now()).unwrap();
        let s = assessor.answer(&s, "consciousness", "severe").unwrap();
        assert_eq!(assessor.results(&s).unwrap().phase, SessionPhase::InProgress);

        let s = assessor.answer(&s, "adult-pain", "severe").unwrap();
        let results = assessor.results(&s).unwrap();
        assert_eq!(results.total_score, 6);
        assert_eq!(results.interpretation.level, AcuityLevel::Critical);
        assert_eq!(results.phase, SessionPhase::Complete);
        assert!(drafts.load().unwrap().is_some(), "draft must be saved while in progress");

        // 08:15 at UTC+2 is a morning-shift assessment.
        let local = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 3, 1, 8, 15, 0)
            .unwrap();
        let (persisted, submission) = assessor
            .submit(&s, local, Some("nurse-7".to_string()))
            .unwrap();

        assert_eq!(submission.shift, Shift::Morning);
        assert_eq!(submission.assessed_at, Utc.with_ymd_and_hms(2026, 3, 1, 6, 15, 0).unwrap());
        assert_eq!(submission.assessed_by.as_deref(), Some("nurse-7"));
        assert_eq!(sink.submitted.lock().unwrap().len(), 1);
        assert!(drafts.load().unwrap().is_none(), "draft must be cleared after submit");
        assert_eq!(assessor.results(&persisted).unwrap().phase, SessionPhase::Persisted);

        // A persisted session is closed.
        assert!(matches!(
            assessor.answer(&persisted, "consciousness", "none"),
            Err(AcuityError::SessionClosed { .. })
        ));
        assert!(matches!(
            assessor.submit(&persisted, Utc::now(), None),
            Err(AcuityError::SessionClosed { .. })
        ));
    }

    #[test]
    fn submit_incomplete_session_is_rejected() {
        let sink = MockSink::new(false);
        let assessor = assessor(sink.clone(), MockDrafts::default());

        let s = assessor.start(patient("MRN-2", 8), Utc::now()).unwrap();
        let s = assessor.answer(&s, "consciousness", "none").unwrap();

        match assessor.submit(&s, Utc::now(), None) {
            Err(AcuityError::IncompleteAssessment { missing }) => {
                assert_eq!(missing, vec!["question:pediatric-pain".to_string()]);
            }
            other => panic!("expected IncompleteAssessment, got {:?}", other),
        }
        assert!(sink.submitted.lock().unwrap().is_empty());
    }

    #[test]
    fn sink_failure_leaves_session_unsubmitted_and_draft_intact() {
        let drafts = MockDrafts::default();
        let assessor = assessor(MockSink::new(true), drafts.clone());

        let s = assessor.start(patient("MRN-3", 40), Utc::now()).unwrap();
        let s = assessor.answer(&s, "consciousness", "none").unwrap();
        let s = assessor.answer(&s, "adult-pain", "none").unwrap();

        assert!(matches!(
            assessor.submit(&s, Utc::now(), None),
            Err(AcuityError::StorageError { .. })
        ));
        assert!(!s.is_submitted());
        assert!(drafts.load().unwrap().is_some());
    }

    // ── Drafts ───────────────────────────────────────────────────────────────

    #[test]
    fn start_resumes_draft_for_same_patient() {
        let drafts = MockDrafts::default();
        let assessor = assessor(MockSink::new(false), drafts.clone());

        let first = assessor.start(patient("MRN-4", 40), Utc::now()).unwrap();
        let first = assessor.answer(&first, "consciousness", "severe").unwrap();

        let resumed = assessor.start(patient("MRN-4", 40), Utc::now()).unwrap();
        assert_eq!(resumed.id, first.id);
        assert_eq!(resumed.answers.len(), 1);
    }

    #[test]
    fn start_replaces_draft_for_other_patient() {
        let drafts = MockDrafts::default();
        let assessor = assessor(MockSink::new(false), drafts.clone());

        let first = assessor.start(patient("MRN-5", 40), Utc::now()).unwrap();
        let first = assessor.answer(&first, "consciousness", "severe").unwrap();

        let other = assessor.start(patient("MRN-6", 40), Utc::now()).unwrap();
        assert_ne!(other.id, first.id);
        assert!(other.answers.is_empty());
        assert_eq!(drafts.load().unwrap().unwrap().id, other.id);
    }

    #[test]
    fn resumed_draft_scores_come_from_current_options() {
        let sink = MockSink::new(false);
        let drafts = MockDrafts::default();
        let assessor = assessor(sink.clone(), drafts.clone());

        let s = assessor.start(patient("MRN-11", 40), Utc::now()).unwrap();
        let s = assessor.answer(&s, "consciousness", "severe").unwrap();
        assessor.answer(&s, "adult-pain", "none").unwrap();

        // The stored draft was edited outside the assessor.
        drafts
            .slot
            .lock()
            .unwrap()
            .as_mut()
            .unwrap()
            .answers
            .get_mut("consciousness")
            .unwrap()
            .score = 99;

        let resumed = assessor.start(patient("MRN-11", 40), Utc::now()).unwrap();
        assert_eq!(resumed.answer("consciousness").unwrap().score, 3);
        assert_eq!(assessor.results(&resumed).unwrap().total_score, 3);

        let (_, submission) = assessor.submit(&resumed, Utc::now(), None).unwrap();
        let recorded: u32 = submission.answers.iter().map(|a| a.selected_score).sum();
        assert_eq!(submission.total_score, 3);
        assert_eq!(submission.total_score, recorded);
    }

    #[test]
    fn blank_patient_id_never_resumes_a_draft() {
        let drafts = MockDrafts::default();
        let assessor = assessor(MockSink::new(false), drafts.clone());

        let first = assessor.start(patient("   ", 40), Utc::now()).unwrap();
        let first = assessor.answer(&first, "consciousness", "severe").unwrap();

        let second = assessor.start(patient("   ", 40), Utc::now()).unwrap();
        assert_ne!(second.id, first.id);
        assert!(second.answers.is_empty());
    }

    #[test]
    fn reset_clears_draft_and_returns_empty_session() {
        let drafts = MockDrafts::default();
        let assessor = assessor(MockSink::new(false), drafts.clone());

        let s = assessor.start(patient("MRN-7", 40), Utc::now()).unwrap();
        assessor.answer(&s, "consciousness", "severe").unwrap();

        let fresh = assessor.reset(Utc::now()).unwrap();
        assert!(fresh.answers.is_empty());
        assert!(fresh.patient.patient_id.is_empty());
        assert!(drafts.load().unwrap().is_none());
    }

    // ── Required fields ──────────────────────────────────────────────────────

    #[test]
    fn custom_required_fields_govern_results_and_submit() {
        let sink = MockSink::new(false);
        let assessor = assessor(sink.clone(), MockDrafts::default())
            .with_required_fields(vec![PatientField::PatientId]);

        let id_only = PatientDemographics {
            patient_id: "MRN-12".to_string(),
            ..Default::default()
        };
        let s = assessor.start(id_only, Utc::now()).unwrap();
        let s = assessor.answer(&s, "consciousness", "none").unwrap();

        assert_eq!(assessor.results(&s).unwrap().phase, SessionPhase::Complete);
        let (persisted, submission) = assessor.submit(&s, Utc::now(), None).unwrap();
        assert_eq!(submission.patient.patient_id, "MRN-12");
        assert_eq!(assessor.results(&persisted).unwrap().phase, SessionPhase::Persisted);
        assert_eq!(sink.submitted.lock().unwrap().len(), 1);
    }

    #[test]
    fn default_required_fields_block_submit_without_name_and_age() {
        let assessor = assessor(MockSink::new(false), MockDrafts::default());

        let id_only = PatientDemographics {
            patient_id: "MRN-13".to_string(),
            ..Default::default()
        };
        let s = assessor.start(id_only, Utc::now()).unwrap();
        let s = assessor.answer(&s, "consciousness", "none").unwrap();

        assert_eq!(assessor.results(&s).unwrap().phase, SessionPhase::InProgress);
        match assessor.submit(&s, Utc::now(), None) {
            Err(AcuityError::IncompleteAssessment { missing }) => {
                assert_eq!(missing, vec!["field:name".to_string(), "field:age".to_string()]);
            }
            other => panic!("expected IncompleteAssessment, got {:?}", other.map(|(_, s)| s.id)),
        }
    }

    // ── Patient updates ──────────────────────────────────────────────────────

    #[test]
    fn update_patient_drops_answers_across_brackets() {
        let assessor = assessor(MockSink::new(false), MockDrafts::default());

        let s = assessor.start(patient("MRN-8", 9), Utc::now()).unwrap();
        let s = assessor.answer(&s, "pediatric-pain", "severe").unwrap();
        let s = assessor.answer(&s, "consciousness", "severe").unwrap();

        let s = assessor.update_patient(&s, patient("MRN-8", 30)).unwrap();
        let results = assessor.results(&s).unwrap();
        assert_eq!(results.total_score, 3);
        assert_eq!(results.progress.answered, 1);
        assert_eq!(results.progress.total, 2);
    }

    #[test]
    fn answer_outside_applicable_set_is_rejected() {
        let assessor = assessor(MockSink::new(false), MockDrafts::default());
        let s = assessor.start(patient("MRN-9", 30), Utc::now()).unwrap();

        assert!(matches!(
            assessor.answer(&s, "pediatric-pain", "severe"),
            Err(AcuityError::UnknownQuestion { .. })
        ));
    }

    #[test]
    fn report_contains_breakdown() {
        let assessor = assessor(MockSink::new(false), MockDrafts::default());
        let s = assessor.start(patient("MRN-10", 30), Utc::now()).unwrap();
        let s = assessor.answer(&s, "adult-pain", "severe").unwrap();

        let report = assessor.report(&s, Utc::now()).unwrap();
        assert_eq!(report.total_score, 3);
        assert_eq!(report.interpretation.level, AcuityLevel::Low);
        assert_eq!(report.category_breakdown.len(), 2);
        assert_eq!(report.detailed_answers[0].answer, "Severe");
    }
}
