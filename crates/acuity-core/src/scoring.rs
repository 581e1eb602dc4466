//! The scoring engine.
//!
//! Pure, synchronous functions over the contract types: question
//! applicability, answer recording, totals, category roll-ups, progress and
//! completion. Nothing here performs I/O or logs, so every function can be
//! called from any execution context and is deterministic in its inputs.
//!
//! Sessions are taken by reference and updated copies are returned. A
//! rejected mutation therefore leaves the caller's session exactly as it was.

use chrono::{DateTime, Utc};

use acuity_contracts::{
    error::{AcuityError, AcuityResult},
    patient::{PatientContext, PatientDemographics, PatientField},
    question::Question,
    score::{CategoryScore, Interpretation, Progress},
    session::{Answer, AssessmentSession, SessionPhase},
    submission::{AnswerRecord, AssessmentReport, AssessmentSubmission, DetailedAnswer, Shift},
};

/// Return the questions that apply to a patient, preserving input order.
///
/// Age-independent questions always apply. Pediatric questions are added
/// for ages below the threshold, adult questions for ages at or above it.
/// With no age, only age-independent questions apply.
pub fn applicable_questions(all: &[Question], context: &PatientContext) -> Vec<Question> {
    let bracket = context.bracket();
    all.iter()
        .filter(|q| q.age_group.applies_to(bracket))
        .cloned()
        .collect()
}

/// Record the clinician's selection for one question.
///
/// The answer's score is taken from the matching option. An existing answer
/// for the same question is overwritten (last write wins).
///
/// # Errors
///
/// - `SessionClosed` if the session was already submitted
/// - `UnknownQuestion` if `question_id` is not in `applicable`
/// - `InvalidSelection` if no option of the question has `selected_value`
pub fn record_answer(
    session: &AssessmentSession,
    applicable: &[Question],
    question_id: &str,
    selected_value: &str,
) -> AcuityResult<AssessmentSession> {
    if session.is_submitted() {
        return Err(AcuityError::SessionClosed {
            session_id: session.id.to_string(),
        });
    }

    let question = applicable
        .iter()
        .find(|q| q.id == question_id)
        .ok_or_else(|| AcuityError::UnknownQuestion {
            question_id: question_id.to_string(),
        })?;

    let option = question
        .option(selected_value)
        .ok_or_else(|| AcuityError::InvalidSelection {
            question_id: question_id.to_string(),
            value: selected_value.to_string(),
        })?;

    let mut next = session.clone();
    next.answers.insert(
        question.id.clone(),
        Answer {
            question_id: question.id.clone(),
            selected_value: option.value.clone(),
            score: option.score,
        },
    );
    Ok(next)
}

/// Replace the session's demographics and drop answers that no longer apply.
///
/// Changing the age can move the patient between brackets; answers to
/// questions outside the new applicable set are removed so they never count
/// towards totals. Every kept answer is re-scored from its question's
/// current option, and answers whose value no longer names an option are
/// dropped, so a session restored from storage cannot carry stale scores.
pub fn update_patient(
    session: &AssessmentSession,
    patient: PatientDemographics,
    all: &[Question],
) -> AcuityResult<AssessmentSession> {
    if session.is_submitted() {
        return Err(AcuityError::SessionClosed {
            session_id: session.id.to_string(),
        });
    }
    patient.validate()?;

    let applicable = applicable_questions(all, &patient.context());
    let mut next = session.clone();
    next.patient = patient;
    next.answers.retain(|question_id, answer| {
        let option = applicable
            .iter()
            .find(|q| &q.id == question_id)
            .and_then(|q| q.option(&answer.selected_value));
        match option {
            Some(option) => {
                answer.score = option.score;
                true
            }
            None => false,
        }
    });
    Ok(next)
}

/// Sum of the scores of every recorded answer.
pub fn total_score(session: &AssessmentSession) -> u32 {
    session.answers.values().map(|a| a.score).sum()
}

/// Per-category sub-totals over the applicable questions.
///
/// Categories appear in the order they are first seen in `applicable`.
/// Unanswered questions contribute 0 to `score` but their highest option
/// still counts towards `max_possible`.
pub fn category_breakdown(
    session: &AssessmentSession,
    applicable: &[Question],
) -> Vec<CategoryScore> {
    let mut breakdown: Vec<CategoryScore> = Vec::new();

    for question in applicable {
        let answered = session.answer(&question.id).map(|a| a.score).unwrap_or(0);

        match breakdown.iter_mut().find(|c| c.category == question.category) {
            Some(entry) => {
                entry.score += answered;
                entry.max_possible += question.max_score();
            }
            None => breakdown.push(CategoryScore {
                category: question.category.clone(),
                score: answered,
                max_possible: question.max_score(),
                percentage: 0,
            }),
        }
    }

    for entry in &mut breakdown {
        entry.percentage = percentage(entry.score as u64, entry.max_possible as u64);
    }
    breakdown
}

/// Highest total the applicable questions can produce.
pub fn max_possible_total(applicable: &[Question]) -> u32 {
    applicable.iter().map(Question::max_score).sum()
}

/// Total score as a rounded percentage of `max_possible_total`.
pub fn overall_percentage(session: &AssessmentSession, applicable: &[Question]) -> u32 {
    percentage(
        total_score(session) as u64,
        max_possible_total(applicable) as u64,
    )
}

/// How many applicable questions have an answer.
pub fn progress(session: &AssessmentSession, applicable: &[Question]) -> Progress {
    let answered = applicable
        .iter()
        .filter(|q| session.answers.contains_key(&q.id))
        .count();
    let total = applicable.len();
    Progress {
        answered,
        total,
        percentage: percentage(answered as u64, total as u64),
    }
}

/// Everything still missing before the session can be submitted.
///
/// Unanswered questions are reported as `question:<id>` in applicable order,
/// followed by absent patient fields as `field:<name>`.
pub fn missing_items(
    session: &AssessmentSession,
    applicable: &[Question],
    required: &[PatientField],
) -> Vec<String> {
    let questions = applicable
        .iter()
        .filter(|q| !session.answers.contains_key(&q.id))
        .map(|q| format!("question:{}", q.id));
    let fields = session
        .patient
        .missing_fields(required)
        .into_iter()
        .map(|f| format!("field:{}", f.as_str()));
    questions.chain(fields).collect()
}

/// True iff every applicable question is answered and every required patient
/// field is present.
pub fn is_complete(
    session: &AssessmentSession,
    applicable: &[Question],
    required: &[PatientField],
) -> bool {
    missing_items(session, applicable, required).is_empty()
}

/// Where the session is in its `in-progress → complete → persisted` lifecycle.
pub fn phase(
    session: &AssessmentSession,
    applicable: &[Question],
    required: &[PatientField],
) -> SessionPhase {
    if session.is_submitted() {
        SessionPhase::Persisted
    } else if is_complete(session, applicable, required) {
        SessionPhase::Complete
    } else {
        SessionPhase::InProgress
    }
}

/// Build the payload a submission sink persists.
///
/// # Errors
///
/// - `IncompleteAssessment` listing what is missing, if the session is not
///   complete for `required`
/// - `InvalidSelection` if a stored answer no longer matches an option of
///   its question
pub fn build_submission(
    session: &AssessmentSession,
    applicable: &[Question],
    interpretation: Interpretation,
    assessed_at: DateTime<Utc>,
    shift: Shift,
    required: &[PatientField],
) -> AcuityResult<AssessmentSubmission> {
    let missing = missing_items(session, applicable, required);
    if !missing.is_empty() {
        return Err(AcuityError::IncompleteAssessment { missing });
    }

    let mut answers = Vec::with_capacity(applicable.len());
    for question in applicable {
        let Some(answer) = session.answer(&question.id) else {
            continue;
        };
        let option = question.option(&answer.selected_value).ok_or_else(|| {
            AcuityError::InvalidSelection {
                question_id: question.id.clone(),
                value: answer.selected_value.clone(),
            }
        })?;
        answers.push(AnswerRecord {
            question_id: question.id.clone(),
            question_title: question.title.clone(),
            category: question.category.clone(),
            selected_value: option.value.clone(),
            selected_label: option.label.clone(),
            selected_score: option.score,
        });
    }

    // Summed from the looked-up options so the total always agrees with
    // the records it is stored next to.
    let total_score = answers.iter().map(|a| a.selected_score).sum();

    Ok(AssessmentSubmission {
        id: session.id.clone(),
        patient: session.patient.clone(),
        answers,
        total_score,
        interpretation,
        category_breakdown: category_breakdown(session, applicable),
        assessed_at,
        shift,
        assessed_by: None,
    })
}

/// Build the exportable result summary. Works on incomplete sessions too.
pub fn build_report(
    session: &AssessmentSession,
    applicable: &[Question],
    interpretation: Interpretation,
    generated_at: DateTime<Utc>,
) -> AssessmentReport {
    let detailed_answers = applicable
        .iter()
        .filter_map(|q| {
            let answer = session.answer(&q.id)?;
            let label = q
                .option(&answer.selected_value)
                .map(|o| o.label.clone())
                .unwrap_or_else(|| answer.selected_value.clone());
            Some(DetailedAnswer {
                question: q.title.clone(),
                category: q.category.clone(),
                answer: label,
                score: answer.score,
            })
        })
        .collect();

    AssessmentReport {
        generated_at,
        patient: session.patient.clone(),
        total_score: total_score(session),
        interpretation,
        overall_percentage: overall_percentage(session, applicable),
        category_breakdown: category_breakdown(session, applicable),
        detailed_answers,
    }
}

/// `round(100 * part / whole)` with halves rounded up; 0 when `whole` is 0.
fn percentage(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((200 * part + whole) / (2 * whole)) as u32
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use acuity_contracts::{
        error::AcuityError,
        patient::{PatientContext, PatientDemographics, PatientField},
        question::{AgeGroup, Question, QuestionOption},
        score::{AcuityLevel, Interpretation},
        session::{AssessmentSession, SessionPhase},
        submission::Shift,
    };

    use super::*;

    // ── Fixtures ─────────────────────────────────────────────────────────────

    fn q(id: &str, category: &str, age_group: AgeGroup, options: &[(&str, u32)]) -> Question {
        Question {
            id: id.to_string(),
            title: format!("Title {id}"),
            description: None,
            category: category.to_string(),
            age_group,
            options: options
                .iter()
                .map(|(value, score)| QuestionOption {
                    value: value.to_string(),
                    label: format!("Label {value}"),
                    score: *score,
                })
                .collect(),
            is_required: true,
        }
    }

    /// The three-question reference scenario.
    fn scenario_questions() -> Vec<Question> {
        vec![
            q("q1", "Neuro", AgeGroup::All, &[("alert", 0), ("unresponsive", 3)]),
            q("q2", "Pain", AgeGroup::Pediatric, &[("comfortable", 0), ("severe", 3)]),
            q("q3", "Pain", AgeGroup::Adult, &[("none", 0), ("severe", 3)]),
        ]
    }

    fn patient(age: Option<u32>) -> PatientDemographics {
        PatientDemographics {
            patient_id: "MRN-001".to_string(),
            name: "Test Patient".to_string(),
            age,
            ..Default::default()
        }
    }

    fn session(age: Option<u32>) -> AssessmentSession {
        AssessmentSession::new(patient(age), Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap())
    }

    fn ids(questions: &[Question]) -> Vec<&str> {
        questions.iter().map(|q| q.id.as_str()).collect()
    }

    fn moderate(total: u32) -> Interpretation {
        Interpretation {
            level: AcuityLevel::Moderate,
            description: "Requires increased monitoring".to_string(),
            total_score: total,
        }
    }

    // ── applicable_questions ─────────────────────────────────────────────────

    #[test]
    fn absent_age_yields_only_all_group() {
        let applicable = applicable_questions(&scenario_questions(), &PatientContext { age: None });
        assert_eq!(ids(&applicable), vec!["q1"]);
    }

    #[test]
    fn pediatric_age_includes_pediatric_and_excludes_adult() {
        for age in [0, 10, 13] {
            let applicable =
                applicable_questions(&scenario_questions(), &PatientContext { age: Some(age) });
            assert_eq!(ids(&applicable), vec!["q1", "q2"], "age {age}");
        }
    }

    #[test]
    fn adult_age_includes_adult_and_excludes_pediatric() {
        for age in [14, 30, 120] {
            let applicable =
                applicable_questions(&scenario_questions(), &PatientContext { age: Some(age) });
            assert_eq!(ids(&applicable), vec!["q1", "q3"], "age {age}");
        }
    }

    #[test]
    fn applicable_preserves_input_order() {
        let all = vec![
            q("b", "X", AgeGroup::Adult, &[("a", 1)]),
            q("a", "X", AgeGroup::All, &[("a", 1)]),
            q("c", "X", AgeGroup::Adult, &[("a", 1)]),
        ];
        let applicable = applicable_questions(&all, &PatientContext { age: Some(50) });
        assert_eq!(ids(&applicable), vec!["b", "a", "c"]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(applicable_questions(&[], &PatientContext { age: Some(5) }).is_empty());
    }

    // ── record_answer ────────────────────────────────────────────────────────

    #[test]
    fn record_answer_copies_option_score() {
        let applicable = applicable_questions(&scenario_questions(), &PatientContext { age: Some(10) });
        let s = record_answer(&session(Some(10)), &applicable, "q1", "unresponsive").unwrap();

        let answer = s.answer("q1").unwrap();
        assert_eq!(answer.selected_value, "unresponsive");
        assert_eq!(answer.score, 3);
    }

    #[test]
    fn record_answer_rejects_invalid_selection_and_leaves_session_unchanged() {
        let applicable = applicable_questions(&scenario_questions(), &PatientContext { age: Some(10) });
        let before = record_answer(&session(Some(10)), &applicable, "q1", "alert").unwrap();

        match record_answer(&before, &applicable, "q1", "sleepy") {
            Err(AcuityError::InvalidSelection { question_id, value }) => {
                assert_eq!(question_id, "q1");
                assert_eq!(value, "sleepy");
            }
            other => panic!("expected InvalidSelection, got {:?}", other),
        }
        assert_eq!(before.answer("q1").unwrap().selected_value, "alert");
    }

    #[test]
    fn record_answer_rejects_question_outside_applicable_set() {
        let applicable = applicable_questions(&scenario_questions(), &PatientContext { age: Some(10) });

        match record_answer(&session(Some(10)), &applicable, "q3", "severe") {
            Err(AcuityError::UnknownQuestion { question_id }) => assert_eq!(question_id, "q3"),
            other => panic!("expected UnknownQuestion, got {:?}", other),
        }
    }

    #[test]
    fn record_answer_rejects_submitted_session() {
        let applicable = applicable_questions(&scenario_questions(), &PatientContext { age: Some(10) });
        let mut s = session(Some(10));
        s.submitted_at = Some(Utc::now());

        assert!(matches!(
            record_answer(&s, &applicable, "q1", "alert"),
            Err(AcuityError::SessionClosed { .. })
        ));
    }

    #[test]
    fn recording_same_answer_twice_does_not_double_count() {
        let applicable = applicable_questions(&scenario_questions(), &PatientContext { age: Some(10) });
        let once = record_answer(&session(Some(10)), &applicable, "q2", "severe").unwrap();
        let twice = record_answer(&once, &applicable, "q2", "severe").unwrap();

        assert_eq!(total_score(&once), 3);
        assert_eq!(total_score(&twice), 3);
        assert_eq!(twice.answers.len(), 1);
    }

    #[test]
    fn overwriting_an_answer_replaces_its_score() {
        let applicable = applicable_questions(&scenario_questions(), &PatientContext { age: Some(10) });
        let s = record_answer(&session(Some(10)), &applicable, "q1", "unresponsive").unwrap();
        let s = record_answer(&s, &applicable, "q1", "alert").unwrap();
        assert_eq!(total_score(&s), 0);
    }

    // ── total_score ──────────────────────────────────────────────────────────

    #[test]
    fn total_score_is_independent_of_insertion_order() {
        let applicable = applicable_questions(&scenario_questions(), &PatientContext { age: Some(10) });

        let a = record_answer(&session(Some(10)), &applicable, "q1", "unresponsive").unwrap();
        let a = record_answer(&a, &applicable, "q2", "severe").unwrap();

        let b = record_answer(&session(Some(10)), &applicable, "q2", "severe").unwrap();
        let b = record_answer(&b, &applicable, "q1", "unresponsive").unwrap();

        assert_eq!(total_score(&a), total_score(&b));
        assert_eq!(total_score(&a), 6);
        // Recomputing is stable.
        assert_eq!(total_score(&a), total_score(&a));
    }

    // ── update_patient ───────────────────────────────────────────────────────

    #[test]
    fn age_change_drops_answers_that_no_longer_apply() {
        let all = scenario_questions();
        let applicable = applicable_questions(&all, &PatientContext { age: Some(10) });
        let s = record_answer(&session(Some(10)), &applicable, "q1", "unresponsive").unwrap();
        let s = record_answer(&s, &applicable, "q2", "severe").unwrap();

        let s = update_patient(&s, patient(Some(40)), &all).unwrap();

        assert!(s.answer("q1").is_some(), "all-ages answer must survive");
        assert!(s.answer("q2").is_none(), "pediatric answer must be dropped");
        assert_eq!(total_score(&s), 3);
    }

    #[test]
    fn update_patient_rescores_stored_answers_from_current_options() {
        let all = scenario_questions();
        let applicable = applicable_questions(&all, &PatientContext { age: Some(10) });
        let mut s = record_answer(&session(Some(10)), &applicable, "q1", "unresponsive").unwrap();
        s = record_answer(&s, &applicable, "q2", "severe").unwrap();

        // As if read back from an edited or outdated draft file.
        s.answers.get_mut("q1").unwrap().score = 99;
        s.answers.get_mut("q2").unwrap().selected_value = "retired-option".to_string();

        let s = update_patient(&s, patient(Some(10)), &all).unwrap();

        assert_eq!(s.answer("q1").unwrap().score, 3);
        assert!(s.answer("q2").is_none(), "answer without a matching option must be dropped");
        assert_eq!(total_score(&s), 3);
    }

    #[test]
    fn update_patient_rejects_out_of_range_age() {
        let all = scenario_questions();
        assert!(matches!(
            update_patient(&session(None), patient(Some(150)), &all),
            Err(AcuityError::InvalidPatient { .. })
        ));
    }

    // ── category_breakdown ───────────────────────────────────────────────────

    #[test]
    fn scenario_breakdown_and_total() {
        let applicable = applicable_questions(&scenario_questions(), &PatientContext { age: Some(10) });
        assert_eq!(ids(&applicable), vec!["q1", "q2"]);

        let s = record_answer(&session(Some(10)), &applicable, "q1", "unresponsive").unwrap();
        let s = record_answer(&s, &applicable, "q2", "severe").unwrap();

        assert_eq!(total_score(&s), 6);
        assert_eq!(
            category_breakdown(&s, &applicable),
            vec![
                CategoryScore {
                    category: "Neuro".to_string(),
                    score: 3,
                    max_possible: 3,
                    percentage: 100,
                },
                CategoryScore {
                    category: "Pain".to_string(),
                    score: 3,
                    max_possible: 3,
                    percentage: 100,
                },
            ]
        );
    }

    #[test]
    fn breakdown_preserves_first_seen_category_order() {
        let all = vec![
            q("r1", "Respiratory", AgeGroup::All, &[("a", 1)]),
            q("n1", "Neuro", AgeGroup::All, &[("a", 1)]),
            q("r2", "Respiratory", AgeGroup::All, &[("a", 1)]),
        ];
        let breakdown = category_breakdown(&session(None), &all);
        let categories: Vec<&str> = breakdown.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(categories, vec!["Respiratory", "Neuro"]);
        assert_eq!(breakdown[0].max_possible, 2);
    }

    #[test]
    fn max_possible_follows_each_questions_highest_option() {
        let all = vec![
            q("a", "Mixed", AgeGroup::All, &[("x", 0), ("y", 4)]),
            q("b", "Mixed", AgeGroup::All, &[("x", 0), ("y", 1)]),
        ];
        let s = record_answer(&session(None), &all, "b", "y").unwrap();
        let breakdown = category_breakdown(&s, &all);

        assert_eq!(breakdown[0].max_possible, 5);
        // 100 * 1 / 5 = 20
        assert_eq!(breakdown[0].percentage, 20);
    }

    #[test]
    fn zero_max_possible_yields_zero_percentage() {
        let all = vec![q("a", "Zero", AgeGroup::All, &[("x", 0)])];
        let s = record_answer(&session(None), &all, "a", "x").unwrap();
        let breakdown = category_breakdown(&s, &all);
        assert_eq!(breakdown[0].max_possible, 0);
        assert_eq!(breakdown[0].percentage, 0);
    }

    #[test]
    fn percentages_stay_within_bounds_and_round_half_up() {
        let all = vec![
            q("a", "C", AgeGroup::All, &[("x", 0), ("y", 1), ("z", 3)]),
            q("b", "C", AgeGroup::All, &[("x", 0), ("y", 1), ("z", 3)]),
            q("c", "D", AgeGroup::All, &[("x", 0), ("y", 1), ("z", 2)]),
        ];
        let s = record_answer(&session(None), &all, "a", "y").unwrap();
        let s = record_answer(&s, &all, "c", "y").unwrap();
        let breakdown = category_breakdown(&s, &all);

        // 100 * 1 / 6 = 16.67 -> 17
        assert_eq!(breakdown[0].percentage, 17);
        // 100 * 1 / 2 = 50
        assert_eq!(breakdown[1].percentage, 50);
        assert!(breakdown.iter().all(|c| c.percentage <= 100));
        assert_eq!(percentage(1, 8), 13); // 12.5 rounds up
    }

    // ── progress / completion ────────────────────────────────────────────────

    #[test]
    fn completion_flips_when_last_question_is_answered() {
        let applicable = applicable_questions(&scenario_questions(), &PatientContext { age: Some(10) });
        let required = PatientField::REQUIRED;

        let s = session(Some(10));
        assert!(!is_complete(&s, &applicable, &required));
        assert_eq!(phase(&s, &applicable, &required), SessionPhase::InProgress);

        let s = record_answer(&s, &applicable, "q1", "alert").unwrap();
        assert!(!is_complete(&s, &applicable, &required));
        assert_eq!(progress(&s, &applicable).percentage, 50);

        let s = record_answer(&s, &applicable, "q2", "comfortable").unwrap();
        assert!(is_complete(&s, &applicable, &required));
        assert_eq!(phase(&s, &applicable, &required), SessionPhase::Complete);
        assert_eq!(progress(&s, &applicable).answered, 2);
    }

    #[test]
    fn completion_requires_patient_fields() {
        let all = scenario_questions();
        let applicable = applicable_questions(&all, &PatientContext { age: None });
        let mut s = session(None);
        s.patient.name = String::new();
        let s = record_answer(&s, &applicable, "q1", "alert").unwrap();

        assert!(!is_complete(&s, &applicable, &PatientField::REQUIRED));
        assert_eq!(
            missing_items(&s, &applicable, &PatientField::REQUIRED),
            vec!["field:name".to_string(), "field:age".to_string()]
        );
        // With no required fields the answered question alone completes it.
        assert!(is_complete(&s, &applicable, &[]));
    }

    #[test]
    fn empty_applicable_set_has_zero_progress() {
        let p = progress(&session(None), &[]);
        assert_eq!((p.answered, p.total, p.percentage), (0, 0, 0));
    }

    // ── build_submission / build_report ──────────────────────────────────────

    #[test]
    fn build_submission_rejects_incomplete_session() {
        let applicable = applicable_questions(&scenario_questions(), &PatientContext { age: Some(10) });
        let s = record_answer(&session(Some(10)), &applicable, "q1", "alert").unwrap();

        match build_submission(&s, &applicable, moderate(0), Utc::now(), Shift::Morning, &PatientField::REQUIRED) {
            Err(AcuityError::IncompleteAssessment { missing }) => {
                assert_eq!(missing, vec!["question:q2".to_string()]);
            }
            other => panic!("expected IncompleteAssessment, got {:?}", other),
        }
    }

    #[test]
    fn build_submission_denormalizes_answers_in_question_order() {
        let applicable = applicable_questions(&scenario_questions(), &PatientContext { age: Some(10) });
        let s = record_answer(&session(Some(10)), &applicable, "q2", "severe").unwrap();
        let s = record_answer(&s, &applicable, "q1", "unresponsive").unwrap();

        let at = Utc.with_ymd_and_hms(2026, 3, 1, 10, 30, 0).unwrap();
        let submission = build_submission(&s, &applicable, moderate(6), at, Shift::Morning, &PatientField::REQUIRED)
            .unwrap();

        assert_eq!(submission.id, s.id);
        assert_eq!(submission.total_score, 6);
        assert_eq!(submission.answers.len(), 2);
        assert_eq!(submission.answers[0].question_id, "q1");
        assert_eq!(submission.answers[0].selected_label, "Label unresponsive");
        assert_eq!(submission.answers[1].category, "Pain");
        assert_eq!(submission.category_breakdown.len(), 2);
        assert_eq!(submission.assessed_at, at);
    }

    #[test]
    fn build_submission_uses_the_given_required_fields() {
        let applicable = applicable_questions(&scenario_questions(), &PatientContext { age: None });
        let anonymous = AssessmentSession::new(
            PatientDemographics {
                patient_id: "MRN-002".to_string(),
                ..Default::default()
            },
            Utc::now(),
        );
        let s = record_answer(&anonymous, &applicable, "q1", "alert").unwrap();

        let submission = build_submission(
            &s,
            &applicable,
            moderate(0),
            Utc::now(),
            Shift::Evening,
            &[PatientField::PatientId],
        )
        .unwrap();
        assert_eq!(submission.patient.patient_id, "MRN-002");

        match build_submission(&s, &applicable, moderate(0), Utc::now(), Shift::Evening, &PatientField::REQUIRED) {
            Err(AcuityError::IncompleteAssessment { missing }) => {
                assert_eq!(missing, vec!["field:name".to_string(), "field:age".to_string()]);
            }
            other => panic!("expected IncompleteAssessment, got {:?}", other),
        }
    }

    #[test]
    fn build_submission_total_agrees_with_answer_records() {
        let applicable = applicable_questions(&scenario_questions(), &PatientContext { age: Some(10) });
        let mut s = record_answer(&session(Some(10)), &applicable, "q1", "unresponsive").unwrap();
        s = record_answer(&s, &applicable, "q2", "comfortable").unwrap();
        s.answers.get_mut("q1").unwrap().score = 99;

        let submission =
            build_submission(&s, &applicable, moderate(3), Utc::now(), Shift::Morning, &PatientField::REQUIRED)
                .unwrap();

        let recorded: u32 = submission.answers.iter().map(|a| a.selected_score).sum();
        assert_eq!(submission.total_score, 3);
        assert_eq!(submission.total_score, recorded);
    }

    #[test]
    fn build_report_includes_overall_percentage_and_labels() {
        let applicable = applicable_questions(&scenario_questions(), &PatientContext { age: Some(10) });
        let s = record_answer(&session(Some(10)), &applicable, "q1", "unresponsive").unwrap();

        let report = build_report(&s, &applicable, moderate(3), Utc::now());

        // 3 of a possible 6.
        assert_eq!(report.overall_percentage, 50);
        assert_eq!(report.detailed_answers.len(), 1);
        assert_eq!(report.detailed_answers[0].answer, "Label unresponsive");
        assert_eq!(report.detailed_answers[0].question, "Title q1");
    }
}
