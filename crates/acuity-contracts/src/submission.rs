//! Payloads produced from a completed session.
//!
//! `AssessmentSubmission` is what a submission sink persists; the answers are
//! denormalized so a stored record stays readable after the question set
//! changes. `AssessmentReport` is the exportable summary shown to clinicians.

use chrono::{DateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    patient::PatientDemographics,
    score::{CategoryScore, Interpretation},
    session::SessionId,
};

/// Hour (local, 24h clock) the morning shift starts.
pub const MORNING_SHIFT_START: u32 = 7;

/// Hour (local, 24h clock) the evening shift starts.
pub const EVENING_SHIFT_START: u32 = 19;

/// The nursing shift an assessment was performed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    Morning,
    Evening,
}

impl Shift {
    pub fn from_hour(hour: u32) -> Self {
        if (MORNING_SHIFT_START..EVENING_SHIFT_START).contains(&hour) {
            Shift::Morning
        } else {
            Shift::Evening
        }
    }

    /// The shift `time` falls in, judged by the hour in `time`'s own timezone.
    pub fn at<Tz: TimeZone>(time: &DateTime<Tz>) -> Self {
        Self::from_hour(time.hour())
    }
}

/// A persisted answer, carrying the question and option text it was given against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question_id: String,
    pub question_title: String,
    pub category: String,
    pub selected_value: String,
    pub selected_label: String,
    pub selected_score: u32,
}

/// A completed assessment, ready for a submission sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentSubmission {
    /// Also the id of the session it was built from.
    pub id: SessionId,
    pub patient: PatientDemographics,
    /// In applicable-question order.
    pub answers: Vec<AnswerRecord>,
    pub total_score: u32,
    pub interpretation: Interpretation,
    pub category_breakdown: Vec<CategoryScore>,
    pub assessed_at: DateTime<Utc>,
    pub shift: Shift,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessed_by: Option<String>,
}

/// One answered question as it appears in an exported report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedAnswer {
    pub question: String,
    pub category: String,
    pub answer: String,
    pub score: u32,
}

/// Exportable result summary for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentReport {
    pub generated_at: DateTime<Utc>,
    pub patient: PatientDemographics,
    pub total_score: u32,
    pub interpretation: Interpretation,
    /// Total score as a percentage of the maximum the applicable questions allow.
    pub overall_percentage: u32,
    pub category_breakdown: Vec<CategoryScore>,
    pub detailed_answers: Vec<DetailedAnswer>,
}
