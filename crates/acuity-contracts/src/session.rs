//! Assessment session state.
//!
//! A session is the working state of one in-progress assessment. It carries
//! only what the clinician entered: demographics and answers. Totals and
//! completion are derived by the scoring engine and never stored here.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::patient::PatientDemographics;

/// Unique identifier for one assessment session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub uuid::Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The clinician's selection for one question.
///
/// `score` is copied from the matching option when the answer is recorded,
/// so it always equals that option's weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: String,
    pub selected_value: String,
    pub score: u32,
}

/// The mutable working state of one patient assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentSession {
    pub id: SessionId,
    pub patient: PatientDemographics,
    /// One entry per answered question, keyed by question id.
    pub answers: BTreeMap<String, Answer>,
    pub started_at: DateTime<Utc>,
    /// Set once the session has been written to a submission sink.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl AssessmentSession {
    /// Start an empty session for `patient`.
    pub fn new(patient: PatientDemographics, started_at: DateTime<Utc>) -> Self {
        Self {
            id: SessionId::new(),
            patient,
            answers: BTreeMap::new(),
            started_at,
            submitted_at: None,
        }
    }

    pub fn answer(&self, question_id: &str) -> Option<&Answer> {
        self.answers.get(question_id)
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted_at.is_some()
    }
}

/// Where a session is in its linear lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionPhase {
    /// Questions or required patient fields are still missing.
    InProgress,
    /// Everything is filled in; the session can be submitted.
    Complete,
    /// The session has been written to a submission sink.
    Persisted,
}
