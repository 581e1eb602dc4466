//! History query filters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use acuity_contracts::submission::AssessmentSubmission;

/// Criteria for `InMemoryLedger::history`. Unset fields match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryFilter {
    /// Case-insensitive substring of the patient name.
    pub patient_name: Option<String>,
    /// Keep submissions with at least one answer in this category.
    pub category: Option<String>,
    /// Inclusive lower bound on the total score.
    pub min_score: Option<u32>,
    /// Inclusive upper bound on the total score.
    pub max_score: Option<u32>,
    /// Inclusive lower bound on the assessment time.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the assessment time.
    pub to: Option<DateTime<Utc>>,
    /// Keep only submissions for this unit.
    pub unit_id: Option<String>,
}

impl HistoryFilter {
    pub fn matches(&self, submission: &AssessmentSubmission) -> bool {
        if let Some(needle) = &self.patient_name {
            let name = submission.patient.name.to_lowercase();
            if !name.contains(&needle.to_lowercase()) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if !submission.answers.iter().any(|a| &a.category == category) {
                return false;
            }
        }
        if self.min_score.is_some_and(|min| submission.total_score < min) {
            return false;
        }
        if self.max_score.is_some_and(|max| submission.total_score > max) {
            return false;
        }
        if self.from.is_some_and(|from| submission.assessed_at < from) {
            return false;
        }
        if self.to.is_some_and(|to| submission.assessed_at > to) {
            return false;
        }
        if let Some(unit) = &self.unit_id {
            if submission.patient.unit_id.as_ref() != Some(unit) {
                return false;
            }
        }
        true
    }
}
