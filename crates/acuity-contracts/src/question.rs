//! Question reference data.
//!
//! Questions are immutable for the duration of an assessment session. Option
//! values are expected to already be stable, unique identifiers; deriving
//! them from label text is the job of the reference-data loader.

use serde::{Deserialize, Serialize};

use crate::patient::AgeBracket;

/// Which patients a question applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeGroup {
    /// Asked regardless of age, including when age is unknown.
    All,
    /// Asked only when the patient is younger than the pediatric threshold.
    Pediatric,
    /// Asked only when the patient is at or above the pediatric threshold.
    Adult,
}

impl AgeGroup {
    /// Return true if a question in this group applies to `bracket`.
    ///
    /// `None` means the patient's age is not known yet, in which case only
    /// `AgeGroup::All` applies.
    pub fn applies_to(self, bracket: Option<AgeBracket>) -> bool {
        match (self, bracket) {
            (AgeGroup::All, _) => true,
            (AgeGroup::Pediatric, Some(AgeBracket::Pediatric)) => true,
            (AgeGroup::Adult, Some(AgeBracket::Adult)) => true,
            _ => false,
        }
    }
}

/// One selectable answer to a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    /// Stable identifier stored in answers (e.g. "unresponsive").
    pub value: String,
    /// Text shown to the clinician.
    pub label: String,
    /// Weight this option contributes to the acuity score.
    pub score: u32,
}

/// A scored checklist question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Unique across the reference set.
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Clinical grouping used for sub-totals (e.g. "Neurological").
    pub category: String,
    pub age_group: AgeGroup,
    /// Ordered as presented to the clinician.
    pub options: Vec<QuestionOption>,
    #[serde(default = "default_required")]
    pub is_required: bool,
}

fn default_required() -> bool {
    true
}

impl Question {
    /// Find the option whose `value` equals `value`.
    pub fn option(&self, value: &str) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.value == value)
    }

    /// The highest score any option of this question can contribute.
    ///
    /// Zero for a question without options.
    pub fn max_score(&self) -> u32 {
        self.options.iter().map(|o| o.score).max().unwrap_or(0)
    }
}
