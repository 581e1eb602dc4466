//! Derived score types: category sub-totals, progress, and interpretation.

use serde::{Deserialize, Serialize};

/// Score sub-total for one clinical category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub category: String,
    pub score: u32,
    /// Sum of the highest option score of every question in the category.
    pub max_possible: u32,
    /// `round(100 * score / max_possible)`, or 0 when `max_possible` is 0.
    pub percentage: u32,
}

/// How far the clinician has got through the applicable questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
    pub percentage: u32,
}

/// Severity classification of a total acuity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcuityLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl AcuityLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            AcuityLevel::Low => "Low",
            AcuityLevel::Moderate => "Moderate",
            AcuityLevel::High => "High",
            AcuityLevel::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for AcuityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One row of the interpretation table.
///
/// Bands are ordered and non-overlapping. A band covers every score above the
/// previous band's `max_score` up to and including its own. `None` means the
/// band has no upper bound and must be last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcuityBand {
    pub level: AcuityLevel,
    #[serde(default)]
    pub max_score: Option<u32>,
    pub description: String,
}

impl AcuityBand {
    pub fn covers(&self, total_score: u32) -> bool {
        match self.max_score {
            Some(max) => total_score <= max,
            None => true,
        }
    }
}

/// The interpretation of one total score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interpretation {
    pub level: AcuityLevel,
    pub description: String,
    pub total_score: u32,
}
