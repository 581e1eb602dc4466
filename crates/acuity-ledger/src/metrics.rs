//! Per-unit, per-shift score averages for the hospital admin overview.

use serde::{Deserialize, Serialize};

use acuity_contracts::submission::{AssessmentSubmission, Shift};

/// Average acuity per shift for one hospital unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitShiftMetrics {
    pub unit_id: String,
    /// 0.0 when the unit has no morning assessments.
    pub morning_avg: f64,
    /// 0.0 when the unit has no evening assessments.
    pub evening_avg: f64,
    pub total_assessments: usize,
}

/// Aggregate `submissions` by unit, in first-seen unit order.
///
/// Submissions without a unit are skipped.
pub fn unit_shift_metrics<'a>(
    submissions: impl IntoIterator<Item = &'a AssessmentSubmission>,
) -> Vec<UnitShiftMetrics> {
    let mut units: Vec<(String, Vec<u32>, Vec<u32>)> = Vec::new();

    for submission in submissions {
        let Some(unit_id) = &submission.patient.unit_id else {
            continue;
        };
        let idx = match units.iter().position(|(id, _, _)| id == unit_id) {
            Some(idx) => idx,
            None => {
                units.push((unit_id.clone(), Vec::new(), Vec::new()));
                units.len() - 1
            }
        };
        let (_, morning, evening) = &mut units[idx];
        match submission.shift {
            Shift::Morning => morning.push(submission.total_score),
            Shift::Evening => evening.push(submission.total_score),
        }
    }

    units
        .into_iter()
        .map(|(unit_id, morning, evening)| UnitShiftMetrics {
            unit_id,
            morning_avg: average(&morning),
            evening_avg: average(&evening),
            total_assessments: morning.len() + evening.len(),
        })
        .collect()
}

fn average(scores: &[u32]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().map(|&s| s as f64).sum::<f64>() / scores.len() as f64
}
