//! The standard question set shipped with the system.
//!
//! Used when no external reference data is configured. Three questions
//! apply to every patient; pain has an adult and a pediatric variant, and
//! pediatric patients get one extra developmental question.

use acuity_contracts::question::{AgeGroup, Question, QuestionOption};

fn opt(value: &str, label: &str, score: u32) -> QuestionOption {
    QuestionOption {
        value: value.to_string(),
        label: label.to_string(),
        score,
    }
}

fn question(
    id: &str,
    title: &str,
    description: &str,
    category: &str,
    age_group: AgeGroup,
    options: Vec<QuestionOption>,
) -> Question {
    Question {
        id: id.to_string(),
        title: title.to_string(),
        description: Some(description.to_string()),
        category: category.to_string(),
        age_group,
        options,
        is_required: true,
    }
}

/// The six built-in questions, in display order.
///
/// Every question scores its options 0 through 3, so an adult assessment
/// tops out at 12 and a pediatric one at 15.
pub fn standard_questions() -> Vec<Question> {
    vec![
        question(
            "neurological-1",
            "Level of Consciousness",
            "Patient's response to verbal and physical stimuli",
            "Neurological",
            AgeGroup::All,
            vec![
                opt("alert", "Alert and oriented", 0),
                opt("lethargic", "Lethargic but responsive", 1),
                opt("stuporous", "Stuporous (difficult to arouse)", 2),
                opt("unresponsive", "Unresponsive", 3),
            ],
        ),
        question(
            "respiratory-1",
            "Respiratory Rate",
            "Breaths per minute",
            "Respiratory",
            AgeGroup::All,
            vec![
                opt("normal", "12-20 breaths/min (normal)", 0),
                opt("mild-tachy", "21-30 breaths/min (mild tachypnea)", 1),
                opt("moderate-tachy", "31-40 breaths/min (moderate tachypnea)", 2),
                opt("severe-tachy", ">40 breaths/min (severe tachypnea)", 3),
            ],
        ),
        question(
            "cardiovascular-1",
            "Heart Rate",
            "Beats per minute",
            "Cardiovascular",
            AgeGroup::All,
            vec![
                opt("normal-hr", "60-100 bpm (normal)", 0),
                opt("mild-tachy-hr", "101-120 bpm (mild tachycardia)", 1),
                opt("moderate-tachy-hr", "121-150 bpm (moderate tachycardia)", 2),
                opt("severe-tachy-hr", ">150 bpm (severe tachycardia)", 3),
            ],
        ),
        question(
            "adult-pain",
            "Pain Assessment (Adult)",
            "Patient self-reported pain level (0-10 scale)",
            "Pain Assessment",
            AgeGroup::Adult,
            vec![
                opt("no-pain", "0 - No pain", 0),
                opt("mild-pain", "1-3 - Mild pain", 1),
                opt("moderate-pain", "4-6 - Moderate pain", 2),
                opt("severe-pain", "7-10 - Severe pain", 3),
            ],
        ),
        question(
            "pediatric-pain",
            "Pediatric Pain Assessment",
            "FLACC scale or age-appropriate pain assessment",
            "Pain Assessment",
            AgeGroup::Pediatric,
            vec![
                opt("comfortable", "Comfortable, no distress", 0),
                opt("mild-distress", "Mild distress or discomfort", 1),
                opt("moderate-distress", "Moderate distress", 2),
                opt("severe-distress", "Severe distress or inconsolable", 3),
            ],
        ),
        question(
            "pediatric-development",
            "Developmental Response",
            "Age-appropriate developmental responses",
            "Developmental",
            AgeGroup::Pediatric,
            vec![
                opt("age-appropriate", "Age-appropriate responses", 0),
                opt("mildly-delayed", "Mildly delayed responses", 1),
                opt("significantly-delayed", "Significantly delayed responses", 2),
                opt("no-response", "No developmental responses", 3),
            ],
        ),
    ]
}
