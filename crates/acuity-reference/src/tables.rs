//! Normalization of relational reference rows into `Question`s.
//!
//! Reference data is commonly kept as four tables: categories, questions,
//! answer options, and populations. The row types here keep the tables'
//! column names on the wire so an export can be read without remapping.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use acuity_contracts::question::{AgeGroup, Question, QuestionOption};

/// Category title used when a question points at a missing category.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRow {
    #[serde(rename = "Category_ID")]
    pub category_id: String,
    #[serde(rename = "Category_Title")]
    pub category_title: String,
    #[serde(rename = "PID")]
    pub pid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRow {
    #[serde(rename = "Question_ID")]
    pub question_id: String,
    #[serde(rename = "Question_Title")]
    pub question_title: String,
    #[serde(rename = "Category_ID")]
    pub category_id: String,
    #[serde(rename = "PID")]
    pub pid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRow {
    #[serde(rename = "Question_ID")]
    pub question_id: String,
    #[serde(rename = "Answer_Options")]
    pub answer_options: String,
    #[serde(rename = "Value_Answer")]
    pub value_answer: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationRow {
    #[serde(rename = "PID")]
    pub pid: String,
    #[serde(rename = "Population")]
    pub population: String,
}

/// The four reference tables, as exported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceTables {
    #[serde(rename = "Category", default)]
    pub categories: Vec<CategoryRow>,
    #[serde(rename = "Question", default)]
    pub questions: Vec<QuestionRow>,
    #[serde(rename = "answer", default)]
    pub answers: Vec<AnswerRow>,
    #[serde(rename = "Population", default)]
    pub populations: Vec<PopulationRow>,
}

impl ReferenceTables {
    /// Join the tables into questions, in question-row order.
    ///
    /// Options keep answer-row order. A question whose category is missing
    /// lands in `UNKNOWN_CATEGORY`; a question without answer rows comes out
    /// with no options and is left for validation to reject.
    pub fn normalize(&self) -> Vec<Question> {
        let category_titles: HashMap<&str, &str> = self
            .categories
            .iter()
            .map(|c| (c.category_id.as_str(), c.category_title.as_str()))
            .collect();
        let populations: HashMap<&str, &str> = self
            .populations
            .iter()
            .map(|p| (p.pid.as_str(), p.population.as_str()))
            .collect();

        let mut options_by_question: HashMap<&str, Vec<QuestionOption>> = HashMap::new();
        for row in &self.answers {
            options_by_question
                .entry(row.question_id.as_str())
                .or_default()
                .push(QuestionOption {
                    value: slugify(&row.answer_options),
                    label: row.answer_options.clone(),
                    score: row.value_answer,
                });
        }

        let questions: Vec<Question> = self
            .questions
            .iter()
            .map(|row| Question {
                id: row.question_id.clone(),
                title: row.question_title.clone(),
                description: None,
                category: category_titles
                    .get(row.category_id.as_str())
                    .copied()
                    .unwrap_or(UNKNOWN_CATEGORY)
                    .to_string(),
                age_group: age_group_for(populations.get(row.pid.as_str()).copied()),
                options: options_by_question
                    .get(row.question_id.as_str())
                    .cloned()
                    .unwrap_or_default(),
                is_required: true,
            })
            .collect();

        debug!(
            questions = questions.len(),
            answers = self.answers.len(),
            "reference tables normalized"
        );
        questions
    }
}

/// Map a population name to an age group. Anything unrecognized means all ages.
pub fn age_group_for(population: Option<&str>) -> AgeGroup {
    match population {
        Some("Pedia") => AgeGroup::Pediatric,
        Some("Adult") => AgeGroup::Adult,
        _ => AgeGroup::All,
    }
}

/// Derive an option value from its label.
///
/// Lowercases, then replaces every character outside `[a-z0-9]` with `-`.
/// Runs of separators are not collapsed, so `"0 - No pain"` becomes
/// `"0---no-pain"`.
pub fn slugify(label: &str) -> String {
    label
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { '-' })
        .collect()
}
