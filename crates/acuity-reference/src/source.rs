//! `QuestionSource` implementations.
//!
//! Every source validates what it hands out; a set that fails validation is
//! returned as `ReferenceData` and never reaches the engine.

use std::path::{Path, PathBuf};

use tracing::info;

use acuity_contracts::{
    error::{AcuityError, AcuityResult},
    question::Question,
};
use acuity_core::traits::QuestionSource;

use crate::{
    builtin::standard_questions,
    tables::ReferenceTables,
    validate::{validate_question_json, validate_questions},
};

/// A fixed, in-memory question set.
#[derive(Debug, Clone)]
pub struct StaticQuestionSource {
    questions: Vec<Question>,
}

impl StaticQuestionSource {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// The built-in six-question set.
    pub fn standard() -> Self {
        Self::new(standard_questions())
    }
}

impl QuestionSource for StaticQuestionSource {
    fn load_questions(&self) -> AcuityResult<Vec<Question>> {
        validate_questions(&self.questions).into_result()?;
        Ok(self.questions.clone())
    }
}

/// A JSON file holding an array of questions in their serialized form.
#[derive(Debug, Clone)]
pub struct JsonFileQuestionSource {
    path: PathBuf,
}

impl JsonFileQuestionSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl QuestionSource for JsonFileQuestionSource {
    fn load_questions(&self) -> AcuityResult<Vec<Question>> {
        let document = read_json(&self.path)?;
        validate_question_json(&document).into_result()?;

        let questions: Vec<Question> =
            serde_json::from_value(document).map_err(|e| AcuityError::ReferenceData {
                reason: format!("failed to decode questions in '{}': {}", self.path.display(), e),
            })?;

        info!(path = %self.path.display(), count = questions.len(), "question set loaded");
        Ok(questions)
    }
}

/// Questions built from the four relational reference tables.
#[derive(Debug, Clone)]
pub struct TableQuestionSource {
    tables: ReferenceTables,
}

impl TableQuestionSource {
    pub fn new(tables: ReferenceTables) -> Self {
        Self { tables }
    }

    /// Read the tables from a JSON export keyed by table name
    /// (`Category`, `Question`, `answer`, `Population`).
    pub fn from_file(path: impl AsRef<Path>) -> AcuityResult<Self> {
        let path = path.as_ref();
        let document = read_json(path)?;
        let tables = serde_json::from_value(document).map_err(|e| AcuityError::ReferenceData {
            reason: format!("failed to decode reference tables in '{}': {}", path.display(), e),
        })?;
        Ok(Self::new(tables))
    }

    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }
}

impl QuestionSource for TableQuestionSource {
    fn load_questions(&self) -> AcuityResult<Vec<Question>> {
        let questions = self.tables.normalize();
        validate_questions(&questions).into_result()?;
        info!(count = questions.len(), "question set built from reference tables");
        Ok(questions)
    }
}

fn read_json(path: &Path) -> AcuityResult<serde_json::Value> {
    let content = std::fs::read_to_string(path).map_err(|e| AcuityError::ReferenceData {
        reason: format!("failed to read '{}': {}", path.display(), e),
    })?;
    serde_json::from_str(&content).map_err(|e| AcuityError::ReferenceData {
        reason: format!("failed to parse JSON in '{}': {}", path.display(), e),
    })
}
