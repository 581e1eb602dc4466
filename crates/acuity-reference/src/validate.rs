//! Validation of question reference data.
//!
//! Runs in two phases over the JSON form of a question set:
//!
//! 1. **Structural**: the document is checked against `question_set_schema()`
//!    with the `jsonschema` crate.
//! 2. **Semantic**: rules JSON Schema cannot express (unique question ids,
//!    non-empty options, unique option values per question).
//!
//! Failures from both phases are collected into one `ValidationReport`, so a
//! bad export is reported in full instead of one problem at a time.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use acuity_contracts::{
    error::{AcuityError, AcuityResult},
    question::Question,
};

/// One problem found in a question set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    /// `"json-schema"` for structural failures, otherwise the semantic rule name.
    pub rule: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub passed: bool,
    pub failures: Vec<ValidationFailure>,
}

impl ValidationReport {
    /// Convert a failed report into `ReferenceData`, joining every message.
    pub fn into_result(self) -> AcuityResult<()> {
        if self.passed {
            return Ok(());
        }
        let reasons: Vec<String> = self
            .failures
            .iter()
            .map(|f| format!("[{}] {}", f.rule, f.message))
            .collect();
        Err(AcuityError::ReferenceData {
            reason: reasons.join("; "),
        })
    }
}

/// JSON Schema for an array of questions in their serialized (camelCase) form.
pub fn question_set_schema() -> Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "required": ["id", "title", "category", "ageGroup", "options"],
            "properties": {
                "id": { "type": "string", "minLength": 1 },
                "title": { "type": "string", "minLength": 1 },
                "description": { "type": "string" },
                "category": { "type": "string", "minLength": 1 },
                "ageGroup": { "enum": ["all", "pediatric", "adult"] },
                "isRequired": { "type": "boolean" },
                "options": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "required": ["value", "label", "score"],
                        "properties": {
                            "value": { "type": "string", "minLength": 1 },
                            "label": { "type": "string" },
                            "score": { "type": "integer", "minimum": 0 }
                        }
                    }
                }
            }
        }
    })
}

/// Validate a question set given as JSON.
pub fn validate_question_json(document: &Value) -> ValidationReport {
    let mut failures = Vec::new();

    // ── Phase 1: structural ───────────────────────────────────────────────────
    match jsonschema::validator_for(&question_set_schema()) {
        Ok(validator) => {
            for error in validator.iter_errors(document) {
                let message = format!("JSON Schema violation at {}: {}", error.instance_path, error);
                warn!(%message, "structural validation failure");
                failures.push(ValidationFailure {
                    rule: "json-schema".to_string(),
                    message,
                });
            }
        }
        Err(e) => {
            let message = format!("invalid JSON Schema document: {e}");
            warn!(%message, "schema compilation failure");
            failures.push(ValidationFailure {
                rule: "json-schema".to_string(),
                message,
            });
        }
    }

    // Semantic checks need typed questions; skip them when the shape is wrong.
    if failures.is_empty() {
        match serde_json::from_value::<Vec<Question>>(document.clone()) {
            Ok(questions) => failures.extend(semantic_failures(&questions)),
            Err(e) => failures.push(ValidationFailure {
                rule: "json-schema".to_string(),
                message: format!("question set does not decode: {e}"),
            }),
        }
    }

    finish(failures)
}

/// Validate an already-typed question set.
///
/// Round-trips through JSON so typed and untyped inputs get the same checks.
pub fn validate_questions(questions: &[Question]) -> ValidationReport {
    match serde_json::to_value(questions) {
        Ok(document) => validate_question_json(&document),
        Err(e) => finish(vec![ValidationFailure {
            rule: "json-schema".to_string(),
            message: format!("question set does not encode: {e}"),
        }]),
    }
}

fn semantic_failures(questions: &[Question]) -> Vec<ValidationFailure> {
    let mut failures = Vec::new();
    let mut seen_ids = HashSet::new();

    for question in questions {
        if !seen_ids.insert(question.id.as_str()) {
            failures.push(ValidationFailure {
                rule: "unique-question-id".to_string(),
                message: format!("question id '{}' appears more than once", question.id),
            });
        }

        if question.options.is_empty() {
            failures.push(ValidationFailure {
                rule: "non-empty-options".to_string(),
                message: format!("question '{}' has no options", question.id),
            });
        }

        let mut seen_values = HashSet::new();
        for option in &question.options {
            if !seen_values.insert(option.value.as_str()) {
                failures.push(ValidationFailure {
                    rule: "unique-option-value".to_string(),
                    message: format!(
                        "question '{}' has more than one option with value '{}'",
                        question.id, option.value
                    ),
                });
            }
        }
    }

    for failure in &failures {
        warn!(rule = %failure.rule, message = %failure.message, "semantic rule failed");
    }
    failures
}

fn finish(failures: Vec<ValidationFailure>) -> ValidationReport {
    let passed = failures.is_empty();
    debug!(passed, failure_count = failures.len(), "question set validated");
    ValidationReport { passed, failures }
}
