//! # acuity-reference
//!
//! Question reference data for the acuity engine.
//!
//! - `builtin`: the standard six-question set
//! - `tables`: normalization of relational category/question/answer/population rows
//! - `validate`: JSON Schema plus semantic validation of a question set
//! - `source`: `QuestionSource` implementations over all of the above
//!
//! The engine never derives option values or age groups itself; that
//! happens here, before questions reach it.

pub mod builtin;
pub mod source;
pub mod tables;
pub mod validate;

pub use builtin::standard_questions;
pub use source::{JsonFileQuestionSource, StaticQuestionSource, TableQuestionSource};
pub use tables::{slugify, ReferenceTables};
pub use validate::{validate_question_json, validate_questions, ValidationFailure, ValidationReport};

// ── Tests ─────────────────────────────────────────────────────────────────────
